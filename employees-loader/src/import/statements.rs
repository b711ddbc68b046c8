//! The three fixed LOAD CSV statements.

use std::fmt;

use crate::config::{BossImportMode, BOSS_CSV_FILE, CSV_BASE_URL, FRIENDS_CSV_FILE, SKILLS_CSV_FILE};

/// One of the three imports, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// Employees and who they report to (`REPORTS_TO`).
    Boss,
    /// Employees and their friends (`FRIENDS_WITH`).
    Friends,
    /// Employees and their skills (`HAS_SKILL`).
    Skills,
}

impl ImportKind {
    /// Run order: boss, then friends, then skills.
    pub const ALL: [ImportKind; 3] = [ImportKind::Boss, ImportKind::Friends, ImportKind::Skills];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Boss => "boss",
            ImportKind::Friends => "friends",
            ImportKind::Skills => "skills",
        }
    }

    pub fn csv_file(&self) -> &'static str {
        match self {
            ImportKind::Boss => BOSS_CSV_FILE,
            ImportKind::Friends => FRIENDS_CSV_FILE,
            ImportKind::Skills => SKILLS_CSV_FILE,
        }
    }

    pub fn csv_url(&self) -> String {
        format!("{}/{}", CSV_BASE_URL, self.csv_file())
    }

    /// Status line printed before the statement runs
    pub fn loading_message(&self) -> &'static str {
        match self {
            ImportKind::Boss => "Loading employees and their boss...",
            ImportKind::Friends => "Loading employees and their friends...",
            ImportKind::Skills => "Loading employees and their skills...",
        }
    }

    /// Cypher text for this import.
    ///
    /// `boss_mode` only affects [`ImportKind::Boss`].
    pub fn statement(&self, boss_mode: BossImportMode) -> String {
        let url = self.csv_url();
        match self {
            ImportKind::Boss => {
                let bind_employee = match boss_mode {
                    BossImportMode::Create => "CREATE",
                    BossImportMode::Merge => "MERGE",
                };
                format!(
                    "LOAD CSV WITH HEADERS FROM '{url}' AS row \
                     {bind_employee} (employee:Employee {{name: row.`employee name`}}) \
                     MERGE (boss:Employee {{name: row.`has boss`}}) \
                     WITH employee, boss \
                     WHERE employee.name <> boss.name \
                     MERGE (employee)-[:REPORTS_TO]->(boss)"
                )
            }
            ImportKind::Friends => format!(
                "LOAD CSV WITH HEADERS FROM '{url}' AS row \
                 MERGE (employee:Employee {{name: row.employee_name}}) \
                 MERGE (friend:Employee {{name: row.is_friends_with}}) \
                 WITH employee, friend \
                 WHERE employee.name <> friend.name \
                 MERGE (employee)-[:FRIENDS_WITH]->(friend)"
            ),
            ImportKind::Skills => format!(
                "LOAD CSV WITH HEADERS FROM '{url}' AS row \
                 WITH row, split(row.skills, \",\") AS skillList \
                 UNWIND skillList AS skill \
                 MERGE (e:Employee {{name: row.employee_name}}) \
                 MERGE (s:Skill {{name: skill}}) \
                 MERGE (e)-[:HAS_SKILL]->(s)"
            ),
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
