// Data models for import summaries and CSV rows
use std::fmt;

use serde::Deserialize;

use crate::import::ImportKind;

/// Counters read from a statement's result summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounters {
    pub nodes_created: u64,
    pub relationships_created: u64,
}

impl ImportCounters {
    pub fn new(nodes_created: u64, relationships_created: u64) -> Self {
        Self {
            nodes_created,
            relationships_created,
        }
    }
}

impl fmt::Display for ImportCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nodes created: {}, Relationships created: {}",
            self.nodes_created, self.relationships_created
        )
    }
}

/// Outcome of one import statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub kind: ImportKind,
    pub counters: ImportCounters,
}

/// Row of `employees-and-their-boss.csv`.
///
/// Empty cells come through as `None`, the way LOAD CSV yields `null`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BossRow {
    #[serde(rename = "employee name")]
    pub employee_name: Option<String>,
    #[serde(rename = "has boss")]
    pub has_boss: Option<String>,
}

/// Row of `employees-and-their-friends.csv`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FriendRow {
    pub employee_name: Option<String>,
    pub is_friends_with: Option<String>,
}

/// Row of `employees-and-their-skills.csv`; `skills` is comma-separated
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SkillRow {
    pub employee_name: Option<String>,
    pub skills: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_display_matches_status_line() {
        let counters = ImportCounters::new(12, 7);
        assert_eq!(
            counters.to_string(),
            "Nodes created: 12, Relationships created: 7"
        );
    }

    #[test]
    fn test_boss_row_reads_spaced_headers() {
        let data = "employee name,has boss\nAlice,Bob\nCarol,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<BossRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(
            rows,
            vec![
                BossRow {
                    employee_name: Some("Alice".to_string()),
                    has_boss: Some("Bob".to_string()),
                },
                BossRow {
                    employee_name: Some("Carol".to_string()),
                    has_boss: None,
                },
            ]
        );
    }

    #[test]
    fn test_skill_row_keeps_quoted_list() {
        let data = "employee_name,skills\nAlice,\"Go,SQL,Go\"\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: SkillRow = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(row.skills.as_deref(), Some("Go,SQL,Go"));
    }
}
