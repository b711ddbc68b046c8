//! In-memory evaluation of the import statements.
//!
//! Reproduces the clause semantics the statements rely on. The friends and
//! skills statements are evaluated row by row; the boss statement clause by
//! clause, since its employee clause is separated from the boss `MERGE` by an
//! eager barrier.
//!
//! - `MERGE` on a node binds every existing node with the same label and
//!   name, expanding the row once per match, and creates one node when none
//!   exists. A `null` key is an error, as it is on the server.
//! - `CREATE` always creates a node, even with a `null` name.
//! - `WHERE a.name <> b.name` drops the row when the names are equal or
//!   either is `null`.
//! - Relationship `MERGE` creates the edge only if the same typed edge
//!   between the same two nodes does not exist.
//! - `split(null, ",")` unwinds to no rows; `split` never trims.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::config::BossImportMode;
use crate::errors::LoaderError;
use crate::import::{ImportKind, StatementRunner};
use crate::models::{BossRow, FriendRow, ImportCounters, SkillRow};
use crate::preview::PreviewData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    Employee,
    Skill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    ReportsTo,
    FriendsWith,
    HasSkill,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipType::ReportsTo => "REPORTS_TO",
            RelationshipType::FriendsWith => "FRIENDS_WITH",
            RelationshipType::HasSkill => "HAS_SKILL",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
struct Node {
    label: NodeLabel,
    name: Option<String>,
}

type NodeId = usize;

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<Node>,
    relationships: HashSet<(NodeId, RelationshipType, NodeId)>,
    counters: ImportCounters,
}

impl GraphState {
    fn create_node(&mut self, label: NodeLabel, name: Option<&str>) -> NodeId {
        self.nodes.push(Node {
            label,
            name: name.map(str::to_string),
        });
        self.counters.nodes_created += 1;
        self.nodes.len() - 1
    }

    fn merge_node(&mut self, label: NodeLabel, name: Option<&str>) -> Result<Vec<NodeId>, String> {
        let name = name.ok_or_else(|| {
            format!("cannot merge {:?} node using null property value for name", label)
        })?;

        let matches: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.label == label && node.name.as_deref() == Some(name))
            .map(|(id, _)| id)
            .collect();

        if matches.is_empty() {
            Ok(vec![self.create_node(label, Some(name))])
        } else {
            Ok(matches)
        }
    }

    fn merge_relationship(&mut self, from: NodeId, rel_type: RelationshipType, to: NodeId) {
        if self.relationships.insert((from, rel_type, to)) {
            self.counters.relationships_created += 1;
        }
    }

    /// `WHERE a.name <> b.name`, with `null` comparing as not true
    fn names_differ(&self, a: NodeId, b: NodeId) -> bool {
        match (&self.nodes[a].name, &self.nodes[b].name) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// Bind `employees × others`, filter self-loops and merge one edge per pair
    fn link_employees(
        &mut self,
        employees: &[NodeId],
        others: &[NodeId],
        rel_type: RelationshipType,
    ) {
        for &employee in employees {
            for &other in others {
                if self.names_differ(employee, other) {
                    self.merge_relationship(employee, rel_type, other);
                }
            }
        }
    }

    /// Evaluate the boss statement clause by clause over all rows.
    ///
    /// The planner puts an eager barrier between the employee clause and
    /// `MERGE (boss:Employee ...)`, so every row's employee exists before any
    /// boss is matched. Errors carry the zero-based row index.
    fn apply_boss_rows(
        &mut self,
        rows: &[BossRow],
        mode: BossImportMode,
    ) -> Result<(), (usize, String)> {
        let mut employees = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let name = row.employee_name.as_deref();
            let bound = match mode {
                BossImportMode::Create => vec![self.create_node(NodeLabel::Employee, name)],
                BossImportMode::Merge => self
                    .merge_node(NodeLabel::Employee, name)
                    .map_err(|reason| (idx, reason))?,
            };
            employees.push(bound);
        }

        let mut bosses = Vec::with_capacity(rows.len());
        for (idx, (row, bound)) in rows.iter().zip(&employees).enumerate() {
            // One MERGE per expanded row; repeats after the first only match
            for _ in bound {
                let matched = self
                    .merge_node(NodeLabel::Employee, row.has_boss.as_deref())
                    .map_err(|reason| (idx, reason))?;
                bosses.push(matched);
            }
        }

        let pairs = employees.iter().flatten().zip(&bosses);
        for (&employee, matched) in pairs {
            self.link_employees(&[employee], matched, RelationshipType::ReportsTo);
        }
        Ok(())
    }

    fn apply_friend_row(&mut self, row: &FriendRow) -> Result<(), String> {
        let employees = self.merge_node(NodeLabel::Employee, row.employee_name.as_deref())?;
        let friends = self.merge_node(NodeLabel::Employee, row.is_friends_with.as_deref())?;
        self.link_employees(&employees, &friends, RelationshipType::FriendsWith);
        Ok(())
    }

    fn apply_skill_row(&mut self, row: &SkillRow) -> Result<(), String> {
        let Some(skills) = row.skills.as_deref() else {
            return Ok(());
        };

        for skill in skills.split(',') {
            let employees = self.merge_node(NodeLabel::Employee, row.employee_name.as_deref())?;
            let skill_nodes = self.merge_node(NodeLabel::Skill, Some(skill))?;
            for &employee in &employees {
                for &skill_node in &skill_nodes {
                    self.merge_relationship(employee, RelationshipType::HasSkill, skill_node);
                }
            }
        }
        Ok(())
    }
}

/// A graph held in memory that the import statements can be evaluated
/// against, starting from an empty store.
pub struct GraphModel {
    data: PreviewData,
    boss_mode: BossImportMode,
    state: Mutex<GraphState>,
}

impl GraphModel {
    pub fn new(data: PreviewData, boss_mode: BossImportMode) -> Self {
        Self {
            data,
            boss_mode,
            state: Mutex::new(GraphState::default()),
        }
    }

    /// Evaluate one import against the current graph.
    ///
    /// Like a single auto-commit statement, a failing row leaves the graph
    /// as it was before the import started.
    pub fn apply(&self, kind: ImportKind) -> Result<ImportCounters, LoaderError> {
        let mut state = self.lock_state();
        let snapshot_nodes = state.nodes.clone();
        let snapshot_relationships = state.relationships.clone();
        state.counters = ImportCounters::default();

        if let Err((row, reason)) = self.apply_rows(&mut state, kind) {
            state.nodes = snapshot_nodes;
            state.relationships = snapshot_relationships;
            state.counters = ImportCounters::default();
            return Err(LoaderError::Preview {
                import: kind,
                row,
                reason,
            });
        }

        Ok(state.counters)
    }

    fn apply_rows(&self, state: &mut GraphState, kind: ImportKind) -> Result<(), (usize, String)> {
        let numbered = |idx: usize| move |reason: String| (idx + 1, reason);
        match kind {
            ImportKind::Boss => {
                state
                    .apply_boss_rows(&self.data.boss, self.boss_mode)
                    .map_err(|(idx, reason)| (idx + 1, reason))?;
            }
            ImportKind::Friends => {
                for (idx, row) in self.data.friends.iter().enumerate() {
                    state.apply_friend_row(row).map_err(numbered(idx))?;
                }
            }
            ImportKind::Skills => {
                for (idx, row) in self.data.skills.iter().enumerate() {
                    state.apply_skill_row(row).map_err(numbered(idx))?;
                }
            }
        }
        Ok(())
    }

    /// Number of nodes with `label`
    pub fn node_count(&self, label: NodeLabel) -> usize {
        self.lock_state()
            .nodes
            .iter()
            .filter(|node| node.label == label)
            .count()
    }

    /// Number of nodes with `label` and `name`
    pub fn nodes_named(&self, label: NodeLabel, name: &str) -> usize {
        self.lock_state()
            .nodes
            .iter()
            .filter(|node| node.label == label && node.name.as_deref() == Some(name))
            .count()
    }

    /// Number of relationships of `rel_type`
    pub fn relationship_count(&self, rel_type: RelationshipType) -> usize {
        self.lock_state()
            .relationships
            .iter()
            .filter(|(_, kind, _)| *kind == rel_type)
            .count()
    }

    /// Number of `rel_type` edges from a node named `from` to a node named `to`
    pub fn relationships_between(&self, from: &str, rel_type: RelationshipType, to: &str) -> usize {
        let state = self.lock_state();
        state
            .relationships
            .iter()
            .filter(|(a, kind, b)| {
                *kind == rel_type
                    && state.nodes[*a].name.as_deref() == Some(from)
                    && state.nodes[*b].name.as_deref() == Some(to)
            })
            .count()
    }

    /// Number of edges whose two ends share a name
    pub fn self_loop_count(&self) -> usize {
        let state = self.lock_state();
        state
            .relationships
            .iter()
            .filter(|(a, _, b)| {
                let (a, b) = (&state.nodes[*a], &state.nodes[*b]);
                a.label == b.label && a.name.is_some() && a.name == b.name
            })
            .count()
    }

    fn lock_state(&self) -> MutexGuard<'_, GraphState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StatementRunner for GraphModel {
    async fn run_statement(
        &self,
        kind: ImportKind,
        _statement: &str,
    ) -> Result<ImportCounters, LoaderError> {
        self.apply(kind)
    }
}
