//! # Employees Loader
//!
//! Loads the employees graph into Neo4j. Three fixed `LOAD CSV` statements
//! make the server pull remote CSV files and build Employee and Skill nodes
//! linked by REPORTS_TO, FRIENDS_WITH and HAS_SKILL relationships.
//!
//! The [`preview`] module evaluates the same statements in memory, which is
//! what the `--dry-run` flag of the binary uses.

pub mod config;
pub mod errors;
pub mod import;
pub mod loader;
pub mod models;
pub mod neo4j;
pub mod preview;

pub use config::{BossImportMode, EnvFile, LoaderConfig};
pub use errors::LoaderError;
pub use import::{ImportKind, ImportRunner, StatementRunner};
pub use loader::load_employees;
pub use models::{ImportCounters, ImportReport};
