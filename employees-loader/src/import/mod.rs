// Import module - the fixed LOAD CSV statements and the runner driving them
pub mod runner;
pub mod statements;

pub use runner::{ImportRunner, StatementRunner};
pub use statements::ImportKind;
