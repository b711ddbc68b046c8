// Write session shared by the import statements
use async_trait::async_trait;
use neo4rs::{Graph, Query};
use tracing::{debug, info};

use crate::errors::LoaderError;
use crate::import::{ImportKind, StatementRunner};
use crate::models::ImportCounters;

/// The single session every import statement runs on.
///
/// Each statement is sent through `Graph::run`, which executes it as its own
/// auto-commit transaction in write mode and hands back the result summary.
/// Nothing ties the three statements together: a failure in one leaves the
/// writes of the earlier ones in place.
pub struct Neo4jSession<'a> {
    graph: &'a Graph,
}

impl<'a> Neo4jSession<'a> {
    pub fn open(graph: &'a Graph) -> Self {
        debug!("Opening write session");
        Self { graph }
    }

    /// Close the session explicitly; dropping it has the same effect
    pub fn close(self) {}
}

impl Drop for Neo4jSession<'_> {
    fn drop(&mut self) {
        debug!("Write session closed");
    }
}

#[async_trait]
impl StatementRunner for Neo4jSession<'_> {
    async fn run_statement(
        &self,
        kind: ImportKind,
        statement: &str,
    ) -> Result<ImportCounters, LoaderError> {
        info!("Running {} import", kind);

        let summary = self
            .graph
            .run(Query::new(statement.to_string()))
            .await
            .map_err(|source| LoaderError::Statement {
                import: kind,
                source,
            })?;

        let stats = summary.stats();
        Ok(ImportCounters::new(
            stats.nodes_created,
            stats.relationships_created,
        ))
    }
}
