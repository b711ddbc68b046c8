// Neo4j connection setup
use neo4rs::{ConfigBuilder, Graph, Query};
use tracing::info;

use crate::config::{LoaderConfig, NEO4J_MAX_CONNECTIONS};
use crate::errors::LoaderError;

/// Connect to Neo4j and verify the server answers before returning.
///
/// The driver pool is lazy, so a `RETURN 1` ping forces the bolt handshake
/// and authentication. Neither step is retried.
pub async fn connect(config: &LoaderConfig) -> Result<Graph, LoaderError> {
    info!("Connecting to Neo4j at {}", config.uri);

    let mut builder = ConfigBuilder::default()
        .uri(config.uri.as_str())
        .user(config.user.as_str())
        .password(config.password.as_str())
        .max_connections(NEO4J_MAX_CONNECTIONS);
    if let Some(database) = &config.database {
        builder = builder.db(database.as_str());
    }

    let neo4j_config = builder.build().map_err(LoaderError::Driver)?;
    let graph = Graph::connect(neo4j_config).map_err(LoaderError::Driver)?;

    verify_connectivity(&graph).await?;

    Ok(graph)
}

/// Run a trivial query to make sure the server is reachable
pub async fn verify_connectivity(graph: &Graph) -> Result<(), LoaderError> {
    graph
        .run(Query::new("RETURN 1".to_string()))
        .await
        .map_err(LoaderError::Connectivity)?;
    Ok(())
}
