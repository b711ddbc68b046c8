// Loader - connects, opens the session and runs every import
use std::io::Write;

use tracing::info;

use crate::config::LoaderConfig;
use crate::errors::LoaderError;
use crate::import::ImportRunner;
use crate::models::ImportReport;
use crate::neo4j::{self, Neo4jSession};

/// Run a full load against the database described by `config`, writing the
/// status lines to `out`.
///
/// Nothing is written to `out` until connectivity has been verified, so a
/// failed connection runs no import and prints no counters.
pub async fn load_employees<W: Write>(
    config: &LoaderConfig,
    out: &mut W,
) -> Result<Vec<ImportReport>, LoaderError> {
    info!("Connecting to Neo4j...");
    let graph = neo4j::connect(config).await?;
    writeln!(out, "Connection established")?;
    info!("✓ Connected to Neo4j");

    let session = Neo4jSession::open(&graph);
    let reports = ImportRunner::new(&session, config.boss_mode)
        .execute_with_output(out)
        .await?;
    session.close();

    Ok(reports)
}
