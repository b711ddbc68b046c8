use std::path::PathBuf;

use thiserror::Error;

use crate::import::ImportKind;

/// Represents every way a load can fail.
///
/// Each variant names the stage that failed. None of them is retried: the
/// binary logs the error and exits.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The env file holding the credentials could not be read or parsed.
    #[error("Error loading env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    /// A configuration value was present but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver could not be configured or created.
    #[error("Error creating Neo4j driver: {0}")]
    Driver(#[source] neo4rs::Error),

    /// The driver was created but the server did not answer.
    #[error("Error verifying the connectivity: {0}")]
    Connectivity(#[source] neo4rs::Error),

    /// An import statement failed to run or its summary could not be read.
    #[error("Error running the {import} import: {source}")]
    Statement {
        import: ImportKind,
        #[source]
        source: neo4rs::Error,
    },

    /// A status line could not be written.
    #[error("Error writing output: {0}")]
    Output(#[from] std::io::Error),

    /// A CSV file could not be downloaded for a dry run.
    #[error("Error fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A downloaded CSV file could not be parsed.
    #[error("Error parsing {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// The in-memory preview hit a row the database would reject.
    #[error("The {import} import would fail at row {row}: {reason}")]
    Preview {
        import: ImportKind,
        row: usize,
        reason: String,
    },
}
