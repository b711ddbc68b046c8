// CSV sources for the dry-run preview
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::{CSV_BASE_URL, PREVIEW_FETCH_TIMEOUT_SECS};
use crate::errors::LoaderError;
use crate::import::ImportKind;
use crate::models::{BossRow, FriendRow, SkillRow};

/// Parsed rows of the three CSV files
#[derive(Debug, Clone, Default)]
pub struct PreviewData {
    pub boss: Vec<BossRow>,
    pub friends: Vec<FriendRow>,
    pub skills: Vec<SkillRow>,
}

impl PreviewData {
    /// Parse the three files from in-memory CSV text
    pub fn from_csv(boss: &str, friends: &str, skills: &str) -> Result<Self, LoaderError> {
        Ok(Self {
            boss: parse_csv(ImportKind::Boss, boss)?,
            friends: parse_csv(ImportKind::Friends, friends)?,
            skills: parse_csv(ImportKind::Skills, skills)?,
        })
    }

    /// Download the three files from their remote URLs
    pub async fn fetch() -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PREVIEW_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|source| LoaderError::Fetch {
                url: CSV_BASE_URL.to_string(),
                source,
            })?;

        let boss = fetch_csv(&client, ImportKind::Boss).await?;
        let friends = fetch_csv(&client, ImportKind::Friends).await?;
        let skills = fetch_csv(&client, ImportKind::Skills).await?;

        Self::from_csv(&boss, &friends, &skills)
    }
}

async fn fetch_csv(client: &reqwest::Client, kind: ImportKind) -> Result<String, LoaderError> {
    let url = kind.csv_url();
    info!("Fetching {}", url);

    let fetch_error = |source| LoaderError::Fetch {
        url: url.clone(),
        source,
    };

    client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_error)?
        .text()
        .await
        .map_err(fetch_error)
}

fn parse_csv<T: DeserializeOwned>(kind: ImportKind, text: &str) -> Result<Vec<T>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoaderError::Csv {
            file: kind.csv_file().to_string(),
            source,
        })
}
