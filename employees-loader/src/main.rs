use anyhow::{bail, Context, Result};
use employees_loader::preview::{GraphModel, PreviewData};
use employees_loader::{config, load_employees, EnvFile, ImportRunner, LoaderConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for the import status lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dry_run = match args.get(1).map(String::as_str) {
        None => false,
        Some("--dry-run") if args.len() == 2 => true,
        Some(_) => bail!("Usage: {} [--dry-run]", args[0]),
    };

    let env_file = config::get_env_file_path();

    if dry_run {
        return preview(&env_file).await;
    }

    info!("Starting employees import");

    // Load credentials
    let config = LoaderConfig::load(&env_file).context("Error loading .env file")?;

    // Connect, then run the imports on a single write session
    load_employees(&config, &mut std::io::stdout()).await?;

    Ok(())
}

/// Evaluate the imports in memory against freshly downloaded CSVs
async fn preview(env_file: &std::path::Path) -> Result<()> {
    info!("Dry run: no database connection will be made");

    let env = EnvFile::load(env_file).unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        EnvFile::default()
    });
    let config = LoaderConfig::from_env_file(&env)?;

    let data = PreviewData::fetch().await?;
    info!(
        "✓ Fetched {} boss rows, {} friend rows, {} skill rows",
        data.boss.len(),
        data.friends.len(),
        data.skills.len()
    );

    let model = GraphModel::new(data, config.boss_mode);
    ImportRunner::new(&model, config.boss_mode).execute().await?;

    Ok(())
}
