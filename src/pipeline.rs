use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::extract::extract_data;
use crate::load::load_data;
use crate::transform::{transform_data, Transformed};

/// Run extract, transform and load once.
pub async fn run(config: &Config) -> Result<Transformed> {
    info!(
        "Running ETL pipeline in {} mode (schema '{}')",
        config.mode.as_str(),
        config.schema()
    );

    let extracted = extract_data(config)
        .await
        .context("Extract stage failed")?;

    let transformed = transform_data(extracted, config.year_window(), &config.artifacts())
        .context("Transform stage failed")?;
    info!(
        "Data transformation completed successfully: {} box scores, {} games, {} players, {} salaries",
        transformed.box_scores.len(),
        transformed.games.len(),
        transformed.player_info.len(),
        transformed.salaries.len()
    );

    load_data(&config.db_config(), &transformed).context("Load stage failed")?;
    info!("ETL pipeline completed successfully");

    Ok(transformed)
}
