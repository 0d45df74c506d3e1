pub mod kaggle;

pub use kaggle::{DatasetSource, KaggleClient, KaggleCredentials};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::models::{RawBoxScore, RawGame, RawPlayerInfo, RawSalary};
use crate::error::EtlError;

/// Locations of the four raw source files
#[derive(Debug, Clone, PartialEq)]
pub struct RawPaths {
    pub boxscores: PathBuf,
    pub games: PathBuf,
    pub player_info: PathBuf,
    pub salaries: PathBuf,
}

impl RawPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        RawPaths {
            boxscores: dir.join("boxscore.csv"),
            games: dir.join("games.csv"),
            player_info: dir.join("player_info.csv"),
            salaries: dir.join("salaries.csv"),
        }
    }
}

/// The four raw tables, as read from disk
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub box_scores: Vec<RawBoxScore>,
    pub games: Vec<RawGame>,
    pub player_info: Vec<RawPlayerInfo>,
    pub salaries: Vec<RawSalary>,
}

/// Read a whole CSV file. Returns the rows and the number of header columns.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize), EtlError> {
    let file = std::fs::File::open(path).map_err(|e| EtlError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let columns = reader.headers().map_err(|e| EtlError::csv(path, e))?.len();
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| EtlError::csv(path, e))?;
    Ok((rows, columns))
}

/// Read one raw table, logging its shape and how long the read took.
fn extract_table<T: DeserializeOwned>(
    label: &str,
    path: &Path,
    expected_secs: f64,
) -> Result<Vec<T>, EtlError> {
    let start = Instant::now();
    let (rows, columns) = read_csv::<T>(path).inspect_err(|e| {
        error!("Error loading {}: {}", path.display(), e);
    })?;
    let elapsed = start.elapsed().as_secs_f64();

    info!(
        "Extracted {}: {} rows x {} columns in {:.3}s",
        label,
        rows.len(),
        columns,
        elapsed
    );
    if elapsed > expected_secs {
        warn!(
            "Extracting {} took {:.3}s, expected under {:.3}s",
            label, elapsed, expected_secs
        );
    }
    Ok(rows)
}

pub fn extract_boxscores(path: &Path, expected_secs: f64) -> Result<Vec<RawBoxScore>, EtlError> {
    extract_table("BOX SCORES", path, expected_secs)
}

pub fn extract_games(path: &Path, expected_secs: f64) -> Result<Vec<RawGame>, EtlError> {
    extract_table("GAMES", path, expected_secs)
}

pub fn extract_playerinfo(
    path: &Path,
    expected_secs: f64,
) -> Result<Vec<RawPlayerInfo>, EtlError> {
    extract_table("PLAYER INFO", path, expected_secs)
}

pub fn extract_salaries(path: &Path, expected_secs: f64) -> Result<Vec<RawSalary>, EtlError> {
    extract_table("SALARIES", path, expected_secs)
}

/// Fetch the dataset into `dest`. Failures are logged and swallowed: whatever
/// is already on disk is read afterwards.
pub async fn download_dataset(source: &dyn DatasetSource, dest: &Path) {
    match source.download(dest).await {
        Ok(files) => info!("{}: {} raw files refreshed", source.name(), files),
        Err(e @ EtlError::Connection(_)) => error!("{} connection failed: {}", source.name(), e),
        Err(e) => error!("{} download failed: {}", source.name(), e),
    }
}

async fn refresh_raw_files(config: &Config) {
    let credentials = match KaggleCredentials::resolve(
        config.kaggle_username.as_deref(),
        config.kaggle_key.as_deref(),
        kaggle::default_credentials_file().as_deref(),
    ) {
        Ok(credentials) => {
            info!("Kaggle API credentials found.");
            credentials
        }
        Err(e) => {
            error!("Connection failed: {}", e);
            return;
        }
    };

    match KaggleClient::new(&config.kaggle_api_url, &config.kaggle_dataset, credentials) {
        Ok(client) => download_dataset(&client, &config.raw_dir).await,
        Err(e) => error!("Connection failed: {}", e),
    }
}

/// Download the dataset (unless disabled) and read the four raw tables.
pub async fn extract_data(config: &Config) -> Result<Extracted, EtlError> {
    info!("Starting data extraction process");
    if config.skip_download {
        info!("Dataset download skipped, reading {}", config.raw_dir.display());
    } else {
        refresh_raw_files(config).await;
    }

    let paths = config.raw_paths();
    let secs = config.expected_extract_secs;
    let extracted = read_all(&paths, secs).inspect_err(|e| error!("Data extraction failed: {}", e))?;
    info!("Data extraction completed successfully");
    Ok(extracted)
}

fn read_all(paths: &RawPaths, secs: f64) -> Result<Extracted, EtlError> {
    Ok(Extracted {
        box_scores: extract_boxscores(&paths.boxscores, secs)?,
        games: extract_games(&paths.games, secs)?,
        player_info: extract_playerinfo(&paths.player_info, secs)?,
        salaries: extract_salaries(&paths.salaries, secs)?,
    })
}
