use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::db::DbConfig;
use crate::extract::RawPaths;
use crate::transform::{ArtifactStore, YearWindow};

/// Schema used by every mode except `test`
pub const BASE_SCHEMA: &str = "nba_stats";

/// Runtime environment, selects the env file and the target schema
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Prod,
    Dev,
    Test,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Prod => "prod",
            Mode::Dev => "dev",
            Mode::Test => "test",
        }
    }

    pub fn env_file(&self) -> &'static str {
        match self {
            Mode::Prod => ".env",
            Mode::Dev => ".env.dev",
            Mode::Test => ".env.test",
        }
    }

    pub fn default_schema(&self) -> &'static str {
        match self {
            Mode::Test => "public",
            Mode::Prod | Mode::Dev => BASE_SCHEMA,
        }
    }
}

/// NBA statistics ETL pipeline
#[derive(Parser, Debug, Clone)]
#[command(name = "nba-stats-etl", version, about)]
pub struct Config {
    /// Environment to run in
    #[arg(value_enum, default_value = "prod")]
    pub mode: Mode,

    /// Directory holding the raw CSV files
    #[arg(long, env = "RAW_DATA_DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Directory the cleaned, merged and aggregated CSV artifacts are written to
    #[arg(long, env = "PROCESSED_DATA_DIR", default_value = "data/processed")]
    pub processed_dir: PathBuf,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "nba.db")]
    pub database_path: PathBuf,

    /// Target schema (defaults to `public` in test mode, `nba_stats` otherwise)
    #[arg(long, env = "DB_SCHEMA")]
    pub schema: Option<String>,

    /// Kaggle dataset holding the raw CSV files
    #[arg(
        long,
        env = "KAGGLE_DATASET",
        default_value = "patrickhallila1994/nba-data-from-basketball-reference"
    )]
    pub kaggle_dataset: String,

    /// Kaggle API base URL
    #[arg(
        long,
        env = "KAGGLE_API_URL",
        default_value = "https://www.kaggle.com/api/v1"
    )]
    pub kaggle_api_url: String,

    /// Kaggle username (falls back to ~/.kaggle/kaggle.json)
    #[arg(long, env = "KAGGLE_USERNAME")]
    pub kaggle_username: Option<String>,

    /// Kaggle API key (falls back to ~/.kaggle/kaggle.json)
    #[arg(long, env = "KAGGLE_KEY")]
    pub kaggle_key: Option<String>,

    /// Skip the dataset download and read whatever is already in the raw directory
    #[arg(long, env = "SKIP_DOWNLOAD", default_value = "false")]
    pub skip_download: bool,

    /// First calendar year kept by the games and salaries cleaners
    #[arg(long, env = "START_YEAR", default_value = "2015")]
    pub start_year: i32,

    /// Last calendar year kept by the games and salaries cleaners (inclusive)
    #[arg(long, env = "END_YEAR", default_value = "2019")]
    pub end_year: i32,

    /// Extraction time per file above which a warning is logged (seconds)
    #[arg(long, env = "EXPECTED_EXTRACT_SECS", default_value = "1.0")]
    pub expected_extract_secs: f64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start_year > self.end_year {
            anyhow::bail!(
                "start_year ({}) must not be after end_year ({})",
                self.start_year,
                self.end_year
            );
        }
        if self.expected_extract_secs <= 0.0 {
            anyhow::bail!("expected_extract_secs must be positive");
        }
        self.db_config().validate()?;
        Ok(())
    }

    pub fn schema(&self) -> &str {
        self.schema
            .as_deref()
            .unwrap_or_else(|| self.mode.default_schema())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            path: self.database_path.clone(),
            schema: self.schema().to_string(),
        }
    }

    pub fn year_window(&self) -> YearWindow {
        YearWindow::new(self.start_year, self.end_year)
    }

    pub fn raw_paths(&self) -> RawPaths {
        RawPaths::in_dir(&self.raw_dir)
    }

    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(&self.processed_dir)
    }
}

/// Mode named by the positional argument. Option values such as
/// `--schema test` are never taken for the mode; unparseable command lines
/// fall back to `prod` and are reported by the real parse later.
pub fn mode_from_args<I, T>(args: I) -> Mode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Config::try_parse_from(args)
        .map(|config| config.mode)
        .unwrap_or(Mode::Prod)
}

/// Load the env file matching the mode named on the command line, before
/// clap reads the environment. Missing files are ignored.
pub fn load_env_file<I, T>(args: I) -> Mode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mode = mode_from_args(args);
    dotenv::from_filename(mode.env_file()).ok();
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["nba-stats-etl"]);
        assert_eq!(config.mode, Mode::Prod);
        assert_eq!(config.schema(), BASE_SCHEMA);
        assert_eq!(config.start_year, 2015);
        assert_eq!(config.end_year, 2019);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_test_mode_uses_public_schema() {
        let config = Config::parse_from(["nba-stats-etl", "test"]);
        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.schema(), "public");
    }

    #[test]
    fn test_schema_override() {
        let config = Config::parse_from(["nba-stats-etl", "dev", "--schema", "scratch"]);
        assert_eq!(config.schema(), "scratch");
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let config =
            Config::parse_from(["nba-stats-etl", "--start-year", "2020", "--end-year", "2015"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_schema() {
        let config = Config::parse_from(["nba-stats-etl", "--schema", "drop table;"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_from_args() {
        assert_eq!(load_env_file(["bin", "--skip-download", "dev"]), Mode::Dev);
        assert_eq!(load_env_file(["bin"]), Mode::Prod);
    }

    #[test]
    fn test_option_values_are_not_the_mode() {
        assert_eq!(mode_from_args(["bin", "--schema", "test"]), Mode::Prod);
        assert_eq!(mode_from_args(["bin", "--raw-dir", "dev"]), Mode::Prod);
        assert_eq!(mode_from_args(["bin", "--raw-dir", "dev", "test"]), Mode::Test);
        assert_eq!(mode_from_args(["bin", "--schema=test", "dev"]), Mode::Dev);
    }
}
