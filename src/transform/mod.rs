pub mod aggregate;
pub mod boxscores;
pub mod fields;
pub mod games;
pub mod merge;
pub mod player_info;
pub mod salaries;

pub use aggregate::{get_player_stats, get_team_stats};
pub use boxscores::clean_boxscores;
pub use games::clean_games;
pub use merge::{merge_boxscores_games, merge_playerinfo_salaries};
pub use player_info::clean_playerinfo;
pub use salaries::clean_salaries;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::db::models::*;
use crate::error::EtlError;
use crate::extract::Extracted;

/// Inclusive range of years kept by the games and salaries cleaners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Self {
        YearWindow { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Directory the intermediate CSV tables are written to
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        ArtifactStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write `rows` as CSV with a header row, replacing any previous file.
    /// An empty table still gets its header.
    pub fn write<T: CsvRecord>(&self, file_name: &str, rows: &[T]) -> Result<PathBuf, EtlError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| EtlError::io(&self.dir, e))?;
        let path = self.path(file_name);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| EtlError::csv(&path, e))?;
        if rows.is_empty() {
            writer
                .write_record(T::HEADERS)
                .map_err(|e| EtlError::csv(&path, e))?;
        }
        for row in rows {
            writer.serialize(row).map_err(|e| EtlError::csv(&path, e))?;
        }
        writer.flush().map_err(|e| EtlError::io(&path, e))?;
        Ok(path)
    }
}

/// A row type persisted as a CSV artifact. `HEADERS` lists the serialized
/// field names in declaration order.
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRecord for BoxScore {
    const HEADERS: &'static [&'static str] = &[
        "game_id",
        "team_name",
        "player_name",
        "minutes_played",
        "field_goals",
        "field_goals_attempted",
        "three_pointers",
        "three_pointers_attempted",
        "free_throws",
        "free_throws_attempted",
        "total_rebounds",
        "assists",
        "points",
        "is_starter",
        "field_goals_percentage",
        "three_point_percentage",
        "free_throws_percentage",
    ];
}

impl CsvRecord for Game {
    const HEADERS: &'static [&'static str] = &[
        "game_id",
        "away_team",
        "points_away",
        "home_team",
        "points_home",
        "date_time",
        "year",
    ];
}

impl CsvRecord for PlayerInfo {
    const HEADERS: &'static [&'static str] = &[
        "player_name",
        "position",
        "height",
        "weight",
        "birth_date",
        "weight_kg",
        "height_m",
    ];
}

impl CsvRecord for Salary {
    const HEADERS: &'static [&'static str] = &[
        "player_name",
        "season_start_year",
        "salary",
        "inflation_adjusted_salary",
    ];
}

impl CsvRecord for BoxScoreGame {
    const HEADERS: &'static [&'static str] = &[
        "game_id",
        "team_name",
        "player_name",
        "minutes_played",
        "field_goals",
        "field_goals_attempted",
        "three_pointers",
        "three_pointers_attempted",
        "free_throws",
        "free_throws_attempted",
        "total_rebounds",
        "assists",
        "points",
        "is_starter",
        "field_goals_percentage",
        "three_point_percentage",
        "free_throws_percentage",
        "away_team",
        "points_away",
        "home_team",
        "points_home",
        "date_time",
        "year",
    ];
}

impl CsvRecord for PlayerInfoAndSalary {
    const HEADERS: &'static [&'static str] = &[
        "season_start_year",
        "player_name",
        "position",
        "height",
        "weight",
        "birth_date",
        "weight_kg",
        "height_m",
        "salary",
        "inflation_adjusted_salary",
    ];
}

impl CsvRecord for PlayerSeasonStats {
    const HEADERS: &'static [&'static str] = &[
        "player_name",
        "year",
        "points_per_game",
        "assists_per_game",
        "rebounds_per_game",
        "field_goals_percentage_per_game",
        "three_point_percentage_per_game",
        "free_throws_percentage_per_game",
        "total_three_pointers",
    ];
}

impl CsvRecord for TeamSeasonStats {
    const HEADERS: &'static [&'static str] = &[
        "year",
        "team_name",
        "total_games",
        "total_wins",
        "total_losses",
        "win_percentage",
    ];
}

/// Every table produced by the transform stage
#[derive(Debug, Clone)]
pub struct Transformed {
    pub box_scores: Vec<BoxScore>,
    pub games: Vec<Game>,
    pub player_info: Vec<PlayerInfo>,
    pub salaries: Vec<Salary>,
    pub box_scores_games: Vec<BoxScoreGame>,
    pub player_stats: Vec<PlayerSeasonStats>,
    pub team_stats: Vec<TeamSeasonStats>,
    pub player_info_and_salaries: Vec<PlayerInfoAndSalary>,
}

fn log_failure<'a>(step: &'a str) -> impl Fn(&EtlError) + 'a {
    move |e| error!("Transform step '{}' failed: {}", step, e)
}

/// Clean, merge and aggregate the extracted tables.
pub fn transform_data(
    extracted: Extracted,
    window: YearWindow,
    artifacts: &ArtifactStore,
) -> Result<Transformed, EtlError> {
    let Extracted {
        box_scores,
        games,
        player_info,
        salaries,
    } = extracted;

    let box_scores =
        clean_boxscores(box_scores, artifacts).inspect_err(log_failure("clean box scores"))?;
    info!("Cleaned box scores: {} rows", box_scores.len());
    let games = clean_games(games, window, artifacts).inspect_err(log_failure("clean games"))?;
    info!("Cleaned games: {} rows", games.len());
    let player_info =
        clean_playerinfo(player_info, artifacts).inspect_err(log_failure("clean player info"))?;
    info!("Cleaned player info: {} rows", player_info.len());
    let salaries =
        clean_salaries(salaries, window, artifacts).inspect_err(log_failure("clean salaries"))?;
    info!("Cleaned salaries: {} rows", salaries.len());

    let box_scores_games = merge_boxscores_games(&box_scores, &games, artifacts)
        .inspect_err(log_failure("merge box scores and games"))?;
    let player_info_and_salaries = merge_playerinfo_salaries(&player_info, &salaries, artifacts)
        .inspect_err(log_failure("merge player info and salaries"))?;
    info!(
        "Merged tables: {} box score/game rows, {} player/salary rows",
        box_scores_games.len(),
        player_info_and_salaries.len()
    );

    let player_stats = get_player_stats(&box_scores_games, artifacts)
        .inspect_err(log_failure("player stats"))?;
    let team_stats =
        get_team_stats(&box_scores_games, artifacts).inspect_err(log_failure("team stats"))?;
    info!(
        "Aggregated {} player seasons and {} team seasons",
        player_stats.len(),
        team_stats.len()
    );

    Ok(Transformed {
        box_scores,
        games,
        player_info,
        salaries,
        box_scores_games,
        player_stats,
        team_stats,
        player_info_and_salaries,
    })
}
