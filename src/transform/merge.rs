use std::collections::HashMap;

use crate::db::models::{BoxScore, BoxScoreGame, Game, PlayerInfo, PlayerInfoAndSalary, Salary};
use crate::error::EtlError;

use super::ArtifactStore;

pub const BOXSCORES_GAMES_FILE_NAME: &str = "merged_boxscores_games.csv";
pub const PLAYERINFO_SALARIES_FILE_NAME: &str = "merged_playerinfo_salaries.csv";

/// Inner join of box score lines with their games on `game_id`.
pub fn merge_boxscores_games(
    box_scores: &[BoxScore],
    games: &[Game],
    artifacts: &ArtifactStore,
) -> Result<Vec<BoxScoreGame>, EtlError> {
    let merged = join_boxscores_games(box_scores, games);
    artifacts.write(BOXSCORES_GAMES_FILE_NAME, &merged)?;
    Ok(merged)
}

pub fn join_boxscores_games(box_scores: &[BoxScore], games: &[Game]) -> Vec<BoxScoreGame> {
    let mut games_by_id: HashMap<i64, Vec<&Game>> = HashMap::new();
    for game in games {
        games_by_id.entry(game.game_id).or_default().push(game);
    }

    box_scores
        .iter()
        .flat_map(|line| {
            games_by_id
                .get(&line.game_id)
                .into_iter()
                .flatten()
                .map(move |game| BoxScoreGame::join(line, game))
        })
        .collect()
}

/// Inner join of player details with salaries on `player_name`, one row per
/// player-season.
pub fn merge_playerinfo_salaries(
    player_info: &[PlayerInfo],
    salaries: &[Salary],
    artifacts: &ArtifactStore,
) -> Result<Vec<PlayerInfoAndSalary>, EtlError> {
    let merged = join_playerinfo_salaries(player_info, salaries);
    artifacts.write(PLAYERINFO_SALARIES_FILE_NAME, &merged)?;
    Ok(merged)
}

pub fn join_playerinfo_salaries(
    player_info: &[PlayerInfo],
    salaries: &[Salary],
) -> Vec<PlayerInfoAndSalary> {
    let mut salaries_by_player: HashMap<&str, Vec<&Salary>> = HashMap::new();
    for salary in salaries {
        salaries_by_player
            .entry(salary.player_name.as_str())
            .or_default()
            .push(salary);
    }

    player_info
        .iter()
        .flat_map(|player| {
            salaries_by_player
                .get(player.player_name.as_str())
                .into_iter()
                .flatten()
                .map(move |salary| PlayerInfoAndSalary {
                    season_start_year: salary.season_start_year,
                    player_name: player.player_name.clone(),
                    position: player.position.clone(),
                    height: player.height.clone(),
                    weight: player.weight,
                    birth_date: player.birth_date.clone(),
                    weight_kg: player.weight_kg,
                    height_m: player.height_m,
                    salary: salary.salary.clone(),
                    inflation_adjusted_salary: salary.inflation_adjusted_salary.clone(),
                })
        })
        .collect()
}
