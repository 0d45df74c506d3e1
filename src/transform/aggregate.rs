use std::collections::{BTreeMap, HashSet};

use crate::db::models::{BoxScoreGame, PlayerSeasonStats, TeamSeasonStats};
use crate::error::EtlError;

use super::fields::round_to;
use super::ArtifactStore;

pub const PLAYER_STATS_FILE_NAME: &str = "player_stats.csv";
pub const TEAM_STATS_FILE_NAME: &str = "team_stats.csv";

// ── Player stats ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct PlayerTotals {
    games: u32,
    points: f64,
    assists: f64,
    rebounds: f64,
    field_goals_percentage: f64,
    three_point_percentage: f64,
    free_throws_percentage: f64,
    three_pointers: u32,
}

impl PlayerTotals {
    fn add(&mut self, row: &BoxScoreGame) {
        self.games += 1;
        self.points += f64::from(row.points);
        self.assists += f64::from(row.assists);
        self.rebounds += f64::from(row.total_rebounds);
        self.field_goals_percentage += row.field_goals_percentage;
        self.three_point_percentage += row.three_point_percentage;
        self.free_throws_percentage += row.free_throws_percentage;
        self.three_pointers += row.three_pointers;
    }

    fn mean(&self, total: f64, decimals: i32) -> f64 {
        round_to(total / f64::from(self.games), decimals)
    }
}

/// Per-game averages and three-point totals per player and year.
pub fn get_player_stats(
    rows: &[BoxScoreGame],
    artifacts: &ArtifactStore,
) -> Result<Vec<PlayerSeasonStats>, EtlError> {
    let stats = player_stats(rows);
    artifacts.write(PLAYER_STATS_FILE_NAME, &stats)?;
    Ok(stats)
}

/// Rows without a year are not grouped. Output is sorted by player, then year.
pub fn player_stats(rows: &[BoxScoreGame]) -> Vec<PlayerSeasonStats> {
    let mut groups: BTreeMap<(&str, i32), PlayerTotals> = BTreeMap::new();
    for row in rows {
        if let Some(year) = row.year {
            groups
                .entry((row.player_name.as_str(), year))
                .or_default()
                .add(row);
        }
    }

    groups
        .into_iter()
        .map(|((player_name, year), totals)| PlayerSeasonStats {
            player_name: player_name.to_string(),
            year,
            points_per_game: totals.mean(totals.points, 1),
            assists_per_game: totals.mean(totals.assists, 1),
            rebounds_per_game: totals.mean(totals.rebounds, 1),
            field_goals_percentage_per_game: totals.mean(totals.field_goals_percentage, 2),
            three_point_percentage_per_game: totals.mean(totals.three_point_percentage, 2),
            free_throws_percentage_per_game: totals.mean(totals.free_throws_percentage, 2),
            total_three_pointers: totals.three_pointers,
        })
        .collect()
}

// ── Team stats ───────────────────────────────────────────────────────────────

/// One team's side of one game, with the box score columns dropped
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TeamGame<'a> {
    game_id: i64,
    team_name: &'a str,
    away_team: &'a str,
    points_away: u32,
    home_team: &'a str,
    points_home: u32,
    date_time: &'a str,
    year: Option<i32>,
    won_game: Option<bool>,
}

impl<'a> From<&'a BoxScoreGame> for TeamGame<'a> {
    fn from(row: &'a BoxScoreGame) -> Self {
        TeamGame {
            game_id: row.game_id,
            team_name: &row.team_name,
            away_team: &row.away_team,
            points_away: row.points_away,
            home_team: &row.home_team,
            points_home: row.points_home,
            date_time: &row.date_time,
            year: row.year,
            won_game: determine_winner(row),
        }
    }
}

/// Whether the row's team won its game; `None` when the team is neither the
/// home nor the away side.
pub fn determine_winner(row: &BoxScoreGame) -> Option<bool> {
    if row.team_name == row.home_team {
        Some(row.points_home > row.points_away)
    } else if row.team_name == row.away_team {
        Some(row.points_away > row.points_home)
    } else {
        None
    }
}

/// Games, wins, losses and win percentage per team and year.
pub fn get_team_stats(
    rows: &[BoxScoreGame],
    artifacts: &ArtifactStore,
) -> Result<Vec<TeamSeasonStats>, EtlError> {
    let stats = team_stats(rows);
    artifacts.write(TEAM_STATS_FILE_NAME, &stats)?;
    Ok(stats)
}

/// Rows whose winner cannot be determined, or that have no year, count
/// towards neither games nor wins. Output is sorted by year, then team.
pub fn team_stats(rows: &[BoxScoreGame]) -> Vec<TeamSeasonStats> {
    let team_games: HashSet<TeamGame> = rows.iter().map(TeamGame::from).collect();

    let mut games_played: BTreeMap<(i32, &str), u32> = BTreeMap::new();
    let mut wins: BTreeMap<(i32, &str), u32> = BTreeMap::new();
    for team_game in &team_games {
        let (Some(year), Some(won)) = (team_game.year, team_game.won_game) else {
            continue;
        };
        let key = (year, team_game.team_name);
        *games_played.entry(key).or_default() += 1;
        *wins.entry(key).or_default() += u32::from(won);
    }

    games_played
        .into_iter()
        .filter_map(|(key, total_games)| {
            let total_wins = *wins.get(&key)?;
            let (year, team_name) = key;
            Some(TeamSeasonStats {
                year,
                team_name: team_name.to_string(),
                total_games,
                total_wins,
                total_losses: total_games - total_wins,
                win_percentage: round_to(
                    f64::from(total_wins) / f64::from(total_games) * 100.0,
                    2,
                ),
            })
        })
        .collect()
}
