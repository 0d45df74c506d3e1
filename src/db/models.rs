use serde::{Deserialize, Serialize};

// ── Raw source rows ──────────────────────────────────────────────────────────
//
// Only the columns the pipeline reads are declared; every other column in the
// source file is ignored during deserialization.

/// One player's line in one game, as found in `boxscore.csv`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawBoxScore {
    pub game_id: i64,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "playerName")]
    pub player_name: String,
    /// "MM:SS" or a non-participation status such as "Did Not Play"
    #[serde(rename = "MP", default)]
    pub minutes_played: String,
    #[serde(rename = "FG", default)]
    pub field_goals: String,
    #[serde(rename = "FGA", default)]
    pub field_goals_attempted: String,
    #[serde(rename = "3P", default)]
    pub three_pointers: String,
    #[serde(rename = "3PA", default)]
    pub three_pointers_attempted: String,
    #[serde(rename = "FT", default)]
    pub free_throws: String,
    #[serde(rename = "FTA", default)]
    pub free_throws_attempted: String,
    #[serde(rename = "TRB", default)]
    pub total_rebounds: String,
    #[serde(rename = "AST", default)]
    pub assists: String,
    #[serde(rename = "PTS", default)]
    pub points: String,
    #[serde(rename = "isStarter", default)]
    pub is_starter: String,
}

/// One game, as found in `games.csv`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGame {
    #[serde(rename = "awayTeam")]
    pub away_team: String,
    #[serde(rename = "pointsAway", default)]
    pub points_away: String,
    #[serde(rename = "homeTeam")]
    pub home_team: String,
    #[serde(rename = "pointsHome", default)]
    pub points_home: String,
    #[serde(rename = "datetime", default)]
    pub date_time: String,
    #[serde(rename = "isRegular", default)]
    pub is_regular: String,
    pub game_id: i64,
}

/// One player, as found in `player_info.csv`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPlayerInfo {
    #[serde(rename = "playerName")]
    pub player_name: String,
    #[serde(rename = "Pos", default)]
    pub position: String,
    /// "feet-inches", e.g. "6-10"
    #[serde(rename = "Ht", default)]
    pub height: String,
    /// Pounds
    #[serde(rename = "Wt", default)]
    pub weight: String,
    #[serde(rename = "birthDate", default)]
    pub birth_date: String,
}

/// One player's salary for one season, as found in `salaries.csv`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSalary {
    #[serde(rename = "playerName")]
    pub player_name: String,
    #[serde(rename = "seasonStartYear", default)]
    pub season_start_year: String,
    /// Currency formatted, e.g. "$1,234,567"
    #[serde(default)]
    pub salary: String,
    #[serde(rename = "inflationAdjSalary", default)]
    pub inflation_adjusted_salary: String,
}

// ── Cleaned rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub game_id: i64,
    pub team_name: String,
    pub player_name: String,
    pub minutes_played: String,
    pub field_goals: u32,
    pub field_goals_attempted: u32,
    pub three_pointers: u32,
    pub three_pointers_attempted: u32,
    pub free_throws: u32,
    pub free_throws_attempted: u32,
    pub total_rebounds: u32,
    pub assists: u32,
    pub points: u32,
    /// 1 if the player started the game, 0 otherwise
    pub is_starter: u32,
    pub field_goals_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throws_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: i64,
    pub away_team: String,
    pub points_away: u32,
    pub home_team: String,
    pub points_home: u32,
    /// "DD-MM-YYYY"
    pub date_time: String,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_name: String,
    /// Expanded labels, e.g. "Forward, Center"
    pub position: String,
    pub height: String,
    /// Pounds
    pub weight: f64,
    pub birth_date: String,
    pub weight_kg: f64,
    /// `None` when `height` is not a valid "feet-inches" value
    pub height_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub player_name: String,
    pub season_start_year: i32,
    pub salary: String,
    pub inflation_adjusted_salary: String,
}

// ── Merged rows ──────────────────────────────────────────────────────────────

/// A box score line joined with the game it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreGame {
    pub game_id: i64,
    pub team_name: String,
    pub player_name: String,
    pub minutes_played: String,
    pub field_goals: u32,
    pub field_goals_attempted: u32,
    pub three_pointers: u32,
    pub three_pointers_attempted: u32,
    pub free_throws: u32,
    pub free_throws_attempted: u32,
    pub total_rebounds: u32,
    pub assists: u32,
    pub points: u32,
    pub is_starter: u32,
    pub field_goals_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throws_percentage: f64,
    pub away_team: String,
    pub points_away: u32,
    pub home_team: String,
    pub points_home: u32,
    pub date_time: String,
    pub year: Option<i32>,
}

impl BoxScoreGame {
    pub fn join(box_score: &BoxScore, game: &Game) -> Self {
        BoxScoreGame {
            game_id: box_score.game_id,
            team_name: box_score.team_name.clone(),
            player_name: box_score.player_name.clone(),
            minutes_played: box_score.minutes_played.clone(),
            field_goals: box_score.field_goals,
            field_goals_attempted: box_score.field_goals_attempted,
            three_pointers: box_score.three_pointers,
            three_pointers_attempted: box_score.three_pointers_attempted,
            free_throws: box_score.free_throws,
            free_throws_attempted: box_score.free_throws_attempted,
            total_rebounds: box_score.total_rebounds,
            assists: box_score.assists,
            points: box_score.points,
            is_starter: box_score.is_starter,
            field_goals_percentage: box_score.field_goals_percentage,
            three_point_percentage: box_score.three_point_percentage,
            free_throws_percentage: box_score.free_throws_percentage,
            away_team: game.away_team.clone(),
            points_away: game.points_away,
            home_team: game.home_team.clone(),
            points_home: game.points_home,
            date_time: game.date_time.clone(),
            year: game.year,
        }
    }
}

/// Loaded into `aa_player_info_and_salaries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfoAndSalary {
    pub season_start_year: i32,
    pub player_name: String,
    pub position: String,
    pub height: String,
    pub weight: f64,
    pub birth_date: String,
    pub weight_kg: f64,
    pub height_m: Option<f64>,
    pub salary: String,
    pub inflation_adjusted_salary: String,
}

// ── Aggregates ───────────────────────────────────────────────────────────────

/// Loaded into `aa_player_stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub player_name: String,
    pub year: i32,
    pub points_per_game: f64,
    pub assists_per_game: f64,
    pub rebounds_per_game: f64,
    pub field_goals_percentage_per_game: f64,
    pub three_point_percentage_per_game: f64,
    pub free_throws_percentage_per_game: f64,
    pub total_three_pointers: u32,
}

/// Loaded into `aa_team_stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    pub year: i32,
    pub team_name: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub win_percentage: f64,
}
