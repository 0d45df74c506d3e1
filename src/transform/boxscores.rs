use crate::db::models::{BoxScore, RawBoxScore};
use crate::error::EtlError;

use super::fields::{coerce_count, percentage};
use super::ArtifactStore;

pub const FILE_NAME: &str = "cleaned_boxscores.csv";

/// Minutes-played values marking a player who did not take the floor
pub const NON_PARTICIPATION: [&str; 4] = [
    "Did Not Play",
    "Player Suspended",
    "Not With Team",
    "Did Not Dress",
];

/// Clean one season of box score lines and persist them.
pub fn clean_boxscores(
    raw: Vec<RawBoxScore>,
    artifacts: &ArtifactStore,
) -> Result<Vec<BoxScore>, EtlError> {
    let cleaned = clean_rows(raw);
    artifacts.write(FILE_NAME, &cleaned)?;
    Ok(cleaned)
}

pub fn clean_rows(raw: Vec<RawBoxScore>) -> Vec<BoxScore> {
    remove_non_participants(raw)
        .into_iter()
        .map(to_box_score)
        .map(with_percentages)
        .collect()
}

pub fn remove_non_participants(raw: Vec<RawBoxScore>) -> Vec<RawBoxScore> {
    raw.into_iter()
        .filter(|row| !is_non_participation(&row.minutes_played))
        .collect()
}

pub fn is_non_participation(minutes_played: &str) -> bool {
    let minutes_played = minutes_played.trim();
    NON_PARTICIPATION.iter().any(|status| *status == minutes_played)
}

/// Coerce the stat columns, rename and trim. Percentages are filled in by
/// `with_percentages`.
fn to_box_score(raw: RawBoxScore) -> BoxScore {
    BoxScore {
        game_id: raw.game_id,
        team_name: raw.team_name.trim().to_string(),
        player_name: raw.player_name.trim().to_string(),
        minutes_played: raw.minutes_played.trim().to_string(),
        field_goals: coerce_count(&raw.field_goals),
        field_goals_attempted: coerce_count(&raw.field_goals_attempted),
        three_pointers: coerce_count(&raw.three_pointers),
        three_pointers_attempted: coerce_count(&raw.three_pointers_attempted),
        free_throws: coerce_count(&raw.free_throws),
        free_throws_attempted: coerce_count(&raw.free_throws_attempted),
        total_rebounds: coerce_count(&raw.total_rebounds),
        assists: coerce_count(&raw.assists),
        points: coerce_count(&raw.points),
        is_starter: coerce_count(&raw.is_starter).min(1),
        field_goals_percentage: 0.0,
        three_point_percentage: 0.0,
        free_throws_percentage: 0.0,
    }
}

fn with_percentages(row: BoxScore) -> BoxScore {
    BoxScore {
        field_goals_percentage: percentage(row.field_goals, row.field_goals_attempted),
        three_point_percentage: percentage(row.three_pointers, row.three_pointers_attempted),
        free_throws_percentage: percentage(row.free_throws, row.free_throws_attempted),
        ..row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw_line(player: &str, minutes: &str, stats: [&str; 10]) -> RawBoxScore {
        RawBoxScore {
            game_id: 25000,
            team_name: " Golden State Warriors ".into(),
            player_name: player.into(),
            minutes_played: minutes.into(),
            field_goals: stats[0].into(),
            field_goals_attempted: stats[1].into(),
            three_pointers: stats[2].into(),
            three_pointers_attempted: stats[3].into(),
            free_throws: stats[4].into(),
            free_throws_attempted: stats[5].into(),
            total_rebounds: stats[6].into(),
            assists: stats[7].into(),
            points: stats[8].into(),
            is_starter: stats[9].into(),
        }
    }

    fn curry() -> RawBoxScore {
        raw_line(
            "Stephen Curry ",
            "36:12",
            ["10", "20", "5", "12", "4", "4", "5", "8", "29", "1"],
        )
    }

    #[test]
    fn test_non_participants_are_removed() {
        let mut raw = vec![curry()];
        for status in NON_PARTICIPATION {
            raw.push(raw_line("Bench Player", status, [""; 10]));
        }
        let cleaned = clean_rows(raw);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].player_name, "Stephen Curry");
        assert!(cleaned
            .iter()
            .all(|r| !is_non_participation(&r.minutes_played)));
    }

    #[test]
    fn test_coercion_rename_and_trim() {
        let cleaned = clean_rows(vec![curry()]);
        let row = &cleaned[0];
        assert_eq!(row.team_name, "Golden State Warriors");
        assert_eq!(row.minutes_played, "36:12");
        assert_eq!(row.field_goals, 10);
        assert_eq!(row.three_pointers_attempted, 12);
        assert_eq!(row.points, 29);
        assert_eq!(row.is_starter, 1);
    }

    #[test]
    fn test_non_numeric_stats_become_zero() {
        let raw = raw_line(
            "Rookie",
            "01:02",
            ["", "x", "1.0", "2", "", "", "N/A", "0", "3", ""],
        );
        let row = &clean_rows(vec![raw])[0];
        assert_eq!(row.field_goals, 0);
        assert_eq!(row.field_goals_attempted, 0);
        assert_eq!(row.three_pointers, 1);
        assert_eq!(row.total_rebounds, 0);
        assert_eq!(row.is_starter, 0);
    }

    #[test]
    fn test_percentages() {
        let row = &clean_rows(vec![curry()])[0];
        assert_relative_eq!(row.field_goals_percentage, 50.0, epsilon = 1e-9);
        assert_relative_eq!(row.three_point_percentage, 41.67, epsilon = 1e-9);
        assert_relative_eq!(row.free_throws_percentage, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_attempts_give_zero_percentage() {
        let raw = raw_line("Big Man", "12:00", ["2", "0", "0", "0", "0", "0", "6", "1", "4", "0"]);
        let row = &clean_rows(vec![raw])[0];
        assert_eq!(row.field_goals_percentage, 0.0);
        assert_eq!(row.three_point_percentage, 0.0);
        assert_eq!(row.free_throws_percentage, 0.0);
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let first = clean_rows(vec![curry()]);
        let again: Vec<RawBoxScore> = first
            .iter()
            .map(|r| RawBoxScore {
                game_id: r.game_id,
                team_name: r.team_name.clone(),
                player_name: r.player_name.clone(),
                minutes_played: r.minutes_played.clone(),
                field_goals: r.field_goals.to_string(),
                field_goals_attempted: r.field_goals_attempted.to_string(),
                three_pointers: r.three_pointers.to_string(),
                three_pointers_attempted: r.three_pointers_attempted.to_string(),
                free_throws: r.free_throws.to_string(),
                free_throws_attempted: r.free_throws_attempted.to_string(),
                total_rebounds: r.total_rebounds.to_string(),
                assists: r.assists.to_string(),
                points: r.points.to_string(),
                is_starter: r.is_starter.to_string(),
            })
            .collect();
        assert_eq!(clean_rows(again), first);
    }

    #[test]
    fn test_clean_boxscores_persists_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactStore::new(dir.path());
        let cleaned = clean_boxscores(vec![curry()], &artifacts).unwrap();
        assert_eq!(cleaned.len(), 1);

        let written = std::fs::read_to_string(dir.path().join(FILE_NAME)).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.starts_with("game_id,team_name,player_name,minutes_played"));
        assert!(header.ends_with("free_throws_percentage"));
    }
}
