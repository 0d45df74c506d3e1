use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::db::models::{Game, RawGame};
use crate::error::EtlError;

use super::fields::{coerce_count, is_truthy};
use super::{ArtifactStore, YearWindow};

pub const FILE_NAME: &str = "cleaned_games.csv";

/// Format written to `date_time` after cleaning
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Clean the games table: regular season only, inside `window` by calendar
/// year, dates normalised to DD-MM-YYYY.
pub fn clean_games(
    raw: Vec<RawGame>,
    window: YearWindow,
    artifacts: &ArtifactStore,
) -> Result<Vec<Game>, EtlError> {
    let cleaned = clean_rows(raw, window);
    artifacts.write(FILE_NAME, &cleaned)?;
    Ok(cleaned)
}

pub fn clean_rows(raw: Vec<RawGame>, window: YearWindow) -> Vec<Game> {
    raw.into_iter()
        .filter(|game| is_truthy(&game.is_regular))
        .filter_map(|game| to_game(game, window))
        .collect()
}

fn to_game(raw: RawGame, window: YearWindow) -> Option<Game> {
    let played_on = parse_game_date(&raw.date_time)?;
    if !window.contains(played_on.year()) {
        return None;
    }
    let date_time = played_on.format(DISPLAY_DATE_FORMAT).to_string();
    let year = parse_game_date(&date_time).map(|d| d.year());
    Some(Game {
        game_id: raw.game_id,
        away_team: raw.away_team.trim().to_string(),
        points_away: coerce_count(&raw.points_away),
        home_team: raw.home_team.trim().to_string(),
        points_home: coerce_count(&raw.points_home),
        date_time,
        year,
    })
}

/// Parse a game date in the source format (`2016-01-11`, optionally with a
/// time) or the cleaned display format (`11-01-2016`).
pub fn parse_game_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, DISPLAY_DATE_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_game(game_id: i64, date: &str, regular: &str) -> RawGame {
        RawGame {
            away_team: " Los Angeles Lakers".into(),
            points_away: "100".into(),
            home_team: "Golden State Warriors ".into(),
            points_home: "111".into(),
            date_time: date.into(),
            is_regular: regular.into(),
            game_id,
        }
    }

    fn window() -> YearWindow {
        YearWindow::new(2015, 2019)
    }

    #[test]
    fn test_only_regular_season_games_kept() {
        let cleaned = clean_rows(
            vec![
                raw_game(1, "2016-01-11", "1"),
                raw_game(2, "2016-04-20", "0"),
                raw_game(3, "2016-01-12", "True"),
            ],
            window(),
        );
        let ids: Vec<i64> = cleaned.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_window_uses_calendar_year() {
        // January 2015 belongs to the 2014 season but is kept; a 2020 game is not
        let early = raw_game(1, "2015-01-03", "1");
        let late = raw_game(2, "2020-01-03", "1");
        let before = raw_game(3, "2014-12-30", "1");
        let on_edge = raw_game(4, "2019-12-31", "1");

        let cleaned = clean_rows(vec![early, late, before, on_edge], window());
        let ids: Vec<i64> = cleaned.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_rename_trim_and_format() {
        let game = &clean_rows(vec![raw_game(7, " 2016-01-11 ", "1")], window())[0];
        assert_eq!(game.away_team, "Los Angeles Lakers");
        assert_eq!(game.home_team, "Golden State Warriors");
        assert_eq!(game.points_away, 100);
        assert_eq!(game.points_home, 111);
        assert_eq!(game.date_time, "11-01-2016");
        assert_eq!(game.year, Some(2016));
    }

    #[test]
    fn test_unparseable_dates_are_dropped() {
        let cleaned = clean_rows(
            vec![raw_game(1, "not a date", "1"), raw_game(2, "", "1")],
            window(),
        );
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_parse_game_date_tolerates_formatted_values() {
        let expected = NaiveDate::from_ymd_opt(2017, 3, 4);
        assert_eq!(parse_game_date("2017-03-04"), expected);
        assert_eq!(parse_game_date("04-03-2017"), expected);
        assert_eq!(parse_game_date("2017-03-04 19:30:00"), expected);
        assert_eq!(parse_game_date("03/04/2017"), None);
    }

    #[test]
    fn test_cleaning_twice_keeps_dates() {
        let first = clean_rows(vec![raw_game(1, "2018-11-02", "1")], window());
        let again: Vec<RawGame> = first
            .iter()
            .map(|g| RawGame {
                away_team: g.away_team.clone(),
                points_away: g.points_away.to_string(),
                home_team: g.home_team.clone(),
                points_home: g.points_home.to_string(),
                date_time: g.date_time.clone(),
                is_regular: "1".into(),
                game_id: g.game_id,
            })
            .collect();
        assert_eq!(clean_rows(again, window()), first);
    }
}
