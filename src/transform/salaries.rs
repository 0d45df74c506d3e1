use crate::db::models::{RawSalary, Salary};
use crate::error::EtlError;

use super::fields::{coerce_year, remove_special_characters, strip_currency};
use super::{ArtifactStore, YearWindow};

pub const FILE_NAME: &str = "cleaned_salaries.csv";

pub fn clean_salaries(
    raw: Vec<RawSalary>,
    window: YearWindow,
    artifacts: &ArtifactStore,
) -> Result<Vec<Salary>, EtlError> {
    let cleaned = clean_rows(raw, window);
    artifacts.write(FILE_NAME, &cleaned)?;
    Ok(cleaned)
}

/// Rows whose season start year is missing or outside `window` are dropped.
pub fn clean_rows(raw: Vec<RawSalary>, window: YearWindow) -> Vec<Salary> {
    raw.into_iter()
        .filter_map(|row| {
            let season_start_year = coerce_year(&row.season_start_year)?;
            if !window.contains(season_start_year) {
                return None;
            }
            Some(Salary {
                player_name: remove_special_characters(row.player_name.trim()),
                season_start_year,
                salary: strip_currency(row.salary.trim()),
                inflation_adjusted_salary: strip_currency(row.inflation_adjusted_salary.trim()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_salary(name: &str, year: &str, salary: &str) -> RawSalary {
        RawSalary {
            player_name: name.into(),
            season_start_year: year.into(),
            salary: salary.into(),
            inflation_adjusted_salary: format!(" {} ", salary),
        }
    }

    #[test]
    fn test_currency_symbol_removed() {
        let cleaned = clean_rows(
            vec![raw_salary("LeBron James", "2016", "$30,963,450")],
            YearWindow::new(2015, 2019),
        );
        assert_eq!(cleaned[0].salary, "30,963,450");
        assert_eq!(cleaned[0].inflation_adjusted_salary, "30,963,450");
    }

    #[test]
    fn test_window_and_invalid_years() {
        let cleaned = clean_rows(
            vec![
                raw_salary("A", "2014", "$1"),
                raw_salary("B", "2015", "$1"),
                raw_salary("C", "2019.0", "$1"),
                raw_salary("D", "2020", "$1"),
                raw_salary("E", "unknown", "$1"),
            ],
            YearWindow::new(2015, 2019),
        );
        let names: Vec<&str> = cleaned.iter().map(|s| s.player_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(cleaned[1].season_start_year, 2019);
    }

    #[test]
    fn test_player_names_cleaned() {
        let cleaned = clean_rows(
            vec![raw_salary("  Dāvis Bertāns* ", "2017", "$7,000,000")],
            YearWindow::new(2015, 2019),
        );
        assert_eq!(cleaned[0].player_name, "Dvis Bertns");
    }
}
