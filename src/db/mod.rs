use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::PathBuf;

pub mod models;
use models::*;

use crate::error::EtlError;

/// The default SQLite schema; never attached.
const MAIN_SCHEMA: &str = "main";

/// Where the derived tables are written.
///
/// Every schema other than `main` is an attached database stored next to
/// `path`, e.g. `nba.db` + `public` → `nba.public.db`.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub path: PathBuf,
    pub schema: String,
}

impl DbConfig {
    pub fn validate(&self) -> Result<(), EtlError> {
        if self.path.as_os_str().is_empty() {
            return Err(EtlError::Config("database path not provided".into()));
        }
        if !is_identifier(&self.schema) {
            return Err(EtlError::Config(format!(
                "invalid schema name '{}'",
                self.schema
            )));
        }
        if self.schema.eq_ignore_ascii_case("temp") {
            return Err(EtlError::Config("schema 'temp' is reserved".into()));
        }
        Ok(())
    }

    /// File backing the schema.
    pub fn schema_path(&self) -> PathBuf {
        if self.schema == MAIN_SCHEMA {
            self.path.clone()
        } else {
            self.path.with_extension(format!("{}.db", self.schema))
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Open a connection with the configured schema attached.
pub fn connect(config: &DbConfig) -> Result<Connection, EtlError> {
    let conn = Connection::open(&config.path).map_err(|e| {
        EtlError::Connection(format!(
            "could not open database {}: {}",
            config.path.display(),
            e
        ))
    })?;
    if config.schema != MAIN_SCHEMA {
        let schema_file = config.schema_path();
        conn.execute(
            &format!("ATTACH DATABASE ?1 AS \"{}\"", config.schema),
            params![schema_file.to_string_lossy().into_owned()],
        )
        .map_err(|e| {
            EtlError::Connection(format!(
                "could not attach schema '{}' ({}): {}",
                config.schema,
                schema_file.display(),
                e
            ))
        })?;
    }
    Ok(conn)
}

/// Whether `schema.table` already exists
pub fn table_exists(conn: &Connection, schema: &str, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!(
            "SELECT EXISTS (SELECT 1 FROM \"{}\".sqlite_master WHERE type = 'table' AND name = ?1)",
            schema
        ),
        params![table],
        |row| row.get(0),
    )
}

// ── Tables ───────────────────────────────────────────────────────────────────

/// A record that is written to its own table.
pub trait TableRow {
    const TABLE_NAME: &'static str;
    /// `(column, SQL type)` in insert order
    const COLUMNS: &'static [(&'static str, &'static str)];

    /// Column values in the same order as `COLUMNS`
    fn values(&self) -> Vec<Value>;
}

/// Drop and recreate `schema.T::TABLE_NAME`, then insert every row.
/// Runs in a single transaction; returns the number of rows written.
pub fn replace_table<T: TableRow>(
    conn: &mut Connection,
    schema: &str,
    rows: &[T],
) -> rusqlite::Result<usize> {
    let table = format!("\"{}\".\"{}\"", schema, T::TABLE_NAME);
    let column_defs = T::COLUMNS
        .iter()
        .map(|(name, sql_type)| format!("\"{}\" {}", name, sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    let column_names = T::COLUMNS
        .iter()
        .map(|(name, _)| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=T::COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({column_defs});"
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} ({column_names}) VALUES ({placeholders})"
        ))?;
        for row in rows {
            stmt.execute(params_from_iter(row.values()))?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn real_or_null(v: Option<f64>) -> Value {
    v.map(Value::Real).unwrap_or(Value::Null)
}

impl TableRow for PlayerSeasonStats {
    const TABLE_NAME: &'static str = "aa_player_stats";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("player_name", "TEXT NOT NULL"),
        ("year", "INTEGER NOT NULL"),
        ("points_per_game", "REAL NOT NULL"),
        ("assists_per_game", "REAL NOT NULL"),
        ("rebounds_per_game", "REAL NOT NULL"),
        ("field_goals_percentage_per_game", "REAL NOT NULL"),
        ("three_point_percentage_per_game", "REAL NOT NULL"),
        ("free_throws_percentage_per_game", "REAL NOT NULL"),
        ("total_three_pointers", "INTEGER NOT NULL"),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.player_name),
            Value::Integer(i64::from(self.year)),
            Value::Real(self.points_per_game),
            Value::Real(self.assists_per_game),
            Value::Real(self.rebounds_per_game),
            Value::Real(self.field_goals_percentage_per_game),
            Value::Real(self.three_point_percentage_per_game),
            Value::Real(self.free_throws_percentage_per_game),
            Value::Integer(i64::from(self.total_three_pointers)),
        ]
    }
}

impl TableRow for TeamSeasonStats {
    const TABLE_NAME: &'static str = "aa_team_stats";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("year", "INTEGER NOT NULL"),
        ("team_name", "TEXT NOT NULL"),
        ("total_games", "INTEGER NOT NULL"),
        ("total_wins", "INTEGER NOT NULL"),
        ("total_losses", "INTEGER NOT NULL"),
        ("win_percentage", "REAL NOT NULL"),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(i64::from(self.year)),
            text(&self.team_name),
            Value::Integer(i64::from(self.total_games)),
            Value::Integer(i64::from(self.total_wins)),
            Value::Integer(i64::from(self.total_losses)),
            Value::Real(self.win_percentage),
        ]
    }
}

impl TableRow for PlayerInfoAndSalary {
    const TABLE_NAME: &'static str = "aa_player_info_and_salaries";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("season_start_year", "INTEGER NOT NULL"),
        ("player_name", "TEXT NOT NULL"),
        ("position", "TEXT"),
        ("height", "TEXT"),
        ("weight", "REAL"),
        ("birth_date", "TEXT"),
        ("weight_kg", "REAL"),
        ("height_m", "REAL"),
        ("salary", "TEXT"),
        ("inflation_adjusted_salary", "TEXT"),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(i64::from(self.season_start_year)),
            text(&self.player_name),
            text(&self.position),
            text(&self.height),
            Value::Real(self.weight),
            text(&self.birth_date),
            Value::Real(self.weight_kg),
            real_or_null(self.height_m),
            text(&self.salary),
            text(&self.inflation_adjusted_salary),
        ]
    }
}
