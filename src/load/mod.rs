use tracing::{error, info, warn};

use crate::db::models::{PlayerInfoAndSalary, PlayerSeasonStats, TeamSeasonStats};
use crate::db::{self, DbConfig, TableRow};
use crate::error::EtlError;
use crate::transform::Transformed;

/// Replace `T`'s table with `rows`. Empty input is a no-op that never touches
/// the database.
pub fn create_table<T: TableRow>(db_config: &DbConfig, rows: &[T]) -> Result<(), EtlError> {
    let table = T::TABLE_NAME;
    if rows.is_empty() {
        warn!("No data to load, {} input is empty.", table);
        return Ok(());
    }

    db_config.validate().map_err(|e| {
        error!("Target database not configured correctly: {}", e);
        EtlError::QueryExecution(format!("Database configuration error: {}", e))
    })?;

    // Dropped, and therefore closed, on every return path below
    let mut conn = db::connect(db_config).map_err(|e| {
        error!("Failed to connect to the database when creating {}: {}", table, e);
        EtlError::QueryExecution(format!("Database connection failed: {}", e))
    })?;

    let query_failed = |e: rusqlite::Error| {
        error!("Failed to create {} table: {}", table, e);
        EtlError::QueryExecution(format!("Failed to execute query: {}", e))
    };

    let exists = db::table_exists(&conn, &db_config.schema, table).map_err(query_failed)?;
    if exists {
        info!("Replacing data in {} table...", table);
    } else {
        info!("Creating new {} table...", table);
    }

    let inserted = db::replace_table(&mut conn, &db_config.schema, rows).map_err(query_failed)?;
    let action = if exists {
        "replaced with"
    } else {
        "created and loaded into"
    };
    info!(
        "Data successfully {} {}.{} table ({} rows).",
        action, db_config.schema, table, inserted
    );
    Ok(())
}

pub fn load_player_stats(
    db_config: &DbConfig,
    player_stats: &[PlayerSeasonStats],
) -> Result<(), EtlError> {
    info!("Starting player stats load process...");
    create_table(db_config, player_stats)?;
    info!("Player stats load process completed successfully.");
    Ok(())
}

pub fn load_team_stats(
    db_config: &DbConfig,
    team_stats: &[TeamSeasonStats],
) -> Result<(), EtlError> {
    info!("Starting team stats load process...");
    create_table(db_config, team_stats)?;
    info!("Team stats load process completed successfully.");
    Ok(())
}

pub fn load_player_info_and_salaries(
    db_config: &DbConfig,
    rows: &[PlayerInfoAndSalary],
) -> Result<(), EtlError> {
    info!("Starting player info and salaries load process...");
    create_table(db_config, rows)?;
    info!("Player info and salaries load process completed successfully.");
    Ok(())
}

/// Load the three aggregate tables, stopping at the first failure.
pub fn load_data(db_config: &DbConfig, transformed: &Transformed) -> Result<(), EtlError> {
    load_player_stats(db_config, &transformed.player_stats)?;
    load_team_stats(db_config, &transformed.team_stats)?;
    load_player_info_and_salaries(db_config, &transformed.player_info_and_salaries)?;
    Ok(())
}
