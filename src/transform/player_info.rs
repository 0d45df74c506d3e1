use crate::db::models::{PlayerInfo, RawPlayerInfo};
use crate::error::EtlError;

use super::fields::{remove_special_characters, round_to};
use super::ArtifactStore;

pub const FILE_NAME: &str = "cleaned_playerinfo.csv";

pub const KG_PER_POUND: f64 = 0.45359237;
pub const METRES_PER_INCH: f64 = 0.0254;

/// Position codes and their expanded labels
const POSITIONS: [(&str, &str); 7] = [
    ("F-C", "Forward, Center"),
    ("C-F", "Center, Forward"),
    ("C", "Center"),
    ("G", "Guard"),
    ("F", "Forward"),
    ("G-F", "Guard, Forward"),
    ("F-G", "Forward, Guard"),
];

pub fn clean_playerinfo(
    raw: Vec<RawPlayerInfo>,
    artifacts: &ArtifactStore,
) -> Result<Vec<PlayerInfo>, EtlError> {
    let cleaned = clean_rows(raw);
    artifacts.write(FILE_NAME, &cleaned)?;
    Ok(cleaned)
}

/// Rows without a numeric weight or without a birth date are dropped.
pub fn clean_rows(raw: Vec<RawPlayerInfo>) -> Vec<PlayerInfo> {
    raw.into_iter().filter_map(to_player_info).collect()
}

fn to_player_info(raw: RawPlayerInfo) -> Option<PlayerInfo> {
    let weight = parse_weight(&raw.weight)?;
    let birth_date = raw.birth_date.trim();
    if birth_date.is_empty() {
        return None;
    }
    let height = raw.height.trim().to_string();
    Some(PlayerInfo {
        player_name: remove_special_characters(raw.player_name.trim()),
        position: expand_position(raw.position.trim()).to_string(),
        height_m: height_to_metres(&height),
        height,
        weight,
        birth_date: birth_date.to_string(),
        weight_kg: round_to(weight * KG_PER_POUND, 1),
    })
}

fn parse_weight(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Expand a position code; unknown codes are returned unchanged.
pub fn expand_position(code: &str) -> &str {
    POSITIONS
        .iter()
        .find(|(abbr, _)| *abbr == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Convert "feet-inches" (e.g. "6-10") to metres rounded to 2 decimals.
/// Anything else, including values too large to count in inches, yields
/// `None`.
pub fn height_to_metres(height: &str) -> Option<f64> {
    let mut parts = height.split('-');
    let feet = parts.next()?.trim().parse::<u32>().ok()?;
    let inches = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let total_inches = feet.checked_mul(12)?.checked_add(inches)?;
    Some(round_to(f64::from(total_inches) * METRES_PER_INCH, 2))
}
