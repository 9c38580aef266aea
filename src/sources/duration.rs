use regex::Regex;
use std::sync::LazyLock;

use crate::error::DurationError;

static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)H").expect("valid hours regex"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)M").expect("valid minutes regex"));
static SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)S").expect("valid seconds regex"));

/// Parsea una duración ISO 8601 de YouTube (`PT1H2M3S`) a segundos.
///
/// Cada componente se busca por separado y vale 0 si no aparece, así que
/// `PT45M` da 2700 y `P0D` (directos) da 0.
pub fn parse_duration(token: &str) -> Result<u64, DurationError> {
    let token = token.trim();
    if !token.starts_with('P') {
        return Err(DurationError(token.to_string()));
    }

    let hours = component(&HOURS, token)?;
    let minutes = component(&MINUTES, token)?;
    let seconds = component(&SECONDS, token)?;

    hours
        .checked_mul(3600)
        .zip(minutes.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(|| DurationError(token.to_string()))
}

fn component(pattern: &Regex, token: &str) -> Result<u64, DurationError> {
    match pattern.captures(token) {
        Some(captures) => captures[1]
            .parse()
            .map_err(|_| DurationError(token.to_string())),
        None => Ok(0),
    }
}

/// Formatea segundos como `H:MM:SS` o `M:SS`
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
