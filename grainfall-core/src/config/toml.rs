//! Simple TOML parser for sand configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the sand toy. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - A single `[sand]` section
//! - Comments (# ...), including trailing comments after values
//!
//! Example:
//! ```toml
//! [sand]
//! grain_count = 24
//! grain_size = 1
//! gravity = 4.0       # grain-space units per tick²
//! velocity_clamp = "symmetric"
//! ```

use super::types::{ConfigError, SandConfig, VelocityClamp};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Key outside `[sand]` or not recognised
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Parsed values fail validation
    Invalid(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sand,
}

/// Parse TOML text into a validated `SandConfig`
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<SandConfig, ParseError> {
    let mut config = SandConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match section {
            Section::Sand => apply_value(&mut config, key, value)?,
            Section::Root => return Err(ParseError::UnknownKey),
        }
    }

    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}

/// Drop a trailing `# comment`, ignoring `#` inside quotes
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "sand" => Ok(Section::Sand),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_clamp(value: &str) -> Result<VelocityClamp, ParseError> {
    match parse_string(value)? {
        "symmetric" => Ok(VelocityClamp::Symmetric),
        "ceiling" => Ok(VelocityClamp::CeilingOnly),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(config: &mut SandConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "grain_count" => config.grain_count = parse_int(value)?,
        "grain_size" => config.grain_size = parse_int(value)?,
        "resolution" => config.resolution = parse_int(value)?,
        "gravity" => config.gravity_magnitude = parse_float(value)?,
        "bounce" => config.bounce_factor = parse_float(value)?,
        "terminal_velocity" => config.terminal_velocity = parse_float(value)?,
        "gravity_change_percent" => config.gravity_change_percent = parse_int(value)?,
        "initial_direction" => config.initial_direction = parse_float(value)?,
        "velocity_clamp" => config.velocity_clamp = parse_clamp(value)?,
        "background" => config.background = parse_int(value)?,
        "foreground" => config.foreground = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
