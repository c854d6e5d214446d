//! Resolver reply model and parsing.
//!
//! The resolver prints one JSON record: either the server status fields or an
//! `error` field. Parsing is lossy on purpose: missing fields take defaults,
//! numbers and numeric strings are interchangeable, and the `version` string
//! is stripped down to printable ASCII.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{GatewayError, GatewayResult};

/// Normalized status of a queried game server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub port: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// `None` when the resolver sent nothing or an empty string.
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub map: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub game_directory: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub game_description: String,
    #[serde(default, deserialize_with = "lenient_optional_u32", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub current_players: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_players: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bots: u32,
    /// Raw one-letter server type code, see [`crate::report::ServerType`].
    #[serde(default, deserialize_with = "lenient_string")]
    pub server_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub os: String,
    #[serde(default)]
    pub vac: VacStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
}

/// VAC protection flag as reported by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VacStatus {
    Enabled,
    Disabled,
    /// Anything the resolver sent that is not recognisably on or off.
    Other(String),
    #[default]
    Unreported,
}

impl VacStatus {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Null => VacStatus::Unreported,
            Value::Bool(true) => VacStatus::Enabled,
            Value::Bool(false) => VacStatus::Disabled,
            Value::Number(n) => match n.as_u64() {
                Some(1) => VacStatus::Enabled,
                Some(0) => VacStatus::Disabled,
                _ => VacStatus::Other(n.to_string()),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "enabled" | "true" | "1" => VacStatus::Enabled,
                "disabled" | "false" | "0" => VacStatus::Disabled,
                "" => VacStatus::Unreported,
                _ => VacStatus::Other(s),
            },
            other => VacStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VacStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VacStatus::Enabled => f.write_str("Enabled"),
            VacStatus::Disabled => f.write_str("Disabled"),
            VacStatus::Other(s) => f.write_str(s),
            VacStatus::Unreported => f.write_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for VacStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(VacStatus::from_value(Value::deserialize(d)?))
    }
}

impl Serialize for VacStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            VacStatus::Unreported => s.serialize_none(),
            other => s.serialize_str(&other.to_string()),
        }
    }
}

/// Keep only printable ASCII (0x20..=0x7E), then trim surrounding whitespace.
pub fn sanitize_version(raw: &str) -> String {
    let printable: String = raw.chars().filter(|c| (' '..='~').contains(c)).collect();
    printable.trim().to_string()
}

/// The resolver's `error` message, if `stdout` is a record that carries one.
///
/// Returns `None` for unparseable output and for records whose `error`
/// field is absent, null, `false` or empty.
pub fn reply_error(stdout: &str) -> Option<String> {
    let value: Value = serde_json::from_str(stdout.trim()).ok()?;
    error_field(&value)
}

fn error_field(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Interpret resolver standard output.
///
/// Unparseable text is [`GatewayError::Parse`]; a record with an `error` field
/// is [`GatewayError::Domain`]. On success `version` is already sanitized.
pub fn parse_reply(stdout: &str) -> GatewayResult<ServerInfo> {
    let value: Value = serde_json::from_str(stdout.trim())?;

    if let Some(message) = error_field(&value) {
        return Err(GatewayError::Domain(message));
    }
    if !value.is_object() {
        return Err(GatewayError::Parse(format!("expected a JSON object, got {value}")));
    }

    let mut info: ServerInfo = serde_json::from_value(value)?;
    info.version = sanitize_version(&info.version);
    Ok(info)
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_to_string(Value::deserialize(d)?))
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = value_to_string(Value::deserialize(d)?);
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(value_to_u32(&Value::deserialize(d)?).unwrap_or(0))
}

fn lenient_optional_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(value_to_u32(&Value::deserialize(d)?))
}
