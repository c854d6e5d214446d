//! Server configuration: TOML file + CLI overrides.
//!
//! Keys are case-insensitive in both places. Boolean switches accept either a
//! native boolean or a string that is compared case-insensitively to "true".
//! The port is kept as raw text here and validated by the bind resolver.

use qgate_core::{BindIntent, GatewayError, GatewayResult, Locale};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub report: ReportSection,
}

/// `[server]` section of the config TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub ip: Option<String>,
    pub port: Option<PortValue>,
    pub dedicated: Option<FlagValue>,
    pub force_lan: Option<FlagValue>,
    pub force_localhost: Option<FlagValue>,
    pub static_dir: Option<String>,
}

/// `[resolver]` section of the config TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSection {
    #[serde(default = "default_resolver_program")]
    pub program: String,
    #[serde(default = "default_resolver_args")]
    pub args: Vec<String>,
    /// 0 disables the timeout.
    #[serde(default = "default_resolver_timeout")]
    pub timeout_secs: u64,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            program: default_resolver_program(),
            args: default_resolver_args(),
            timeout_secs: default_resolver_timeout(),
        }
    }
}

/// `[report]` section of the config TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSection {
    pub lang: Option<String>,
}

/// A boolean switch written either as `true` or as `"TRUE"`.
///
/// Any other TOML value is accepted and reads as unset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
    Other(toml::Value),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Text(s) => parse_flag_text(s),
            FlagValue::Other(_) => false,
        }
    }
}

/// A port written either as `27015` or as `"27015"`.
///
/// Any other TOML value is kept as its text form so the bind resolver can
/// substitute the default port instead of failing startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
    Other(toml::Value),
}

impl PortValue {
    pub fn as_text(&self) -> String {
        match self {
            PortValue::Number(n) => n.to_string(),
            PortValue::Text(s) => s.clone(),
            PortValue::Other(v) => v.to_string(),
        }
    }
}

pub fn parse_flag_text(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> String {
    "3000".to_string()
}
fn default_static_dir() -> String {
    "frontend".to_string()
}
fn default_resolver_program() -> String {
    "python".to_string()
}
fn default_resolver_args() -> Vec<String> {
    vec!["server.py".to_string()]
}
fn default_resolver_timeout() -> u64 {
    15
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ip: Option<String>,
    pub port: Option<String>,
    pub dedicated: Option<bool>,
    pub force_lan: Option<bool>,
    pub force_localhost: Option<bool>,
    pub static_dir: Option<String>,
    pub resolver_program: Option<String>,
    pub resolver_args: Vec<String>,
    pub resolver_timeout_secs: Option<u64>,
    pub lang: Option<String>,
}

/// Resolved server configuration (paths expanded, CLI overrides applied).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    /// Raw requested port, validated later by `qgate_core::resolve_port`.
    pub port: String,
    pub dedicated: bool,
    pub force_lan: bool,
    pub force_localhost: bool,
    pub static_dir: PathBuf,
    pub resolver_program: String,
    pub resolver_args: Vec<String>,
    pub resolver_timeout: Option<Duration>,
    pub locale: Locale,
}

impl ServerConfig {
    /// Load config from TOML file, then apply CLI overrides.
    ///
    /// A missing file means defaults; a malformed one is an error.
    pub fn load(config_path: Option<&Path>, cli: Overrides) -> GatewayResult<Self> {
        let file_config = match config_path {
            Some(path) => {
                let expanded = expand_tilde(path);
                if expanded.exists() {
                    info!(path = %expanded.display(), "loading config file");
                    let content = std::fs::read_to_string(&expanded)?;
                    parse_config_file(&content)?
                } else {
                    info!(path = %expanded.display(), "config file not found, using defaults");
                    ConfigFile::default()
                }
            }
            None => ConfigFile::default(),
        };

        Ok(Self::merge(file_config, cli))
    }

    fn merge(file: ConfigFile, cli: Overrides) -> Self {
        let server = file.server;
        let flag = |cli_value: Option<bool>, file_value: Option<FlagValue>| {
            cli_value.unwrap_or_else(|| file_value.map(|v| v.is_set()).unwrap_or(false))
        };

        let resolver_args = if cli.resolver_args.is_empty() {
            file.resolver.args
        } else {
            cli.resolver_args
        };
        let timeout_secs = cli.resolver_timeout_secs.unwrap_or(file.resolver.timeout_secs);
        let static_dir = cli
            .static_dir
            .or(server.static_dir)
            .unwrap_or_else(default_static_dir);

        let locale = match cli.lang.or(file.report.lang) {
            Some(lang) => lang.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "falling back to English report");
                Locale::En
            }),
            None => Locale::default(),
        };

        Self {
            ip: cli.ip.or(server.ip).unwrap_or_else(default_ip),
            port: cli
                .port
                .or_else(|| server.port.map(|p| p.as_text()))
                .unwrap_or_else(default_port),
            dedicated: flag(cli.dedicated, server.dedicated),
            force_lan: flag(cli.force_lan, server.force_lan),
            force_localhost: flag(cli.force_localhost, server.force_localhost),
            static_dir: expand_tilde_str(&static_dir),
            resolver_program: cli.resolver_program.unwrap_or(file.resolver.program),
            resolver_args,
            resolver_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            locale,
        }
    }

    pub fn bind_intent(&self) -> BindIntent {
        BindIntent {
            requested_address: self.ip.clone(),
            force_loopback: self.force_localhost,
            force_lan: self.force_lan,
        }
    }
}

/// Parse TOML with case-insensitive keys.
pub fn parse_config_file(content: &str) -> GatewayResult<ConfigFile> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| GatewayError::Config(format!("config parse error: {e}")))?;
    toml::Value::Table(lowercase_keys(table))
        .try_into::<ConfigFile>()
        .map_err(|e| GatewayError::Config(format!("config parse error: {e}")))
}

fn lowercase_keys(table: toml::Table) -> toml::Table {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::Table(inner) => toml::Value::Table(lowercase_keys(inner)),
                other => other,
            };
            (key.to_ascii_lowercase(), value)
        })
        .collect()
}

/// Expand `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    expand_tilde_str(&s)
}

fn expand_tilde_str(s: &str) -> PathBuf {
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(s)
}
