//! Fixed-layout text report for a queried server.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::server_info::{ServerInfo, VacStatus};

/// Server type derived from the resolver's one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    Dedicated,
    Listen,
    /// SourceTV relay / spectator proxy.
    Relay,
    Hybrid,
    Multiplayer,
    Unknown,
}

impl ServerType {
    /// Never fails: unrecognised codes map to [`ServerType::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "d" => ServerType::Dedicated,
            "l" => ServerType::Listen,
            "p" => ServerType::Relay,
            "h" => ServerType::Hybrid,
            "m" => ServerType::Multiplayer,
            _ => ServerType::Unknown,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, ServerType::Dedicated) => "dedicated",
            (Locale::En, ServerType::Listen) => "listen",
            (Locale::En, ServerType::Relay) => "SourceTV relay",
            (Locale::En, ServerType::Hybrid) => "hybrid",
            (Locale::En, ServerType::Multiplayer) => "multiplayer",
            (Locale::En, ServerType::Unknown) => "unknown",
            (Locale::ZhCn, ServerType::Dedicated) => "专用服务器",
            (Locale::ZhCn, ServerType::Listen) => "监听服务器",
            (Locale::ZhCn, ServerType::Relay) => "SourceTV",
            (Locale::ZhCn, ServerType::Hybrid) => "混合服务器",
            (Locale::ZhCn, ServerType::Multiplayer) => "多人游戏服务器",
            (Locale::ZhCn, ServerType::Unknown) => "未知",
        }
    }
}

/// Report language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "zh" | "zh-cn" | "cn" | "chinese" => Ok(Locale::ZhCn),
            other => Err(format!("unknown report language '{other}' (expected en or zh)")),
        }
    }
}

struct Labels {
    header: &'static str,
    ip: &'static str,
    port: &'static str,
    name: &'static str,
    map: &'static str,
    game_directory: &'static str,
    game_description: &'static str,
    current_players: &'static str,
    max_players: &'static str,
    bots: &'static str,
    server_type: &'static str,
    os: &'static str,
    vac: &'static str,
    version: &'static str,
    unknown: &'static str,
    enabled: &'static str,
    disabled: &'static str,
}

const EN: Labels = Labels {
    header: "=== Server Info ===",
    ip: "IP",
    port: "Port",
    name: "Name",
    map: "Map",
    game_directory: "Game Directory",
    game_description: "Game Description",
    current_players: "Current Players",
    max_players: "Max Players",
    bots: "Bots",
    server_type: "Server Type",
    os: "OS",
    vac: "VAC Protection",
    version: "Version",
    unknown: "unknown",
    enabled: "Enabled",
    disabled: "Disabled",
};

const ZH_CN: Labels = Labels {
    header: "=== 服务器信息 ===",
    ip: "IP",
    port: "端口",
    name: "名称",
    map: "地图",
    game_directory: "游戏目录",
    game_description: "游戏描述",
    current_players: "当前玩家",
    max_players: "最大玩家",
    bots: "机器人数量",
    server_type: "服务器类型",
    os: "操作系统",
    vac: "VAC 保护",
    version: "版本",
    unknown: "未知",
    enabled: "已启用",
    disabled: "已禁用",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::ZhCn => &ZH_CN,
    }
}

/// Render `info` as the multi-line report returned to the terminal UI.
///
/// The report starts and ends with a newline so consecutive reports stay
/// visually separated in the terminal.
pub fn format_report(info: &ServerInfo, locale: Locale) -> String {
    let l = labels(locale);
    let map = info.map.as_deref().unwrap_or(l.unknown);
    let server_type = ServerType::from_code(&info.server_type).label(locale);
    let vac = match &info.vac {
        VacStatus::Enabled => l.enabled.to_string(),
        VacStatus::Disabled => l.disabled.to_string(),
        VacStatus::Unreported => l.unknown.to_string(),
        VacStatus::Other(s) => s.clone(),
    };

    let mut out = String::new();
    let rows: [(&str, &dyn std::fmt::Display); 13] = [
        (l.ip, &info.ip),
        (l.port, &info.port),
        (l.name, &info.name),
        (l.map, &map),
        (l.game_directory, &info.game_directory),
        (l.game_description, &info.game_description),
        (l.current_players, &info.current_players),
        (l.max_players, &info.max_players),
        (l.bots, &info.bots),
        (l.server_type, &server_type),
        (l.os, &info.os),
        (l.vac, &vac),
        (l.version, &info.version),
    ];

    out.push('\n');
    out.push_str(l.header);
    out.push('\n');
    for (label, value) in rows {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{label}: {value}");
    }
    out
}
