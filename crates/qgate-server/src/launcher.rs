//! Best-effort browser launch after startup.
//!
//! The platform command is resolved once; the child is spawned detached and
//! its outcome only logged.

use qgate_core::{GatewayError, GatewayResult};
use tokio::process::Command;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform of the running process.
    pub fn detect() -> GatewayResult<Self> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> GatewayResult<Self> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(GatewayError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Program and arguments that open `url` in the default browser.
    pub fn command(self, url: &str) -> (&'static str, Vec<String>) {
        match self {
            // The empty string is the window title `start` expects first.
            Platform::Windows => (
                "cmd",
                vec!["/C".into(), "start".into(), String::new(), url.into()],
            ),
            Platform::MacOs => ("open", vec![url.into()]),
            Platform::Linux => ("xdg-open", vec![url.into()]),
        }
    }
}

/// Spawn the platform opener for `url` and return immediately.
///
/// Errors only cover resolving the platform and spawning the process; the
/// opener's exit status is logged from a background task. Must be called
/// from within a Tokio runtime.
pub fn open_browser(url: &str) -> GatewayResult<()> {
    let platform = Platform::detect()?;
    let (program, args) = platform.command(url);

    let mut child = Command::new(program).args(&args).spawn()?;

    let url = url.to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => info!(url = %url, "opened in default browser"),
            Ok(status) => warn!(url = %url, %status, "browser launcher exited with error"),
            Err(e) => warn!(url = %url, error = %e, "failed to open browser"),
        }
    });
    Ok(())
}
