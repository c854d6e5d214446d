//! qgate: game-server status gateway.
//!
//! Serves the browser terminal UI, answers `POST /query` by running the
//! external resolver, and picks the local address to listen on from the
//! operator's loopback / LAN / explicit intent.

mod config;
mod gateway;
mod launcher;
mod listener;

use anyhow::{Context, Result};
use clap::Parser;
use config::{parse_flag_text, Overrides, ServerConfig};
use gateway::{create_router, AppState, SubprocessResolver};
use qgate_core::BindResolver;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// qgate: game server query gateway
#[derive(Parser, Debug)]
#[command(name = "qgate", version, about = "Game server query gateway")]
struct Cli {
    /// Listen address
    #[arg(long)]
    ip: Option<String>,

    /// Listen port (invalid values fall back to 3000)
    #[arg(long, allow_hyphen_values = true)]
    port: Option<String>,

    /// Do not open a browser after startup
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = parse_flag)]
    dedicated: Option<bool>,

    /// Bind to a LAN-private address
    #[arg(
        long = "force_lan",
        alias = "force-lan",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_flag
    )]
    force_lan: Option<bool>,

    /// Bind to 127.0.0.1 regardless of --ip (wins over --force_lan)
    #[arg(
        long = "force_localhost",
        alias = "force-localhost",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_flag
    )]
    force_localhost: Option<bool>,

    /// Config file path
    #[arg(long, default_value = "qgate.toml")]
    config: String,

    /// Directory holding the terminal UI bundle
    #[arg(long = "static-dir", alias = "static_dir")]
    static_dir: Option<String>,

    /// Resolver program
    #[arg(long)]
    resolver: Option<String>,

    /// Argument placed before ip and port (repeatable)
    #[arg(long = "resolver-arg", alias = "resolver_arg", allow_hyphen_values = true)]
    resolver_arg: Vec<String>,

    /// Resolver timeout in seconds (0 = no timeout)
    #[arg(long = "resolver-timeout", alias = "resolver_timeout")]
    resolver_timeout: Option<u64>,

    /// Report language (en, zh)
    #[arg(long)]
    lang: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", alias = "log_level", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            ip: self.ip.clone(),
            port: self.port.clone(),
            dedicated: self.dedicated,
            force_lan: self.force_lan,
            force_localhost: self.force_localhost,
            static_dir: self.static_dir.clone(),
            resolver_program: self.resolver.clone(),
            resolver_args: self.resolver_arg.clone(),
            resolver_timeout_secs: self.resolver_timeout,
            lang: self.lang.clone(),
        }
    }
}

fn parse_flag(s: &str) -> Result<bool, String> {
    Ok(parse_flag_text(s))
}

/// Options whose following token is a value and must be left untouched.
const VALUE_OPTIONS: &[&str] = &[
    "--ip",
    "--port",
    "--config",
    "--static-dir",
    "--static_dir",
    "--resolver",
    "--resolver-arg",
    "--resolver_arg",
    "--resolver-timeout",
    "--resolver_timeout",
    "--lang",
    "--log-level",
    "--log_level",
];

/// Lowercase option names so `--FORCE_LAN=TRUE` means `--force_lan=TRUE`.
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    let mut out = Vec::new();
    let mut value_next = false;
    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || value_next {
            value_next = false;
            out.push(arg);
            continue;
        }
        match arg.strip_prefix("--") {
            Some(rest) if !rest.is_empty() => {
                let normalized = match rest.split_once('=') {
                    Some((key, value)) => format!("--{}={value}", key.to_ascii_lowercase()),
                    None => {
                        let key = format!("--{}", rest.to_ascii_lowercase());
                        value_next = VALUE_OPTIONS.contains(&key.as_str());
                        key
                    }
                };
                out.push(normalized);
            }
            _ => out.push(arg),
        }
    }
    out
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    // Initialize tracing
    use tracing_subscriber::EnvFilter;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting qgate");

    if let Err(e) = run(cli).await {
        error!(error = %format!("{e:#}"), "qgate exited with error");
        std::process::exit(1);
    }

    info!("qgate stopped");
}

async fn run(cli: Cli) -> Result<()> {
    let config = ServerConfig::load(Some(Path::new(&cli.config)), cli.overrides())
        .context("failed to load config")?;
    info!(
        ip = %config.ip,
        port = %config.port,
        dedicated = config.dedicated,
        force_lan = config.force_lan,
        force_localhost = config.force_localhost,
        "parsed configuration"
    );

    // Resolve the listen address once; it is fixed for the process lifetime.
    let binder = BindResolver::default();
    let bind = binder.resolve_bind(&config.bind_intent(), &config.port);
    info!(
        ip = %bind.address,
        port = bind.port,
        dedicated = config.dedicated,
        "final bind parameters"
    );

    let resolver = Arc::new(SubprocessResolver::new(
        config.resolver_program.clone(),
        config.resolver_args.clone(),
        config.resolver_timeout,
    ));
    let app = create_router(AppState::new(resolver, config.locale), &config.static_dir);

    let tcp_listener = listener::bind(&bind)
        .await
        .context("server failed to start")?;

    let url = match tcp_listener.local_addr() {
        Ok(bound) => listener::display_url(&binder, bound),
        Err(e) => {
            warn!(error = %e, "could not read bound address");
            format!("http://{}", bind.socket_addr_string())
        }
    };
    info!(url = %url, "server running");

    if config.dedicated {
        info!("dedicated mode enabled, not opening a browser");
    } else if let Err(e) = launcher::open_browser(&url) {
        warn!(error = %e, "failed to open browser");
    }

    listener::serve(tcp_listener, app, shutdown_signal())
        .await
        .context("server error")
}

/// Wait for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    info!("received shutdown signal");
}
