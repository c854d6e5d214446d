//! Resolver capability and its subprocess adapter.
//!
//! The gateway only sees [`ServerQuery`]; [`SubprocessResolver`] runs an
//! external program with `ip` and `port` appended as positional arguments
//! and interprets the JSON record it prints.

use qgate_core::{parse_reply, reply_error, GatewayError, GatewayResult, ServerInfo};
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

pub type QueryFuture<'a> = Pin<Box<dyn Future<Output = GatewayResult<ServerInfo>> + Send + 'a>>;

/// Anything that can answer a status query for `ip:port`.
pub trait ServerQuery: Send + Sync {
    fn query<'a>(&'a self, ip: &'a str, port: &'a str) -> QueryFuture<'a>;
}

/// Runs the resolver program once per query.
///
/// No shell is involved: `ip` and `port` are passed as separate arguments.
/// The child is killed if the call is dropped or times out.
#[derive(Debug, Clone)]
pub struct SubprocessResolver {
    program: String,
    args: Vec<String>,
    /// `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl SubprocessResolver {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    async fn run(&self, ip: &str, port: &str) -> GatewayResult<ServerInfo> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(ip)
            .arg(port)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(program = %self.program, args = ?self.args, ip, port, "running resolver");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| GatewayError::Timeout(limit))?,
            None => cmd.output().await,
        }
        .map_err(|e| GatewayError::Subprocess(format!("failed to run {}: {e}", self.program)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            // A resolver that explains itself on stdout before exiting non-zero
            // is reporting on the target, not crashing.
            if let Some(message) = reply_error(&stdout) {
                return Err(GatewayError::Domain(message));
            }
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(
                program = %self.program,
                status = %output.status,
                stderr = %stderr.chars().take(200).collect::<String>(),
                "resolver exited with error"
            );
            let diagnostic = if stderr.is_empty() {
                format!("resolver exited with {}", output.status)
            } else {
                stderr
            };
            return Err(GatewayError::Subprocess(diagnostic));
        }

        parse_reply(&stdout)
    }
}

impl ServerQuery for SubprocessResolver {
    fn query<'a>(&'a self, ip: &'a str, port: &'a str) -> QueryFuture<'a> {
        Box::pin(self.run(ip, port))
    }
}
