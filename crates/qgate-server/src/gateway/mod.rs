//! Gateway module: the HTTP query surface and its resolver adapter.
//!
//! # Submodule Architecture
//!
//! - **[`resolver`]**: The [`resolver::ServerQuery`] capability and the
//!   [`SubprocessResolver`] adapter that runs the external resolver program
//!   with a timeout and interprets its stdout.
//! - **[`handlers`]**: `POST /query` validation, resolver call, report
//!   rendering, and per-request logging.
//! - **[`error`]**: [`error::QueryFailure`], mapping `GatewayError` variants to
//!   400 / 500 / 504 plain-text responses.
//! - **[`router`]**: Route table, static UI bundle fallback, tracing layer.
//! - **[`state`]**: [`AppState`] shared by handlers.
//!
//! # Data Flow
//!
//! ```text
//! POST /query {ip, port}
//!   → handlers::query
//!     → ServerQuery::query (SubprocessResolver → external program)
//!       → qgate_core::parse_reply
//!     → qgate_core::format_report
//!   → 200 text/plain | QueryFailure
//! ```

pub mod error;
pub mod handlers;
pub mod resolver;
pub mod router;
pub mod state;

pub use resolver::SubprocessResolver;
pub use router::create_router;
pub use state::AppState;
