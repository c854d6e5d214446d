//! qgate-core: bind-address resolution and query-reply handling for the
//! qgate game-server status gateway.
//!
//! Provides RFC1918 classification, local interface enumeration, listen
//! address selection, resolver reply parsing with version sanitization, and
//! the localized text report.

pub mod addr;
pub mod bind;
pub mod error;
pub mod interfaces;
pub mod report;
pub mod server_info;

// Re-export commonly used items at crate root.
pub use addr::{is_private_lan, is_private_lan_v4, LOOPBACK};
pub use bind::{resolve_port, BindIntent, BindResolver, PortResolution, ResolvedBind, DEFAULT_PORT};
pub use error::{GatewayError, GatewayResult};
pub use interfaces::{InterfaceSource, StaticInterfaces, SystemInterfaces};
pub use report::{format_report, Locale, ServerType};
pub use server_info::{parse_reply, reply_error, sanitize_version, ServerInfo, VacStatus};
