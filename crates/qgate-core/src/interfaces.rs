//! Local interface enumeration.
//!
//! Only IPv4 addresses of non-internal interfaces are considered. The order
//! is whatever the OS reports and may change between runs.

use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, warn};

use crate::addr::is_private_lan_v4;

/// Source of local, non-internal IPv4 addresses.
pub trait InterfaceSource: Send + Sync {
    /// All IPv4 addresses of non-loopback interfaces, in enumeration order.
    fn external_ipv4(&self) -> Vec<Ipv4Addr>;
}

/// Reads interfaces from the operating system via `if_addrs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn external_ipv4(&self) -> Vec<Ipv4Addr> {
        let interfaces = match if_addrs::get_if_addrs() {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "interface enumeration failed");
                return Vec::new();
            }
        };

        let addrs: Vec<Ipv4Addr> = interfaces
            .iter()
            .filter(|iface| !iface.is_loopback())
            .filter_map(|iface| match iface.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .collect();

        debug!(count = addrs.len(), "enumerated external IPv4 addresses");
        addrs
    }
}

/// Fixed address list, for tests and hosts that want a deterministic order.
#[derive(Debug, Default, Clone)]
pub struct StaticInterfaces(pub Vec<Ipv4Addr>);

impl InterfaceSource for StaticInterfaces {
    fn external_ipv4(&self) -> Vec<Ipv4Addr> {
        self.0.clone()
    }
}

/// First LAN-private address, if any.
pub fn first_private_lan(source: &dyn InterfaceSource) -> Option<Ipv4Addr> {
    source
        .external_ipv4()
        .into_iter()
        .find(|addr| is_private_lan_v4(*addr))
}

/// Every non-internal IPv4 address in enumeration order.
pub fn all_external(source: &dyn InterfaceSource) -> Vec<Ipv4Addr> {
    source.external_ipv4()
}
