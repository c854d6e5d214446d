//! Bind-address resolution from operator intent.
//!
//! Runs once at startup, before the listener accepts traffic. None of the
//! operations here fail: bad input degrades to a documented default and the
//! substitution is logged.

use std::net::{IpAddr, Ipv4Addr};
use tracing::{info, warn};

use crate::addr::{is_private_lan, LOOPBACK};
use crate::interfaces::{all_external, first_private_lan, InterfaceSource, SystemInterfaces};

/// Port used when the requested one is missing, non-numeric or out of range.
pub const DEFAULT_PORT: u16 = 3000;

/// Operator intent read from the command line / config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindIntent {
    pub requested_address: String,
    /// Takes precedence over `force_lan`.
    pub force_loopback: bool,
    pub force_lan: bool,
}

/// Final listen address and port. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBind {
    pub address: String,
    pub port: u16,
}

impl ResolvedBind {
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Outcome of port validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortResolution {
    pub port: u16,
    /// `true` when the requested value was rejected and [`DEFAULT_PORT`] used.
    pub substituted: bool,
}

/// Parse a requested port, falling back to [`DEFAULT_PORT`].
pub fn resolve_port(raw: &str) -> PortResolution {
    match raw.trim().parse::<i64>() {
        Ok(n) if (1..=65535).contains(&n) => PortResolution {
            port: n as u16,
            substituted: false,
        },
        _ => {
            warn!(requested = %raw, default = DEFAULT_PORT, "invalid port, using default");
            PortResolution {
                port: DEFAULT_PORT,
                substituted: true,
            }
        }
    }
}

/// Chooses the listen address using the local interface list.
pub struct BindResolver {
    source: Box<dyn InterfaceSource>,
}

impl Default for BindResolver {
    fn default() -> Self {
        Self::new(Box::new(SystemInterfaces))
    }
}

impl BindResolver {
    pub fn new(source: Box<dyn InterfaceSource>) -> Self {
        Self { source }
    }

    /// Resolve the listen address for `intent`.
    ///
    /// Loopback forcing ignores the requested address. LAN forcing keeps a
    /// requested private address, otherwise substitutes the first private
    /// interface address; with no candidate the requested address is kept.
    pub fn resolve(&self, intent: &BindIntent) -> String {
        if intent.force_loopback {
            info!(requested = %intent.requested_address, "forcing bind to {LOOPBACK}");
            return LOOPBACK.to_string();
        }

        if intent.force_lan {
            if is_private_lan(&intent.requested_address) {
                return intent.requested_address.clone();
            }
            return match first_private_lan(self.source.as_ref()) {
                Some(lan) => {
                    info!(
                        requested = %intent.requested_address,
                        lan = %lan,
                        "requested address is not LAN-private, binding to LAN address"
                    );
                    lan.to_string()
                }
                None => {
                    warn!(
                        requested = %intent.requested_address,
                        "no LAN-private interface found, keeping requested address"
                    );
                    intent.requested_address.clone()
                }
            };
        }

        intent.requested_address.clone()
    }

    /// Resolve both address and port.
    pub fn resolve_bind(&self, intent: &BindIntent, raw_port: &str) -> ResolvedBind {
        ResolvedBind {
            address: self.resolve(intent),
            port: resolve_port(raw_port).port,
        }
    }

    /// Concrete address to show the operator for an actually bound address.
    ///
    /// A wildcard bind is reported as the first external interface address,
    /// or loopback when there is none. Does not affect what was bound.
    pub fn display_address(&self, bound: IpAddr) -> IpAddr {
        if bound != IpAddr::V4(Ipv4Addr::UNSPECIFIED) {
            return bound;
        }
        match all_external(self.source.as_ref()).first() {
            Some(addr) => {
                info!(addr = %addr, "wildcard bind, reporting first external address");
                IpAddr::V4(*addr)
            }
            None => {
                info!("wildcard bind and no external address found, reporting {LOOPBACK}");
                IpAddr::V4(LOOPBACK)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::StaticInterfaces;

    fn resolver(addrs: &[Ipv4Addr]) -> BindResolver {
        BindResolver::new(Box::new(StaticInterfaces(addrs.to_vec())))
    }

    fn intent(addr: &str, force_loopback: bool, force_lan: bool) -> BindIntent {
        BindIntent {
            requested_address: addr.to_string(),
            force_loopback,
            force_lan,
        }
    }

    #[test]
    fn test_loopback_wins_over_lan() {
        let r = resolver(&[Ipv4Addr::new(192, 168, 1, 10)]);
        assert_eq!(r.resolve(&intent("10.0.0.5", true, true)), "127.0.0.1");
    }

    #[test]
    fn test_force_lan_substitutes_candidate() {
        let r = resolver(&[Ipv4Addr::new(192, 168, 1, 10)]);
        assert_eq!(r.resolve(&intent("8.8.8.8", false, true)), "192.168.1.10");
    }

    #[test]
    fn test_force_lan_without_candidate_keeps_requested() {
        let r = resolver(&[]);
        assert_eq!(r.resolve(&intent("8.8.8.8", false, true)), "8.8.8.8");
        let r = resolver(&[Ipv4Addr::new(203, 0, 113, 9)]);
        assert_eq!(r.resolve(&intent("8.8.8.8", false, true)), "8.8.8.8");
    }

    #[test]
    fn test_force_lan_keeps_private_request() {
        let r = resolver(&[Ipv4Addr::new(192, 168, 1, 10)]);
        assert_eq!(r.resolve(&intent("10.0.0.5", false, true)), "10.0.0.5");
    }

    #[test]
    fn test_no_flags_is_verbatim() {
        let r = resolver(&[Ipv4Addr::new(192, 168, 1, 10)]);
        assert_eq!(r.resolve(&intent("0.0.0.0", false, false)), "0.0.0.0");
        assert_eq!(r.resolve(&intent("not-an-ip", false, false)), "not-an-ip");
    }

    #[test]
    fn test_port_validation() {
        assert_eq!(resolve_port("27015"), PortResolution { port: 27015, substituted: false });
        assert_eq!(resolve_port(" 80 ").port, 80);
        for bad in ["99999", "abc", "0", "-1", "", "65536", "3.5"] {
            let res = resolve_port(bad);
            assert_eq!(res.port, DEFAULT_PORT, "input {bad:?}");
            assert!(res.substituted);
        }
        assert_eq!(resolve_port("65535").port, 65535);
    }

    #[test]
    fn test_resolve_bind_combines_address_and_port() {
        let r = resolver(&[]);
        let bind = r.resolve_bind(&intent("127.0.0.1", false, false), "abc");
        assert_eq!(bind, ResolvedBind { address: "127.0.0.1".into(), port: 3000 });
        assert_eq!(bind.socket_addr_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_display_address_wildcard() {
        let r = resolver(&[Ipv4Addr::new(203, 0, 113, 7), Ipv4Addr::new(10, 0, 0, 2)]);
        let wildcard = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        assert_eq!(r.display_address(wildcard), IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)));

        let empty = resolver(&[]);
        assert_eq!(empty.display_address(wildcard), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_display_address_concrete_unchanged() {
        let r = resolver(&[Ipv4Addr::new(10, 0, 0, 2)]);
        let bound = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 4));
        assert_eq!(r.display_address(bound), bound);
    }
}
