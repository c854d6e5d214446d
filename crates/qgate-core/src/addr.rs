//! RFC1918 classification of IPv4 addresses.
//!
//! Classification works on the textual dotted quad so that operator input can
//! be checked before it is known to be a valid socket address. Anything that
//! is not exactly four numeric octets is "not private"; it is never an error.

use std::net::Ipv4Addr;

/// Loopback address used whenever the listener is forced onto the local host.
pub const LOOPBACK: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Whether `addr` falls inside 10/8, 172.16/12 or 192.168/16.
///
/// Malformed input (wrong octet count, non-numeric parts, IPv6) returns
/// `false`.
pub fn is_private_lan(addr: &str) -> bool {
    match parse_octets(addr) {
        Some(octets) => classify(octets[0], octets[1]),
        None => false,
    }
}

/// Typed variant of [`is_private_lan`] for already-parsed addresses.
pub fn is_private_lan_v4(addr: Ipv4Addr) -> bool {
    let [a, b, _, _] = addr.octets();
    classify(a, b)
}

fn classify(first: u8, second: u8) -> bool {
    match (first, second) {
        (10, _) => true,
        (172, 16..=31) => true,
        (192, 168) => true,
        _ => false,
    }
}

fn parse_octets(addr: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = addr.trim().split('.');
    for slot in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Octets above 255 are malformed, so `10.0.0.300` is not private.
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}
