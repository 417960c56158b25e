//! Trusted-proxy policy.

use crate::identity::normalize::normalize_ip;

/// Whether the direct TCP peer is infrastructure we accept forwarding
/// headers from.
///
/// Loopback and the RFC 1918 private ranges qualify; a forwarded header
/// arriving from any other peer is attacker-controlled and must be ignored.
/// The peer address is canonicalized first so a dual-stack socket reporting
/// `::ffff:10.0.0.4` is treated as `10.0.0.4`.
pub fn is_trusted_proxy(peer_addr: &str) -> bool {
    let ip = normalize_ip(peer_addr);

    if ip == "127.0.0.1" {
        return true;
    }

    if ip.starts_with("10.") || ip.starts_with("192.168.") {
        return true;
    }

    // 172.16.0.0/12 covers second octets 16 through 31 only.
    if let Some(rest) = ip.strip_prefix("172.") {
        if let Some(second) = rest.split('.').next().and_then(|octet| octet.parse::<u8>().ok()) {
            return (16..=31).contains(&second);
        }
    }

    false
}
