//! Address canonicalization.

/// Collapse equivalent spellings of the same host into a single canonical
/// form.
///
/// The IPv6 loopback becomes the IPv4 loopback, and IPv4-mapped IPv6
/// addresses (`::ffff:a.b.c.d`, the form dual-stack sockets report) are
/// rewritten to the embedded IPv4 address. Everything else passes through
/// unchanged, including strings that are not addresses at all; callers that
/// need rejection semantics do their own validation.
pub fn normalize_ip(ip: &str) -> String {
    if ip == "::1" {
        return "127.0.0.1".to_string();
    }

    if let Some(v4) = ip.strip_prefix("::ffff:") {
        return v4.to_string();
    }

    ip.to_string()
}
