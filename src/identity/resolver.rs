//! Client address resolution with provenance.
//!
//! # Data Flow
//!
//! ```text
//! pre-resolved addr ──┐
//! x-forwarded-for ────┼──► first candidate wins ──► normalize ──► ClientIdentity
//! socket peer ────────┘         (header only if peer is trusted)
//! ```

use std::fmt;

use axum::http::HeaderMap;

use crate::identity::normalize::normalize_ip;
use crate::identity::trust::is_trusted_proxy;

/// Header consulted when the direct peer is a trusted proxy.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Where a client address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpSource {
    /// Supplied pre-resolved by an embedding layer and taken verbatim.
    PreResolved,
    /// First hop of `x-forwarded-for`, vouched for by a trusted peer.
    ForwardedFor,
    /// The transport peer address itself.
    Socket,
    /// No address could be determined.
    Unknown,
}

impl fmt::Display for IpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IpSource::PreResolved => "pre-resolved",
            IpSource::ForwardedFor => "x-forwarded-for",
            IpSource::Socket => "socket",
            IpSource::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// The authoritative client address for one request.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    /// Canonicalized address, or `"unknown"` when nothing could be resolved.
    pub ip: String,
    /// The address exactly as it appeared before canonicalization.
    pub raw_ip: Option<String>,
    /// Provenance of the address, for audit logging.
    pub source: IpSource,
}

/// Resolve the client address for a request. The first source to produce a
/// candidate wins; the candidate is then canonicalized.
///
/// Only the first hop of `x-forwarded-for` is honored, and only when the
/// transport peer is a trusted proxy. Later hops are writable by the client
/// even behind trusted infrastructure, so they never participate.
pub fn resolve_client_ip(
    pre_resolved: Option<&str>,
    peer_addr: Option<&str>,
    headers: &HeaderMap,
) -> ClientIdentity {
    let mut candidate: Option<String> = None;
    let mut source = IpSource::Unknown;

    if let Some(ip) = pre_resolved.filter(|ip| !ip.is_empty()) {
        candidate = Some(ip.to_string());
        source = IpSource::PreResolved;
    }

    if candidate.is_none() {
        if let Some(peer) = peer_addr {
            if is_trusted_proxy(peer) {
                if let Some(first_hop) = first_forwarded_hop(headers) {
                    candidate = Some(first_hop);
                    source = IpSource::ForwardedFor;
                }
            }
        }
    }

    if candidate.is_none() {
        if let Some(peer) = peer_addr.filter(|peer| !peer.is_empty()) {
            candidate = Some(peer.to_string());
            source = IpSource::Socket;
        }
    }

    match candidate {
        Some(raw) => ClientIdentity {
            ip: normalize_ip(&raw),
            raw_ip: Some(raw),
            source,
        },
        None => ClientIdentity {
            ip: "unknown".to_string(),
            raw_ip: None,
            source: IpSource::Unknown,
        },
    }
}

/// First entry of the forwarded chain, trimmed; `None` when the header is
/// absent, unreadable, or its first entry is empty.
fn first_forwarded_hop(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(FORWARDED_FOR)?.to_str().ok()?;
    let first = value.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}
