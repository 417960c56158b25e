//! Client identity resolution.
//!
//! Answers one question for every request: which address do we attribute
//! this request to, and on what authority? Canonicalization keeps the
//! answer stable across address spellings, the trust policy decides when a
//! forwarding header may be believed, and the resolver combines both into a
//! [`ClientIdentity`] carrying its provenance.

pub mod normalize;
pub mod resolver;
pub mod trust;

pub use normalize::normalize_ip;
pub use resolver::{resolve_client_ip, ClientIdentity, IpSource, FORWARDED_FOR};
pub use trust::is_trusted_proxy;
