//! Time-bounded address block store.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

/// One live block.
#[derive(Debug, Clone)]
pub struct BlockEntry {
    pub ip: String,
    pub reason: String,
    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at_ms: i64,
}

impl BlockEntry {
    /// Remaining lifetime in whole seconds, zero once expired.
    pub fn expires_in_secs(&self) -> i64 {
        ((self.expires_at_ms - now_ms()) / 1000).max(0)
    }
}

/// Concurrent map of blocked addresses with per-entry expiry.
///
/// Expired entries are deleted lazily on the read that finds them, and
/// [`list`](Denylist::list)/[`size`](Denylist::size) purge store-wide
/// first, so no query ever reports a stale block. The periodic sweeper
/// (see [`sweep`](crate::denylist::sweep)) keeps a quiet store shrinking
/// between reads.
///
/// Cheap to clone; clones share the underlying map.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    entries: Arc<DashMap<String, BlockEntry>>,
}

impl Denylist {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Insert or replace the block for `ip`, expiring `ttl_seconds` from
    /// now.
    ///
    /// TTL validation is the caller's contract. A non-positive or
    /// non-finite TTL is stored as an already-past expiry, never a panic.
    pub fn add(&self, ip: &str, ttl_seconds: f64, reason: &str) {
        let expires_at_ms = now_ms() + (ttl_seconds * 1000.0) as i64;
        self.entries.insert(
            ip.to_string(),
            BlockEntry {
                ip: ip.to_string(),
                reason: reason.to_string(),
                expires_at_ms,
            },
        );
    }

    /// Delete any block for `ip`. Unblocking an address that was never
    /// blocked is a no-op.
    pub fn remove(&self, ip: &str) {
        self.entries.remove(ip);
    }

    /// The live block for `ip`, if any.
    ///
    /// An expired hit is deleted on the way out, which amortizes cleanup
    /// across reads. The delete re-checks expiry under the shard lock so a
    /// concurrent re-add is not clobbered.
    pub fn get(&self, ip: &str) -> Option<BlockEntry> {
        let now = now_ms();
        let entry = self.entries.get(ip).map(|entry| entry.value().clone())?;
        if entry.expires_at_ms > now {
            return Some(entry);
        }
        self.entries.remove_if(ip, |_, entry| entry.expires_at_ms <= now);
        None
    }

    /// All live blocks, after purging expired ones store-wide.
    pub fn list(&self) -> Vec<BlockEntry> {
        self.cleanup_expired();
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of live blocks, after purging expired ones store-wide.
    pub fn size(&self) -> usize {
        self.cleanup_expired();
        self.entries.len()
    }

    /// Drop every entry whose expiry has passed. Safe to call from any
    /// thread at any time, and idempotent.
    pub fn cleanup_expired(&self) {
        let now = now_ms();
        self.entries.retain(|_, entry| entry.expires_at_ms > now);
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_add_then_get_returns_live_entry() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 60.0, "abuse");

        let entry = denylist.get("203.0.113.5").expect("entry should be live");
        assert_eq!(entry.ip, "203.0.113.5");
        assert_eq!(entry.reason, "abuse");
        assert!(entry.expires_in_secs() > 0);
        assert!(entry.expires_in_secs() <= 60);
    }

    #[test]
    fn test_get_misses_for_unknown_ip() {
        let denylist = Denylist::new();
        assert!(denylist.get("198.51.100.1").is_none());
    }

    #[test]
    fn test_expired_entry_is_deleted_on_read() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 0.02, "short block");
        assert!(denylist.get("203.0.113.5").is_some());

        thread::sleep(Duration::from_millis(40));
        assert!(denylist.get("203.0.113.5").is_none());
        // The miss removed the entry, not just hid it.
        assert_eq!(denylist.size(), 0);
    }

    #[test]
    fn test_non_positive_ttl_stores_past_expiry() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 0.0, "zero ttl");
        denylist.add("203.0.113.6", -5.0, "negative ttl");
        denylist.add("203.0.113.7", f64::NAN, "nan ttl");

        assert!(denylist.get("203.0.113.5").is_none());
        assert!(denylist.get("203.0.113.6").is_none());
        assert!(denylist.get("203.0.113.7").is_none());
    }

    #[test]
    fn test_re_add_replaces_entry() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 60.0, "first");
        denylist.add("203.0.113.5", 120.0, "second");

        let entry = denylist.get("203.0.113.5").expect("entry should be live");
        assert_eq!(entry.reason, "second");
        assert_eq!(denylist.size(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 60.0, "abuse");
        denylist.remove("203.0.113.5");
        denylist.remove("203.0.113.5");
        assert!(denylist.get("203.0.113.5").is_none());
    }

    #[test]
    fn test_list_and_size_purge_expired_entries() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", 60.0, "live");
        denylist.add("203.0.113.6", -1.0, "dead");

        assert_eq!(denylist.size(), 1);
        let entries = denylist.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip, "203.0.113.5");
    }

    #[test]
    fn test_clones_share_state() {
        let denylist = Denylist::new();
        let clone = denylist.clone();
        denylist.add("203.0.113.5", 60.0, "abuse");
        assert!(clone.get("203.0.113.5").is_some());
    }
}
