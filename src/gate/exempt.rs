//! Paths excluded from denylist enforcement.

use std::collections::HashSet;

/// Immutable set of request paths the gate never blocks.
///
/// Health probes and the metrics scrape live here so a blocked address can
/// still be observed and monitoring never locks itself out. Matching is
/// exact, query strings excluded; the set is fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    paths: HashSet<String>,
}

impl ExemptPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}
