//! Per-session exposure tracking

use crate::ids::ExampleId;
use serde::Serialize;
use std::collections::HashSet;

/// Curated identifiers already confirmed by one session.
///
/// Only grows; there is no removal API. Lives as long as the
/// session and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExposureSet {
    seen: HashSet<ExampleId>,
}

impl ExposureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an exposure. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ExampleId) -> bool {
        self.seen.insert(id)
    }

    pub fn contains(&self, id: &ExampleId) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExampleId> {
        self.seen.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut exposure = ExposureSet::new();
        assert!(exposure.insert(ExampleId::new("a")));
        assert!(!exposure.insert(ExampleId::new("a")));
        assert_eq!(exposure.len(), 1);
        assert!(exposure.contains(&ExampleId::new("a")));
        assert!(!exposure.contains(&ExampleId::new("b")));
    }
}
