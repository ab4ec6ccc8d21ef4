use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, unique identifier for a stored row.
///
/// The format is not contractual. Identifiers are produced by an
/// [`IdGenerator`] owned by the registry; callers only ever compare them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank (an unselected reference).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Source of fresh identifiers.
pub trait IdGenerator {
    /// Returns an identifier never returned before by this generator, and
    /// distinct from every identifier passed to [`IdGenerator::observe`].
    fn next_id(&mut self) -> Id;

    /// Records an identifier that already exists in storage.
    ///
    /// Generators that could collide with previously issued ids use this to
    /// skip past them when a registry is reopened.
    fn observe(&mut self, _id: &Id) {}
}

/// Monotonic counter producing `1`, `2`, `3`, ...
///
/// Once the counter is exhausted, ids fall back to random UUIDs, which
/// never parse as a counter value.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: u64,
    exhausted: bool,
}

impl SequentialIds {
    /// A counter whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: 0,
            exhausted: false,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Id {
        if !self.exhausted {
            if let Some(next) = self.last.checked_add(1) {
                self.last = next;
                return Id(next.to_string());
            }
            tracing::warn!("Sequential ids exhausted, falling back to random ids");
            self.exhausted = true;
        }
        RandomIds.next_id()
    }

    fn observe(&mut self, id: &Id) {
        if let Ok(n) = id.parse::<u64>() {
            self.last = self.last.max(n);
        }
    }
}

/// Random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> Id {
        Id(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), Id::from("1"));
        assert_eq!(ids.next_id(), Id::from("2"));
    }

    #[test]
    fn sequential_ids_resume_after_observed() {
        let mut ids = SequentialIds::new();
        ids.observe(&Id::from("41"));
        ids.observe(&Id::from("7"));
        ids.observe(&Id::from("not-a-number"));
        assert_eq!(ids.next_id(), Id::from("42"));
    }

    #[test]
    fn sequential_ids_fall_back_once_exhausted() {
        let mut ids = SequentialIds::new();
        let max = Id::new(u64::MAX.to_string());
        ids.observe(&max);

        let first = ids.next_id();
        let second = ids.next_id();

        assert_ne!(first, max);
        assert_ne!(first, Id::from("0"));
        assert!(first.parse::<u64>().is_err());
        assert_ne!(first, second);
    }

    #[test]
    fn random_ids_are_distinct() {
        let mut ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(Id::from("").is_blank());
        assert!(Id::from("  ").is_blank());
        assert!(!Id::from("1").is_blank());
    }
}
