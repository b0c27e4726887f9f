//! Outcome model: how a dispatched prompt ended up.
//!
//! The completion callback alone cannot distinguish "my prompt was shown"
//! from "my prompt was silently dropped", so every completion carries one of
//! these values. Callers that only care about "it's over" can ignore it.

use serde::{Deserialize, Serialize};

/// Final classification of a dispatched prompt.
///
/// Serialized SCREAMING_SNAKE_CASE for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The body ran and signalled completion.
    Presented,

    /// The predicate was false at execution time; the body never ran, but
    /// the task still passed through the lane administratively.
    Skipped,

    /// A run-if-idle prompt found the lane occupied and was rejected.
    DroppedBusy,

    /// An ignorable prompt was discarded before ever reaching the lane.
    Ignored,
}

impl Outcome {
    /// Did the prompt's body actually run?
    pub fn ran(self) -> bool {
        matches!(self, Outcome::Presented)
    }

    /// Did the prompt occupy the lane at all (ran or skipped in place)?
    pub fn admitted(self) -> bool {
        matches!(self, Outcome::Presented | Outcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_as_screaming_snake_case() {
        let s = serde_json::to_string(&Outcome::Presented).unwrap();
        assert_eq!(s, "\"PRESENTED\"");

        let s = serde_json::to_string(&Outcome::DroppedBusy).unwrap();
        assert_eq!(s, "\"DROPPED_BUSY\"");
    }

    #[test]
    fn only_presented_counts_as_ran() {
        assert!(Outcome::Presented.ran());
        assert!(!Outcome::Skipped.ran());
        assert!(!Outcome::DroppedBusy.ran());
        assert!(!Outcome::Ignored.ran());
    }

    #[test]
    fn admitted_covers_both_lane_outcomes() {
        assert!(Outcome::Presented.admitted());
        assert!(Outcome::Skipped.admitted());
        assert!(!Outcome::DroppedBusy.admitted());
        assert!(!Outcome::Ignored.admitted());
    }
}
