//! Prompt identifiers.
//!
//! ULID-based: sortable by admission time, generated without coordination,
//! 128-bit. Every dispatch call returns one, admitted or dropped, so log
//! lines and completion outcomes can be correlated.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::ports::Clock;

/// Identifier of a dispatched prompt.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromptId(Ulid);

impl PromptId {
    /// Generate a fresh id: timestamp from the clock, random entropy.
    ///
    /// With a [`FixedClock`](crate::ports::FixedClock) the timestamp part is
    /// deterministic while ids stay unique.
    pub fn generate(clock: &dyn Clock) -> Self {
        let timestamp_ms = clock.now().timestamp_millis() as u64;
        Self(Ulid::from_parts(timestamp_ms, rand::random()))
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for PromptId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prompt-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generated_ids_are_unique() {
        let id1 = PromptId::generate(&SystemClock);
        let id2 = PromptId::generate(&SystemClock);
        let id3 = PromptId::generate(&SystemClock);

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn display_uses_prompt_prefix() {
        let id = PromptId::generate(&SystemClock);
        assert!(id.to_string().starts_with("prompt-"));
    }

    #[test]
    fn fixed_clock_pins_the_timestamp_part() {
        let pinned = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(pinned);

        let id1 = PromptId::generate(&clock);
        let id2 = PromptId::generate(&clock);

        // Random part still differs.
        assert_ne!(id1, id2);

        // Timestamp occupies the top 48 bits of a ULID.
        let ts1 = (id1.as_ulid().0 >> 80) as u64;
        let ts2 = (id2.as_ulid().0 >> 80) as u64;
        assert_eq!(ts1, ts2);
        assert_eq!(ts1, pinned.timestamp_millis() as u64);
    }

    #[test]
    fn ids_survive_serde_roundtrip() {
        let id = PromptId::generate(&SystemClock);

        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: PromptId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(id, deserialized);
    }
}
