//! Ports: the seams the core leaves to its host.
//!
//! The lane hard-codes neither where completion callbacks run nor where
//! time comes from; both are injected here, which is what keeps the core
//! testable without a UI loop.

pub mod callback;
pub mod clock;

pub use callback::{CallbackContext, InlineContext, SpawnContext};
pub use clock::{Clock, FixedClock, SystemClock};
