//! Derived display metrics.
//!
//! Pure calendar and arithmetic helpers behind the dashboard widgets:
//! age from birth date, due-date deltas, weight trend, body condition.
//! Every function takes an explicit as-of date; nothing here reads the
//! system clock, so results are deterministic and testable.

mod condition;
mod dates;
mod weight;

pub use condition::*;
pub use dates::*;
pub use weight::*;
