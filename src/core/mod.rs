pub mod clear;
pub mod clock;
pub mod tracker;
pub mod utils;

pub use clear::{ClearDebouncer, ClearOutcome, ClearReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use tracker::SpendTracker;
