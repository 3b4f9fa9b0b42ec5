//! Shared building blocks for the time-lock vault workspace.
//!
//! - [`address`]: the identity type used for depositors, recipients and
//!   withdrawal destinations.
//! - [`utils::time`]: wall-clock helpers and the [`Clock`] abstraction used
//!   for maturity checks.

pub mod address;
pub mod utils;

pub use address::{Address, AddressError, ZERO_ADDRESS};
pub use utils::time::{current_time, Clock, ManualClock, SystemClock};
