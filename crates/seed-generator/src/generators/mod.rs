//! Value generators for the numeric and timestamp fields of a record.
//!
//! Each generator takes the RNG explicitly so callers control determinism.

pub mod numeric;
pub mod timestamp;

pub use numeric::{coin_flip, generate_score};
pub use timestamp::{generate_timestamp_in_window, window_start};
