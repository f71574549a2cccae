//! Utility functions and helpers.

pub mod clock;
pub mod render;

pub use clock::{Clock, FixedClock, SystemClock};
pub use render::render;
