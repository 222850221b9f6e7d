//! Score types for representing solution quality
//!
//! A score is an immutable tuple of numeric levels compared lexicographically,
//! most significant level first. Arithmetic is level-wise; no level ever
//! borrows from another.

#[macro_use]
mod macros;

#[cfg(feature = "decimal")]
mod hard_soft_decimal;
mod hard_medium_soft;
mod hard_soft;
mod simple;
mod traits;


#[cfg(feature = "decimal")]
pub use hard_soft_decimal::HardSoftDecimalScore;
pub use hard_medium_soft::HardMediumSoftScore;
pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};
