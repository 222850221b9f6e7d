//! Core Score trait definition

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Neg, Sub};

use thiserror::Error;

/// Core trait for all score types in SearchForge.
///
/// Scores are compared lexicographically: the most significant level
/// decides, and only equal levels fall through to the next one.
/// Higher is better.
///
/// Acceptance decisions that promise "never reject a non-worsening move"
/// must use `Ord` on the score itself. [`to_level_doubles`](Score::to_level_doubles)
/// is lossy and only feeds probabilistic formulas and level-wise heuristics.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Eq
    + Ord
    + Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if no hard level is negative.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Converts each level to `f64`, most significant level first.
    fn to_level_doubles(&self) -> Vec<f64>;

    /// Multiplies every level by a scalar, rounding each level independently.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Returns the level-wise absolute value.
    fn abs(&self) -> Self;

    /// Returns true if this score is strictly better than `other`.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns true if this score is strictly worse than `other`.
    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// Scores that can be read from configuration strings.
pub trait ParseableScore: Score {
    /// Parses a score from its string representation.
    ///
    /// # Format
    /// - SimpleScore: `"42"`
    /// - HardSoftScore: `"0hard/-100soft"`
    /// - HardMediumSoftScore: `"0hard/0medium/-100soft"`
    /// - HardSoftDecimalScore: `"-1.5hard/-20.25soft"`
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string representation accepted by [`parse`](ParseableScore::parse).
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
