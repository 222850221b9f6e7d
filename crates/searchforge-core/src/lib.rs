//! SearchForge Core - score types and domain traits
//!
//! This crate provides the value types the local search engine is built on:
//! - Score types: multi-level, lexicographically ordered objective values
//! - `PlanningSolution`: the contract every working solution fulfils
//! - `SolverError`: the error type shared by every SearchForge crate

pub mod domain;
pub mod error;
pub mod score;

pub use domain::PlanningSolution;
pub use error::{Result, SolverError};
#[cfg(feature = "decimal")]
pub use score::HardSoftDecimalScore;
pub use score::{
    HardMediumSoftScore, HardSoftScore, ParseableScore, Score, ScoreParseError, SimpleScore,
};
