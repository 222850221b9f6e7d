//! Score director implementations.
//!
//! - [`SimpleScoreDirector`] - full recalculation with a cached score
//! - [`ScoreDirectorFactory`] - builds independent directors for worker forks

mod factory;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use factory::{DirectorFactory, ScoreDirectorFactory};
pub use simple::SimpleScoreDirector;
pub use traits::ScoreDirector;
