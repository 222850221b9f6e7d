//! Score directors for SearchForge.
//!
//! A score director owns the working solution, brackets every variable
//! change with before/after notifications and computes the score on
//! demand. Move evaluation workers each get their own director, built from
//! a [`DirectorFactory`].

pub mod director;

pub use director::{DirectorFactory, ScoreDirector, ScoreDirectorFactory, SimpleScoreDirector};
