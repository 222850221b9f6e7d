//! Scope hierarchy for solver execution.
//!
//! Scopes hold state at different levels of the solving process:
//! - [`SolverScope`]: top level, owns the score director, the best solution
//!   and the random source
//! - [`PhaseScope`]: per-phase best score, step chain and counters
//! - [`StepScope`]: one step's chosen move and score
//! - [`MoveScope`]: one candidate evaluation, handed to acceptors

mod move_scope;
mod phase;
mod solver;
mod step;

pub use move_scope::MoveScope;
pub use phase::PhaseScope;
pub use solver::{build_rng, SolverScope};
pub use step::StepScope;
