//! Termination conditions for the solver and its phases.
//!
//! A termination answers two questions: should the whole solve stop, and
//! should the current phase stop. Solver-level terminations measure from the
//! moment solving started. A termination owned by a phase is told when the
//! phase starts and measures from there.

mod best_score;
mod composite;
mod never;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::scope::SolverScope;

pub use best_score::BestScoreTermination;
pub use composite::{AndTermination, BoxedTerminations, OrTermination};
pub use never::NeverTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::{UnimprovedStepCountTermination, UnimprovedTimeTermination};

/// Trait for determining when to stop solving.
///
/// Time gradients report progress towards the limit in `[0, 1]`;
/// temperature-based acceptors cool down as the gradient rises.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Termination<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Returns true if the whole solve should stop.
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    /// Returns true if the running phase should stop.
    ///
    /// Measured from the last `phase_started` call, or from the start of
    /// solving when the termination was never told about a phase.
    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64;

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64;

    /// Called when a phase owning this termination starts.
    fn phase_started(&mut self, _solver_scope: &SolverScope<S, D>) {}

    /// Called after every committed step of a phase owning this termination.
    fn step_ended(&mut self, _solver_scope: &SolverScope<S, D>) {}
}

impl<S, D, T> Termination<S, D> for Box<T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D> + ?Sized,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        (**self).is_solver_terminated(solver_scope)
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        (**self).is_phase_terminated(solver_scope)
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        (**self).calculate_solver_time_gradient(solver_scope)
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        (**self).calculate_phase_time_gradient(solver_scope)
    }

    fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
        (**self).phase_started(solver_scope)
    }

    fn step_ended(&mut self, solver_scope: &SolverScope<S, D>) {
        (**self).step_ended(solver_scope)
    }
}

/// Fraction of `limit` covered by `progress`, clamped to `[0, 1]`.
pub(crate) fn gradient(progress: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 1.0;
    }
    (progress / limit).clamp(0.0, 1.0)
}
