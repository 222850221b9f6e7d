//! Termination that never fires.

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::SolverScope;

/// Never terminates on its own.
///
/// The solve still stops when the terminate-early flag is raised or a phase
/// runs out of accepted moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTermination;

impl<S, D> Termination<S, D> for NeverTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        false
    }

    fn is_phase_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        false
    }

    fn calculate_solver_time_gradient(&self, _solver_scope: &SolverScope<S, D>) -> f64 {
        0.0
    }

    fn calculate_phase_time_gradient(&self, _solver_scope: &SolverScope<S, D>) -> f64 {
        0.0
    }
}
