//! Step count termination.

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::{gradient, Termination};
use crate::scope::SolverScope;

/// Terminates after a step count.
///
/// # Example
///
/// ```
/// use searchforge_solver::termination::StepCountTermination;
///
/// // Terminate after 1000 steps
/// let term = StepCountTermination::new(1000);
/// assert_eq!(term.limit(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
    phase_start_step: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            phase_start_step: 0,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    fn phase_steps<S, D>(&self, solver_scope: &SolverScope<S, D>) -> u64
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        solver_scope
            .total_step_count()
            .saturating_sub(self.phase_start_step)
    }
}

impl<S, D> Termination<S, D> for StepCountTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.total_step_count() >= self.limit
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.phase_steps(solver_scope) >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(solver_scope.total_step_count() as f64, self.limit as f64)
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(self.phase_steps(solver_scope) as f64, self.limit as f64)
    }

    fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
        self.phase_start_step = solver_scope.total_step_count();
    }
}
