//! Termination conditions based on lack of improvement.
//!
//! Both conditions read the improvement bookkeeping of the solver scope,
//! which the best solution recaller updates on every new best solution.

use std::time::{Duration, Instant};

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::{gradient, Termination};
use crate::scope::SolverScope;

/// Terminates if no improvement occurs for a specified number of steps.
///
/// Useful to stop once the search has plateaued. Inside a phase, steps taken
/// before the phase started do not count.
///
/// The time gradient is the unimproved fraction of the limit, so it falls
/// back towards zero whenever a new best solution is found.
///
/// # Example
///
/// ```
/// use searchforge_solver::termination::UnimprovedStepCountTermination;
///
/// // Terminate after 100 steps without improvement
/// let term = UnimprovedStepCountTermination::new(100);
/// assert_eq!(term.limit(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
    phase_start_step: Option<u64>,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            phase_start_step: None,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    fn phase_unimproved<S, D>(&self, solver_scope: &SolverScope<S, D>) -> u64
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let unimproved = solver_scope.unimproved_step_count();
        match self.phase_start_step {
            Some(start) => unimproved.min(solver_scope.total_step_count().saturating_sub(start)),
            None => unimproved,
        }
    }
}

impl<S, D> Termination<S, D> for UnimprovedStepCountTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.unimproved_step_count() >= self.limit
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.phase_unimproved(solver_scope) >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(solver_scope.unimproved_step_count() as f64, self.limit as f64)
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(self.phase_unimproved(solver_scope) as f64, self.limit as f64)
    }

    fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
        self.phase_start_step = Some(solver_scope.total_step_count());
    }
}

/// Terminates if no improvement occurs for a specified duration.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use searchforge_solver::termination::UnimprovedTimeTermination;
///
/// // Terminate after 5 seconds without improvement
/// let term = UnimprovedTimeTermination::seconds(5);
/// assert_eq!(term.limit(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct UnimprovedTimeTermination {
    limit: Duration,
    phase_start: Option<Instant>,
}

impl UnimprovedTimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            phase_start: None,
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    fn phase_unimproved<S, D>(&self, solver_scope: &SolverScope<S, D>) -> Duration
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let unimproved = solver_scope.unimproved_duration();
        match self.phase_start {
            Some(start) => unimproved.min(start.elapsed()),
            None => unimproved,
        }
    }
}

impl<S, D> Termination<S, D> for UnimprovedTimeTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.unimproved_duration() >= self.limit
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.phase_unimproved(solver_scope) >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(
            solver_scope.unimproved_duration().as_secs_f64(),
            self.limit.as_secs_f64(),
        )
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(
            self.phase_unimproved(solver_scope).as_secs_f64(),
            self.limit.as_secs_f64(),
        )
    }

    fn phase_started(&mut self, _solver_scope: &SolverScope<S, D>) {
        self.phase_start = Some(Instant::now());
    }
}
