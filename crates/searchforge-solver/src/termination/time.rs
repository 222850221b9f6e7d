//! Time-based termination.

use std::time::{Duration, Instant};

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::{gradient, Termination};
use crate::scope::SolverScope;

/// Terminates after a time limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use searchforge_solver::termination::TimeTermination;
///
/// // Terminate after 30 seconds
/// let term = TimeTermination::new(Duration::from_secs(30));
/// assert_eq!(term.limit(), Duration::from_secs(30));
///
/// // Or use convenience constructors
/// let term = TimeTermination::seconds(30);
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
    phase_start: Option<Instant>,
}

impl TimeTermination {
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

    fn phase_elapsed<S, D>(&self, solver_scope: &SolverScope<S, D>) -> Duration
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        match self.phase_start {
            Some(start) => start.elapsed(),
            None => solver_scope.elapsed(),
        }
    }
}

impl<S, D> Termination<S, D> for TimeTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.elapsed() >= self.limit
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.phase_elapsed(solver_scope) >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(
            solver_scope.elapsed().as_secs_f64(),
            self.limit.as_secs_f64(),
        )
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        gradient(
            self.phase_elapsed(solver_scope).as_secs_f64(),
            self.limit.as_secs_f64(),
        )
    }

    fn phase_started(&mut self, _solver_scope: &SolverScope<S, D>) {
        self.phase_start = Some(Instant::now());
    }
}
