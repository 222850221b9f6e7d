//! Score-based termination.

use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::SolverScope;

/// Terminates when the best score reaches or exceeds a target.
///
/// There is no meaningful progress measure before the target is hit, so
/// the time gradient is `0.0` until then and `1.0` after.
///
/// # Example
///
/// ```
/// use searchforge_solver::termination::BestScoreTermination;
/// use searchforge_core::score::SimpleScore;
///
/// let term = BestScoreTermination::new(SimpleScore::of(0));
/// assert_eq!(term.target_score(), SimpleScore::of(0));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    target_score: Sc,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(target_score: Sc) -> Self {
        Self { target_score }
    }

    pub fn target_score(&self) -> Sc {
        self.target_score
    }

    fn is_reached<S, D>(&self, solver_scope: &SolverScope<S, D>) -> bool
    where
        S: PlanningSolution<Score = Sc>,
        D: ScoreDirector<S>,
    {
        solver_scope
            .best_score()
            .is_some_and(|score| *score >= self.target_score)
    }
}

impl<S, D> Termination<S, D> for BestScoreTermination<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.is_reached(solver_scope)
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.is_reached(solver_scope)
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if self.is_reached(solver_scope) {
            1.0
        } else {
            0.0
        }
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.calculate_solver_time_gradient(solver_scope)
    }
}
