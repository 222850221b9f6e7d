//! Step counting hill climbing acceptor.

use searchforge_config::StepCountingHillClimbingType;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Step counting hill climbing acceptor - accepts moves at or above a stepwise threshold.
///
/// The threshold starts at the best score when the phase starts. A counter
/// grows each step according to the counting mode; once it reaches the
/// configured size, the threshold drops to the current step score and the
/// counter restarts.
///
/// # Example
///
/// ```
/// use searchforge_config::StepCountingHillClimbingType;
/// use searchforge_core::SimpleScore;
/// use searchforge_solver::phase::localsearch::StepCountingHillClimbingAcceptor;
///
/// let acceptor = StepCountingHillClimbingAcceptor::<SimpleScore>::new(
///     50,
///     StepCountingHillClimbingType::EqualOrImprovingStep,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StepCountingHillClimbingAcceptor<Sc: Score> {
    step_counting_hill_climbing_size: usize,
    counting_type: StepCountingHillClimbingType,
    threshold_score: Option<Sc>,
    count: u32,
}

impl<Sc: Score> StepCountingHillClimbingAcceptor<Sc> {
    pub fn new(size: usize, counting_type: StepCountingHillClimbingType) -> Self {
        Self {
            step_counting_hill_climbing_size: size,
            counting_type,
            threshold_score: None,
            count: 0,
        }
    }

    /// Current threshold, once the phase started.
    pub fn threshold_score(&self) -> Option<Sc> {
        self.threshold_score
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    fn count_increment(
        &self,
        previous_score: Sc,
        step_score: Sc,
        selected: u64,
        accepted: u64,
    ) -> u32 {
        match self.counting_type {
            StepCountingHillClimbingType::SelectedMove => {
                u32::try_from(selected).unwrap_or(u32::MAX)
            }
            StepCountingHillClimbingType::AcceptedMove => {
                u32::try_from(accepted).unwrap_or(u32::MAX)
            }
            StepCountingHillClimbingType::Step => 1,
            StepCountingHillClimbingType::EqualOrImprovingStep => {
                u32::from(step_score >= previous_score)
            }
            StepCountingHillClimbingType::ImprovingStep => u32::from(step_score > previous_score),
        }
    }
}

impl<S, M> Acceptor<S, M> for StepCountingHillClimbingAcceptor<S::Score>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        if self.step_counting_hill_climbing_size == 0 {
            return Err(SolverError::config(
                "step_counting_hill_climbing_size",
                "must be positive, got 0",
            ));
        }
        self.threshold_score = Some(phase_scope.best_score());
        self.count = 0;
        Ok(())
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let score = move_scope.score();
        score >= move_scope.last_step_score()
            || self.threshold_score.is_some_and(|threshold| score >= threshold)
    }

    fn step_ended(
        &mut self,
        phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        _solution: &S,
    ) {
        let Some(step_score) = step_scope.score() else {
            return;
        };
        let increment = self.count_increment(
            phase_scope.last_step_score(),
            step_score,
            step_scope.selected_move_count(),
            step_scope.accepted_move_count(),
        );
        self.count = self.count.saturating_add(increment);
        if self.count as usize >= self.step_counting_hill_climbing_size {
            self.threshold_score = Some(step_score);
            self.count = 0;
        }
    }
}
