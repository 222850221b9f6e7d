//! Late simulated annealing acceptor.

use rand::Rng;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

use super::late_acceptance::LateScores;
use super::simulated_annealing::{acceptance_chance, MIN_TEMPERATURE};
use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Late simulated annealing - late acceptance with a probabilistic fallback.
///
/// Moves at least as good as the last step or the late score are accepted.
/// Anything worse gets the simulated annealing chance, with a temperature
/// equal to the per-level gap between the last step and the late score.
/// The temperature therefore follows how far the search has wandered.
#[derive(Debug, Clone)]
pub struct LateSimulatedAnnealingAcceptor<Sc: Score> {
    late_simulated_annealing_size: usize,
    late_scores: LateScores<Sc>,
}

impl<Sc: Score> LateSimulatedAnnealingAcceptor<Sc> {
    pub fn new(late_simulated_annealing_size: usize) -> Self {
        Self {
            late_simulated_annealing_size,
            late_scores: LateScores::new(),
        }
    }

    pub fn late_simulated_annealing_size(&self) -> usize {
        self.late_simulated_annealing_size
    }
}

impl<S, M> Acceptor<S, M> for LateSimulatedAnnealingAcceptor<S::Score>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        if self.late_simulated_annealing_size == 0 {
            return Err(SolverError::config(
                "late_simulated_annealing_size",
                "must be positive, got 0",
            ));
        }
        self.late_scores.reset(
            self.late_simulated_annealing_size,
            phase_scope.starting_score(),
        );
        Ok(())
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let score = move_scope.score();
        let last_step_score = move_scope.last_step_score();
        let Some(late_score) = self.late_scores.late() else {
            return score >= last_step_score;
        };
        if score >= last_step_score || score >= late_score {
            return true;
        }

        let temperature_levels: Vec<f64> = last_step_score
            .to_level_doubles()
            .iter()
            .zip(late_score.to_level_doubles())
            .map(|(last, late)| (last - late).abs().max(MIN_TEMPERATURE))
            .collect();
        let chance = acceptance_chance(&last_step_score, &score, &temperature_levels);
        move_scope.rng().random::<f64>() < chance
    }

    fn step_ended(
        &mut self,
        _phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        _solution: &S,
    ) {
        if let Some(score) = step_scope.score() {
            self.late_scores.push(score);
        }
    }
}
