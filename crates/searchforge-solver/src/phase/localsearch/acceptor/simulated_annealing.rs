//! Simulated annealing acceptor.

use rand::Rng;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Floor for every temperature level, so the acceptance formula never divides by zero.
pub(crate) const MIN_TEMPERATURE: f64 = 1e-100;

/// Probability of accepting a worsening move at the given per-level temperatures.
///
/// Each level where `candidate` is worse than `reference` contributes a
/// factor `exp(-diff / temperature)`; levels that are equal or better
/// contribute nothing.
pub(crate) fn acceptance_chance<Sc: Score>(
    reference: &Sc,
    candidate: &Sc,
    temperature_levels: &[f64],
) -> f64 {
    let reference_levels = reference.to_level_doubles();
    let candidate_levels = candidate.to_level_doubles();
    reference_levels
        .iter()
        .zip(candidate_levels.iter())
        .zip(temperature_levels.iter())
        .map(|((reference, candidate), temperature)| (reference - candidate, temperature))
        .filter(|(diff, _)| *diff > 0.0)
        .map(|(diff, temperature)| (-diff / temperature).exp())
        .product()
}

/// Simulated annealing acceptor - accepts worsening moves with a cooling probability.
///
/// The temperature starts at a configured score and falls linearly with the
/// time gradient. Levels are cooled independently, so a starting temperature
/// of `0hard/100soft` never tolerates a hard level getting worse.
///
/// # Example
///
/// ```
/// use searchforge_core::HardSoftScore;
/// use searchforge_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(HardSoftScore::of(0, 100));
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor<Sc: Score> {
    starting_temperature: Sc,
    starting_levels: Vec<f64>,
    temperature_levels: Vec<f64>,
}

impl<Sc: Score> SimulatedAnnealingAcceptor<Sc> {
    pub fn new(starting_temperature: Sc) -> Self {
        let starting_levels = starting_temperature.to_level_doubles();
        Self {
            starting_temperature,
            temperature_levels: starting_levels.clone(),
            starting_levels,
        }
    }

    pub fn starting_temperature(&self) -> Sc {
        self.starting_temperature
    }

    /// Current per-level temperature, most significant level first.
    pub fn temperature_levels(&self) -> &[f64] {
        &self.temperature_levels
    }
}

impl<S, M> Acceptor<S, M> for SimulatedAnnealingAcceptor<S::Score>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, _phase_scope: &PhaseScope<S, M>) -> Result<()> {
        if self.starting_levels.iter().any(|level| *level < 0.0) {
            return Err(SolverError::config(
                "starting_temperature",
                format!(
                    "every level must be at least zero, got {}",
                    self.starting_temperature
                ),
            ));
        }
        self.temperature_levels = self.starting_levels.clone();
        Ok(())
    }

    fn step_started(&mut self, _phase_scope: &PhaseScope<S, M>, step_scope: &StepScope<S, M>) {
        let remaining = 1.0 - step_scope.time_gradient();
        self.temperature_levels = self
            .starting_levels
            .iter()
            .map(|level| (level * remaining).max(MIN_TEMPERATURE))
            .collect();
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let last_step_score = move_scope.last_step_score();
        let score = move_scope.score();
        if score >= last_step_score {
            return true;
        }
        let chance = acceptance_chance(&last_step_score, &score, &self.temperature_levels);
        move_scope.rng().random::<f64>() < chance
    }
}
