//! Great deluge acceptor.

use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Default rise of the water level per step, as a fraction of the starting level.
pub const DEFAULT_WATER_LEVEL_INCREMENT_RATIO: f64 = 0.000_000_05;

/// Great deluge acceptor - accepts moves at or above a rising water level.
///
/// The level starts at the configured initial water level, or the best score
/// when the phase starts, and rises every step either by a fixed score or by
/// a ratio of the starting level's magnitude.
///
/// # Example
///
/// ```
/// use searchforge_core::SimpleScore;
/// use searchforge_solver::phase::localsearch::GreatDelugeAcceptor;
///
/// let acceptor = GreatDelugeAcceptor::<SimpleScore>::new()
///     .with_water_level_increment_score(SimpleScore::of(2));
/// ```
#[derive(Debug, Clone)]
pub struct GreatDelugeAcceptor<Sc: Score> {
    initial_water_level: Option<Sc>,
    water_level_increment_score: Option<Sc>,
    water_level_increment_ratio: Option<f64>,
    starting_water_level: Sc,
    current_water_level: Sc,
    cumulative_ratio: f64,
}

impl<Sc: Score> GreatDelugeAcceptor<Sc> {
    pub fn new() -> Self {
        Self {
            initial_water_level: None,
            water_level_increment_score: None,
            water_level_increment_ratio: None,
            starting_water_level: Sc::zero(),
            current_water_level: Sc::zero(),
            cumulative_ratio: 0.0,
        }
    }

    pub fn with_initial_water_level(mut self, level: Sc) -> Self {
        self.initial_water_level = Some(level);
        self
    }

    pub fn with_water_level_increment_score(mut self, increment: Sc) -> Self {
        self.water_level_increment_score = Some(increment);
        self
    }

    pub fn with_water_level_increment_ratio(mut self, ratio: f64) -> Self {
        self.water_level_increment_ratio = Some(ratio);
        self
    }

    pub fn water_level(&self) -> Sc {
        self.current_water_level
    }

    fn validate(&self) -> Result<()> {
        match (self.water_level_increment_score, self.water_level_increment_ratio) {
            (Some(_), Some(_)) => Err(SolverError::config(
                "water_level_increment_score",
                "cannot be combined with water_level_increment_ratio",
            )),
            (Some(increment), None) if increment < Sc::zero() => Err(SolverError::config(
                "water_level_increment_score",
                format!("must not be negative, got {}", increment),
            )),
            (None, Some(ratio)) if ratio.is_nan() || ratio <= 0.0 => Err(SolverError::config(
                "water_level_increment_ratio",
                format!("must be positive, got {}", ratio),
            )),
            _ => Ok(()),
        }
    }
}

impl<Sc: Score> Default for GreatDelugeAcceptor<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> Acceptor<S, M> for GreatDelugeAcceptor<S::Score>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        self.validate()?;
        self.starting_water_level = self
            .initial_water_level
            .unwrap_or_else(|| phase_scope.best_score());
        self.current_water_level = self.starting_water_level;
        self.cumulative_ratio = 0.0;
        Ok(())
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let score = move_scope.score();
        score >= self.current_water_level || score >= move_scope.last_step_score()
    }

    fn step_ended(
        &mut self,
        _phase_scope: &PhaseScope<S, M>,
        _step_scope: &StepScope<S, M>,
        _solution: &S,
    ) {
        match self.water_level_increment_score {
            Some(increment) => {
                self.current_water_level = self.current_water_level + increment;
            }
            None => {
                self.cumulative_ratio += self
                    .water_level_increment_ratio
                    .unwrap_or(DEFAULT_WATER_LEVEL_INCREMENT_RATIO);
                self.current_water_level = self.starting_water_level
                    + self
                        .starting_water_level
                        .abs()
                        .multiply(self.cumulative_ratio);
            }
        }
    }
}
