//! Late acceptance acceptor.

use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Fixed-size ring of past step scores, primed with the phase's starting score.
#[derive(Debug, Clone)]
pub(crate) struct LateScores<Sc> {
    scores: Vec<Sc>,
    index: usize,
}

impl<Sc: Score> LateScores<Sc> {
    pub(crate) fn new() -> Self {
        Self {
            scores: Vec::new(),
            index: 0,
        }
    }

    pub(crate) fn reset(&mut self, size: usize, starting_score: Sc) {
        self.scores = vec![starting_score; size];
        self.index = 0;
    }

    /// The score recorded `size` steps ago.
    pub(crate) fn late(&self) -> Option<Sc> {
        self.scores.get(self.index).copied()
    }

    pub(crate) fn push(&mut self, score: Sc) {
        if let Some(slot) = self.scores.get_mut(self.index) {
            *slot = score;
            self.index = (self.index + 1) % self.scores.len();
        }
    }
}

/// Late acceptance acceptor - compares against the step score `size` steps ago.
///
/// A move is accepted if it is at least as good as the score from
/// `late_acceptance_size` steps back, or, unless hill climbing is switched
/// off, at least as good as the last step.
///
/// # Example
///
/// ```
/// use searchforge_core::SimpleScore;
/// use searchforge_solver::phase::localsearch::LateAcceptanceAcceptor;
///
/// let acceptor = LateAcceptanceAcceptor::<SimpleScore>::new(400).with_hill_climbing(false);
/// assert!(!acceptor.is_hill_climbing_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct LateAcceptanceAcceptor<Sc: Score> {
    late_acceptance_size: usize,
    hill_climbing_enabled: bool,
    late_scores: LateScores<Sc>,
}

impl<Sc: Score> LateAcceptanceAcceptor<Sc> {
    pub fn new(late_acceptance_size: usize) -> Self {
        Self {
            late_acceptance_size,
            hill_climbing_enabled: true,
            late_scores: LateScores::new(),
        }
    }

    pub fn with_hill_climbing(mut self, enabled: bool) -> Self {
        self.hill_climbing_enabled = enabled;
        self
    }

    pub fn is_hill_climbing_enabled(&self) -> bool {
        self.hill_climbing_enabled
    }

    pub fn late_acceptance_size(&self) -> usize {
        self.late_acceptance_size
    }

    /// The score the next candidate is compared against, once the phase started.
    pub fn late_score(&self) -> Option<Sc> {
        self.late_scores.late()
    }
}

impl<S, M> Acceptor<S, M> for LateAcceptanceAcceptor<S::Score>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        if self.late_acceptance_size == 0 {
            return Err(SolverError::config(
                "late_acceptance_size",
                "must be positive, got 0",
            ));
        }
        self.late_scores
            .reset(self.late_acceptance_size, phase_scope.starting_score());
        Ok(())
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        let score = move_scope.score();
        if self.hill_climbing_enabled && score >= move_scope.last_step_score() {
            return true;
        }
        self.late_scores.late().is_some_and(|late| score >= late)
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
