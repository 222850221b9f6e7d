//! Move-level scope.

use rand::RngCore;
use searchforge_core::domain::PlanningSolution;

use super::{PhaseScope, StepScope};

/// One candidate evaluation, as seen by acceptors.
///
/// Lives for a single apply, score, decide and undo cycle. The solution it
/// exposes is the working solution after the undo, i.e. the state the
/// candidate was applied to.
pub struct MoveScope<'r, S: PlanningSolution, M> {
    step_index: u64,
    move_index: usize,
    candidate: &'r M,
    score: S::Score,
    last_step_score: S::Score,
    best_score: S::Score,
    time_gradient: f64,
    solution: &'r S,
    solution_key: Option<u64>,
    rng: &'r mut dyn RngCore,
}

impl<'r, S: PlanningSolution, M> MoveScope<'r, S, M> {
    pub fn new(
        phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        move_index: usize,
        candidate: &'r M,
        score: S::Score,
        solution: &'r S,
        rng: &'r mut dyn RngCore,
    ) -> Self {
        Self {
            step_index: step_scope.step_index(),
            move_index,
            candidate,
            score,
            last_step_score: phase_scope.last_step_score(),
            best_score: phase_scope.best_score(),
            time_gradient: step_scope.time_gradient(),
            solution,
            solution_key: None,
            rng,
        }
    }

    /// Attaches the identity of the solution the candidate leads to.
    pub fn with_solution_key(mut self, solution_key: Option<u64>) -> Self {
        self.solution_key = solution_key;
        self
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn move_index(&self) -> usize {
        self.move_index
    }

    pub fn candidate(&self) -> &M {
        self.candidate
    }

    /// Tentative score with the candidate applied.
    pub fn score(&self) -> S::Score {
        self.score
    }

    pub fn last_step_score(&self) -> S::Score {
        self.last_step_score
    }

    pub fn best_score(&self) -> S::Score {
        self.best_score
    }

    pub fn time_gradient(&self) -> f64 {
        self.time_gradient
    }

    pub fn solution(&self) -> &S {
        self.solution
    }

    /// Identity of the solution after the candidate, if computed.
    pub fn solution_key(&self) -> Option<u64> {
        self.solution_key
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}
