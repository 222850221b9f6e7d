//! Phase-level scope.

use std::time::{Duration, Instant};

use searchforge_core::domain::PlanningSolution;

use super::StepScope;

/// State of one local search phase, shared read-only with acceptors.
///
/// The best solution itself lives in the solver scope; the phase scope
/// tracks the best score, when it was reached and the chain of completed
/// steps.
pub struct PhaseScope<S: PlanningSolution, M> {
    phase_index: usize,
    start_time: Instant,
    starting_score: S::Score,
    best_score: S::Score,
    best_solution_step_index: Option<u64>,
    best_score_time: Instant,
    step_count: u64,
    last_completed_step: Option<StepScope<S, M>>,
    entity_count: usize,
    value_count: usize,
    moves_evaluated: u64,
    moves_accepted: u64,
}

impl<S: PlanningSolution, M> PhaseScope<S, M> {
    /// Creates a new phase scope.
    ///
    /// `starting_score` is the working score when the phase starts,
    /// `best_score` the best score recalled so far.
    pub fn new(
        phase_index: usize,
        starting_score: S::Score,
        best_score: S::Score,
        entity_count: usize,
        value_count: usize,
    ) -> Self {
        let now = Instant::now();
        Self {
            phase_index,
            start_time: now,
            starting_score,
            best_score,
            best_solution_step_index: None,
            best_score_time: now,
            step_count: 0,
            last_completed_step: None,
            entity_count,
            value_count,
            moves_evaluated: 0,
            moves_accepted: 0,
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn starting_score(&self) -> S::Score {
        self.starting_score
    }

    pub fn best_score(&self) -> S::Score {
        self.best_score
    }

    /// Step index of the last best score update; `None` before any step improved it.
    pub fn best_solution_step_index(&self) -> Option<u64> {
        self.best_solution_step_index
    }

    pub fn set_best_score(&mut self, score: S::Score, step_index: Option<u64>) {
        self.best_score = score;
        self.best_solution_step_index = step_index;
        self.best_score_time = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Time since the phase's best score last changed.
    pub fn time_since_best(&self) -> Duration {
        self.best_score_time.elapsed()
    }

    /// Completed steps in this phase.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Steps completed since the best score last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        match self.best_solution_step_index {
            Some(index) => self.step_count.saturating_sub(index + 1),
            None => self.step_count,
        }
    }

    /// Index the next step will get.
    pub fn next_step_index(&self) -> u64 {
        self.step_count
    }

    pub fn last_completed_step(&self) -> Option<&StepScope<S, M>> {
        self.last_completed_step.as_ref()
    }

    /// Score of the last completed step, or the starting score before the first.
    pub fn last_step_score(&self) -> S::Score {
        self.last_completed_step
            .as_ref()
            .and_then(|step| step.score())
            .unwrap_or(self.starting_score)
    }

    /// Retires `step` as the last completed step.
    pub fn complete_step(&mut self, step: StepScope<S, M>) {
        self.step_count += 1;
        self.last_completed_step = Some(step);
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn moves_evaluated(&self) -> u64 {
        self.moves_evaluated
    }

    pub fn moves_accepted(&self) -> u64 {
        self.moves_accepted
    }
}
