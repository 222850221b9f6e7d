//! Step-level scope.

use searchforge_core::domain::PlanningSolution;

/// Scope for a single step within a phase.
pub struct StepScope<S: PlanningSolution, M> {
    step_index: u64,
    time_gradient: f64,
    chosen_move: Option<M>,
    undo_move: Option<M>,
    score: Option<S::Score>,
    selected_move_count: u64,
    accepted_move_count: u64,
    best_score_improved: bool,
}

impl<S: PlanningSolution, M> StepScope<S, M> {
    /// Creates a new step scope.
    ///
    /// `time_gradient` is the elapsed fraction of the time budget, in `[0, 1]`.
    pub fn new(step_index: u64, time_gradient: f64) -> Self {
        Self {
            step_index,
            time_gradient,
            chosen_move: None,
            undo_move: None,
            score: None,
            selected_move_count: 0,
            accepted_move_count: 0,
            best_score_improved: false,
        }
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn time_gradient(&self) -> f64 {
        self.time_gradient
    }

    pub fn chosen_move(&self) -> Option<&M> {
        self.chosen_move.as_ref()
    }

    /// The move that reverts the chosen one, once it has been committed.
    pub fn undo_move(&self) -> Option<&M> {
        self.undo_move.as_ref()
    }

    pub fn set_undo_move(&mut self, undo_move: M) {
        self.undo_move = Some(undo_move);
    }

    /// Score the chosen move leads to.
    pub fn score(&self) -> Option<S::Score> {
        self.score
    }

    pub fn set_chosen_move(&mut self, chosen_move: M, score: S::Score) {
        self.chosen_move = Some(chosen_move);
        self.score = Some(score);
    }

    /// Moves evaluated this step.
    pub fn selected_move_count(&self) -> u64 {
        self.selected_move_count
    }

    /// Moves accepted by the acceptor this step.
    pub fn accepted_move_count(&self) -> u64 {
        self.accepted_move_count
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.selected_move_count += 1;
        if accepted {
            self.accepted_move_count += 1;
        }
    }

    pub fn best_score_improved(&self) -> bool {
        self.best_score_improved
    }

    pub fn set_best_score_improved(&mut self, improved: bool) {
        self.best_score_improved = improved;
    }
}
