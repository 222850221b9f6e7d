//! Scoped undo for tentative moves.

use std::marker::PhantomData;

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::Move;

/// Applies a move and reverts it when dropped.
///
/// The undo move is created before the move runs, so the guard restores the
/// prior state on every exit path: normal return, early `?` return or a
/// panic unwinding through the evaluation. Call [`commit`](UndoGuard::commit)
/// to keep the change.
///
/// ```
/// use searchforge_solver::heuristic::r#move::{ChangeMove, UndoGuard};
/// use searchforge_scoring::{ScoreDirector, SimpleScoreDirector};
/// use searchforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct Sol { values: Vec<Option<i64>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Sol {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// fn get_v(s: &Sol, idx: usize) -> Option<i64> { s.values.get(idx).copied().flatten() }
/// fn set_v(s: &mut Sol, idx: usize, v: Option<i64>) { if let Some(x) = s.values.get_mut(idx) { *x = v; } }
///
/// let solution = Sol { values: vec![Some(1)], score: None };
/// let mut director = SimpleScoreDirector::new(solution, |s: &Sol| {
///     SimpleScore::of(s.values.iter().flatten().sum())
/// });
///
/// let mv = ChangeMove::new(0, Some(5), get_v, set_v, "value", 0);
/// {
///     let mut guard = UndoGuard::apply(&mut director, &mv);
///     assert_eq!(guard.calculate_score(), SimpleScore::of(5));
/// }
/// assert_eq!(director.calculate_score(), SimpleScore::of(1));
/// ```
pub struct UndoGuard<'a, S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    score_director: &'a mut D,
    undo: Option<M>,
    _phantom: PhantomData<fn() -> S>,
}

impl<'a, S, D, M> UndoGuard<'a, S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Records the undo of `mv`, then executes `mv`.
    pub fn apply(score_director: &'a mut D, mv: &M) -> Self {
        let undo = mv.create_undo_move(&*score_director);
        mv.do_move(score_director);
        Self {
            score_director,
            undo: Some(undo),
            _phantom: PhantomData,
        }
    }

    pub fn score_director(&self) -> &D {
        &*self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut *self.score_director
    }

    /// Scores the working solution with the move applied.
    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    /// Keeps the move applied.
    pub fn commit(mut self) {
        self.undo = None;
    }
}

impl<S, D, M> Drop for UndoGuard<'_, S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            undo.do_move(&mut *self.score_director);
        }
    }
}
