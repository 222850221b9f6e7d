//! Union move selector combinator.

use std::fmt::Debug;

use rand::RngCore;
use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

use super::{MoveSelector, SelectionOrder};

/// Combines the moves of two selectors into one stream.
///
/// Yields all moves of the first selector, then all moves of the second,
/// unless a shuffled order is set, in which case the combined list is
/// shuffled as a whole.
///
/// # Example
///
/// ```
/// use searchforge_solver::heuristic::r#move::EitherMove;
/// use searchforge_solver::heuristic::selector::{
///     ChangeMoveSelector, MoveSelector, SwapMoveSelector, UnionMoveSelector,
/// };
/// use searchforge_scoring::SimpleScoreDirector;
/// use searchforge_core::{PlanningSolution, SimpleScore};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// #[derive(Clone, Debug)]
/// struct Sol { values: Vec<Option<i32>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Sol {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
///     fn entity_count(&self) -> usize { self.values.len() }
/// }
///
/// fn get_v(s: &Sol, i: usize) -> Option<i32> { s.values.get(i).copied().flatten() }
/// fn set_v(s: &mut Sol, i: usize, v: Option<i32>) { if let Some(x) = s.values.get_mut(i) { *x = v; } }
///
/// let selector = UnionMoveSelector::new(
///     ChangeMoveSelector::simple(get_v, set_v, 0, "value", vec![1, 2]),
///     SwapMoveSelector::simple(get_v, set_v, 0, "value"),
/// );
/// let director = SimpleScoreDirector::new(
///     Sol { values: vec![Some(1), Some(2), Some(3)], score: None },
///     |_: &Sol| SimpleScore::of(0),
/// );
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
/// let moves: Vec<EitherMove<Sol, i32>> = selector.select_moves(&director, &mut rng);
/// assert_eq!(moves.len(), 6 + 3);
/// ```
#[derive(Clone)]
pub struct UnionMoveSelector<A, B> {
    first: A,
    second: B,
    selection_order: SelectionOrder,
}

impl<A, B> UnionMoveSelector<A, B> {
    /// Creates a new union selector combining two selectors.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            selection_order: SelectionOrder::Original,
        }
    }

    pub fn with_selection_order(mut self, selection_order: SelectionOrder) -> Self {
        self.selection_order = selection_order;
        self
    }
}

impl<A: Debug, B: Debug> Debug for UnionMoveSelector<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("selection_order", &self.selection_order)
            .finish()
    }
}

impl<S, M, A, B> MoveSelector<S, M> for UnionMoveSelector<A, B>
where
    S: PlanningSolution,
    M: Move<S>,
    A: MoveSelector<S, M>,
    B: MoveSelector<S, M>,
{
    fn select_moves<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<M> {
        let mut moves = self.first.select_moves(score_director, rng);
        moves.extend(self.second.select_moves(score_director, rng));
        self.selection_order.apply(&mut moves, rng);
        moves
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.first.size(score_director) + self.second.size(score_director)
    }
}
