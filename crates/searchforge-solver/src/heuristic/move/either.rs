//! EitherMove - a monomorphized union of ChangeMove and SwapMove.
//!
//! Lets one local search phase mix both move kinds without trait objects.

use std::fmt::Debug;
use std::hash::Hash;

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::{ChangeMove, Move, SwapMove, TabuKeys};

/// A monomorphized union of `ChangeMove` and `SwapMove`.
pub enum EitherMove<S, V> {
    Change(ChangeMove<S, V>),
    Swap(SwapMove<S, V>),
}

impl<S, V: Clone> Clone for EitherMove<S, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Change(m) => Self::Change(m.clone()),
            Self::Swap(m) => Self::Swap(*m),
        }
    }
}

impl<S, V: Debug> Debug for EitherMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Change(m) => m.fmt(f),
            Self::Swap(m) => m.fmt(f),
        }
    }
}

impl<S, V> From<ChangeMove<S, V>> for EitherMove<S, V> {
    fn from(m: ChangeMove<S, V>) -> Self {
        Self::Change(m)
    }
}

impl<S, V> From<SwapMove<S, V>> for EitherMove<S, V> {
    fn from(m: SwapMove<S, V>) -> Self {
        Self::Swap(m)
    }
}

impl<S, V> Move<S> for EitherMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        match self {
            Self::Change(m) => m.is_doable(score_director),
            Self::Swap(m) => m.is_doable(score_director),
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        match self {
            Self::Change(m) => m.do_move(score_director),
            Self::Swap(m) => m.do_move(score_director),
        }
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        match self {
            Self::Change(m) => Self::Change(m.create_undo_move(score_director)),
            Self::Swap(m) => Self::Swap(m.create_undo_move(score_director)),
        }
    }

    fn tabu_entities(&self) -> TabuKeys {
        match self {
            Self::Change(m) => m.tabu_entities(),
            Self::Swap(m) => m.tabu_entities(),
        }
    }

    fn tabu_values(&self, solution: &S) -> TabuKeys {
        match self {
            Self::Change(m) => m.tabu_values(solution),
            Self::Swap(m) => m.tabu_values(solution),
        }
    }

    fn tabu_key(&self) -> u64 {
        match self {
            Self::Change(m) => m.tabu_key(),
            Self::Swap(m) => m.tabu_key(),
        }
    }
}
