//! SwapMove - exchanges values between two entities.
//!
//! Swapping keeps the multiset of assigned values intact, which makes it
//! the natural move for permutation-shaped problems.

use std::fmt::Debug;
use std::hash::Hash;

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;
use smallvec::{smallvec, SmallVec};

use super::traits::{entity_key, hash_key, Move, TabuKeys};

/// A move that swaps the values of one variable between two entities.
///
/// A swap is its own undo.
///
/// # Example
/// ```
/// use searchforge_solver::heuristic::r#move::SwapMove;
/// use searchforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct Sol { values: Vec<Option<i32>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Sol {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// fn get_v(s: &Sol, idx: usize) -> Option<i32> { s.values.get(idx).copied().flatten() }
/// fn set_v(s: &mut Sol, idx: usize, v: Option<i32>) { if let Some(x) = s.values.get_mut(idx) { *x = v; } }
///
/// let swap = SwapMove::<Sol, i32>::new(0, 1, get_v, set_v, "value", 0);
/// assert_eq!(swap.left_entity_index(), 0);
/// ```
pub struct SwapMove<S, V> {
    left_entity_index: usize,
    right_entity_index: usize,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for SwapMove<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for SwapMove<S, V> {}

impl<S, V> Debug for SwapMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapMove")
            .field("left_entity_index", &self.left_entity_index)
            .field("right_entity_index", &self.right_entity_index)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> SwapMove<S, V> {
    /// Creates a new swap move with typed function pointers.
    pub fn new(
        left_entity_index: usize,
        right_entity_index: usize,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            left_entity_index,
            right_entity_index,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn left_entity_index(&self) -> usize {
        self.left_entity_index
    }

    pub fn right_entity_index(&self) -> usize {
        self.right_entity_index
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    pub fn variable_name(&self) -> &'static str {
        self.variable_name
    }
}

impl<S, V> Move<S> for SwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.left_entity_index == self.right_entity_index {
            return false;
        }
        let solution = score_director.working_solution();
        (self.getter)(solution, self.left_entity_index)
            != (self.getter)(solution, self.right_entity_index)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let left_value = (self.getter)(score_director.working_solution(), self.left_entity_index);
        let right_value = (self.getter)(score_director.working_solution(), self.right_entity_index);

        for entity_index in [self.left_entity_index, self.right_entity_index] {
            score_director.before_variable_changed(
                self.descriptor_index,
                entity_index,
                self.variable_name,
            );
        }

        (self.setter)(
            score_director.working_solution_mut(),
            self.left_entity_index,
            right_value,
        );
        (self.setter)(
            score_director.working_solution_mut(),
            self.right_entity_index,
            left_value,
        );

        for entity_index in [self.left_entity_index, self.right_entity_index] {
            score_director.after_variable_changed(
                self.descriptor_index,
                entity_index,
                self.variable_name,
            );
        }
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self {
        *self
    }

    fn tabu_entities(&self) -> TabuKeys {
        smallvec![
            entity_key(self.descriptor_index, self.left_entity_index),
            entity_key(self.descriptor_index, self.right_entity_index),
        ]
    }

    fn tabu_values(&self, solution: &S) -> TabuKeys {
        let mut keys = SmallVec::new();
        for entity_index in [self.left_entity_index, self.right_entity_index] {
            if let Some(value) = (self.getter)(solution, entity_index) {
                keys.push(hash_key(&value));
            }
        }
        keys
    }

    fn tabu_key(&self) -> u64 {
        // A swap of (a, b) is the same move as a swap of (b, a)
        let low = self.left_entity_index.min(self.right_entity_index);
        let high = self.left_entity_index.max(self.right_entity_index);
        hash_key(&("swap", self.descriptor_index, low, high))
    }
}
