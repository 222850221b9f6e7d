//! Swap move selector.

use std::fmt::Debug;
use std::hash::Hash;

use rand::RngCore;
use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::heuristic::r#move::{EitherMove, SwapMove};

use super::{MoveSelector, SelectionOrder};

/// Yields a `SwapMove` for every unordered pair of entities.
pub struct SwapMoveSelector<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
    selection_order: SelectionOrder,
}

impl<S, V> Clone for SwapMoveSelector<S, V> {
    fn clone(&self) -> Self {
        Self {
            getter: self.getter,
            setter: self.setter,
            descriptor_index: self.descriptor_index,
            variable_name: self.variable_name,
            selection_order: self.selection_order,
        }
    }
}

impl<S, V> Debug for SwapMoveSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapMoveSelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("selection_order", &self.selection_order)
            .finish()
    }
}

impl<S: PlanningSolution, V> SwapMoveSelector<S, V> {
    /// Creates a selector swapping one variable within a single entity type.
    pub fn simple(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            getter,
            setter,
            descriptor_index,
            variable_name,
            selection_order: SelectionOrder::Original,
        }
    }

    pub fn with_selection_order(mut self, selection_order: SelectionOrder) -> Self {
        self.selection_order = selection_order;
        self
    }

    fn generate<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<SwapMove<S, V>> {
        let entity_count = score_director.entity_count();

        // Triangular pairing: (i, j) with i < j
        let mut moves = Vec::with_capacity(pair_count(entity_count));
        for left in 0..entity_count {
            for right in (left + 1)..entity_count {
                moves.push(SwapMove::new(
                    left,
                    right,
                    self.getter,
                    self.setter,
                    self.variable_name,
                    self.descriptor_index,
                ));
            }
        }
        self.selection_order.apply(&mut moves, rng);
        moves
    }
}

fn pair_count(entity_count: usize) -> usize {
    entity_count * entity_count.saturating_sub(1) / 2
}

impl<S, V> MoveSelector<S, SwapMove<S, V>> for SwapMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn select_moves<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<SwapMove<S, V>> {
        self.generate(score_director, rng)
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        pair_count(score_director.entity_count())
    }
}

impl<S, V> MoveSelector<S, EitherMove<S, V>> for SwapMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn select_moves<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<EitherMove<S, V>> {
        self.generate(score_director, rng)
            .into_iter()
            .map(EitherMove::Swap)
            .collect()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        pair_count(score_director.entity_count())
    }
}
