//! Change move selector.

use std::fmt::Debug;
use std::hash::Hash;

use rand::RngCore;
use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::heuristic::r#move::{ChangeMove, EitherMove};

use super::{MoveSelector, SelectionOrder};

/// Where a change move selector takes its candidate values from.
pub enum ValueRange<S, V> {
    /// The same values for every step.
    Static(Vec<V>),

    /// Values read from the working solution each step.
    FromSolution(fn(&S) -> Vec<V>),
}

impl<S, V: Clone> Clone for ValueRange<S, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(values) => Self::Static(values.clone()),
            Self::FromSolution(f) => Self::FromSolution(*f),
        }
    }
}

impl<S, V: Debug> Debug for ValueRange<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(values) => f.debug_tuple("Static").field(values).finish(),
            Self::FromSolution(_) => f.write_str("FromSolution"),
        }
    }
}

impl<S, V: Clone> ValueRange<S, V> {
    fn values(&self, solution: &S) -> Vec<V> {
        match self {
            Self::Static(values) => values.clone(),
            Self::FromSolution(f) => f(solution),
        }
    }
}

/// Yields a `ChangeMove` for every entity and every value in the range.
///
/// Entities come from `ScoreDirector::entity_count`; moves that would
/// assign the current value are left for the phase to skip.
pub struct ChangeMoveSelector<S, V> {
    value_range: ValueRange<S, V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    descriptor_index: usize,
    variable_name: &'static str,
    selection_order: SelectionOrder,
}

impl<S, V: Clone> Clone for ChangeMoveSelector<S, V> {
    fn clone(&self) -> Self {
        Self {
            value_range: self.value_range.clone(),
            getter: self.getter,
            setter: self.setter,
            descriptor_index: self.descriptor_index,
            variable_name: self.variable_name,
            selection_order: self.selection_order,
        }
    }
}

impl<S, V: Debug> Debug for ChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("value_range", &self.value_range)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("selection_order", &self.selection_order)
            .finish()
    }
}

impl<S: PlanningSolution, V: Clone> ChangeMoveSelector<S, V> {
    /// Creates a selector over a fixed list of values.
    ///
    /// # Arguments
    /// * `getter` - Reads the current value from the solution
    /// * `setter` - Writes a value into the solution
    /// * `descriptor_index` - Index of the entity descriptor
    /// * `variable_name` - Name of the variable
    /// * `values` - Candidate values for every entity
    pub fn simple(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
        values: Vec<V>,
    ) -> Self {
        Self::new(
            getter,
            setter,
            descriptor_index,
            variable_name,
            ValueRange::Static(values),
        )
    }

    /// Creates a selector with an explicit value range.
    pub fn new(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        descriptor_index: usize,
        variable_name: &'static str,
        value_range: ValueRange<S, V>,
    ) -> Self {
        Self {
            value_range,
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
    ) -> Vec<ChangeMove<S, V>> {
        let values = self.value_range.values(score_director.working_solution());
        let entity_count = score_director.entity_count();

        let mut moves = Vec::with_capacity(entity_count * values.len());
        for entity_index in 0..entity_count {
            for value in &values {
                moves.push(ChangeMove::new(
                    entity_index,
                    Some(value.clone()),
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

    fn count<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let values = self.value_range.values(score_director.working_solution());
        score_director.entity_count() * values.len()
    }
}

impl<S, V> MoveSelector<S, ChangeMove<S, V>> for ChangeMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn select_moves<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<ChangeMove<S, V>> {
        self.generate(score_director, rng)
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.count(score_director)
    }
}

impl<S, V> MoveSelector<S, EitherMove<S, V>> for ChangeMoveSelector<S, V>
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
            .map(EitherMove::Change)
            .collect()
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.count(score_director)
    }
}
