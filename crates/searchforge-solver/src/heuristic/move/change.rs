//! ChangeMove - assigns a value to a planning variable.
//!
//! Stores typed function pointers that operate directly on the solution,
//! so no value ever goes through `dyn Any`.

use std::fmt::Debug;
use std::hash::Hash;

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;
use smallvec::smallvec;

use super::traits::{entity_key, hash_key, Move, TabuKeys};

/// A move that assigns a value to an entity's variable.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The variable value type
pub struct ChangeMove<S, V> {
    entity_index: usize,
    to_value: Option<V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V: Clone> Clone for ChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            to_value: self.to_value.clone(),
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V: Debug> Debug for ChangeMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMove")
            .field("entity_index", &self.entity_index)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V> ChangeMove<S, V> {
    /// Creates a new change move with typed function pointers.
    ///
    /// # Arguments
    /// * `entity_index` - Index of the entity in its collection
    /// * `to_value` - The value to assign (None to unassign)
    /// * `getter` - Reads the current value from the solution
    /// * `setter` - Writes a value into the solution
    /// * `variable_name` - Name of the variable, passed to director notifications
    /// * `descriptor_index` - Index of the entity descriptor
    pub fn new(
        entity_index: usize,
        to_value: Option<V>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_index,
            to_value,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    pub fn variable_name(&self) -> &'static str {
        self.variable_name
    }
}

impl<S, V> Move<S> for ChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Hash + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let current = (self.getter)(score_director.working_solution(), self.entity_index);
        current != self.to_value
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        score_director.before_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
        (self.setter)(
            score_director.working_solution_mut(),
            self.entity_index,
            self.to_value.clone(),
        );
        score_director.after_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let old_value = (self.getter)(score_director.working_solution(), self.entity_index);
        Self {
            to_value: old_value,
            ..self.clone()
        }
    }

    fn tabu_entities(&self) -> TabuKeys {
        smallvec![entity_key(self.descriptor_index, self.entity_index)]
    }

    fn tabu_values(&self, _solution: &S) -> TabuKeys {
        match &self.to_value {
            Some(value) => smallvec![hash_key(value)],
            None => TabuKeys::new(),
        }
    }

    fn tabu_key(&self) -> u64 {
        hash_key(&(
            "change",
            self.descriptor_index,
            self.entity_index,
            &self.to_value,
        ))
    }
}
