//! Move trait definition.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;
use smallvec::SmallVec;

/// Hashed identities a move exposes to tabu acceptors.
pub type TabuKeys = SmallVec<[u64; 2]>;

/// A reversible change to one or more planning variables.
///
/// Moves are fully typed: selectors yield concrete move values and the
/// phase drives them through generic score directors, so the same move can
/// run on the solver's director and on a move thread's private fork.
///
/// # Undo protocol
///
/// [`create_undo_move`](Move::create_undo_move) is called on the state
/// *before* [`do_move`](Move::do_move) and must return a move that restores
/// that state exactly. [`UndoGuard`](super::UndoGuard) wraps the pair so the
/// undo runs on every exit path.
///
/// # Type Parameters
/// * `S` - The planning solution type
pub trait Move<S: PlanningSolution>: Send + Sync + Debug + Clone + 'static {
    /// Returns true if this move changes anything in the current state.
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Executes this move, notifying the director around every variable change.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D);

    /// Returns the move that reverts this one, given the state before it runs.
    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self;

    /// Identities of the entities this move touches.
    fn tabu_entities(&self) -> TabuKeys;

    /// Identities of the planning values this move assigns.
    ///
    /// Read from `solution`, which may be the state before or after the move.
    fn tabu_values(&self, solution: &S) -> TabuKeys;

    /// Stable identity of the move itself, equal for equal moves.
    fn tabu_key(&self) -> u64;
}

/// Packs a descriptor and entity index into one tabu identity.
pub fn entity_key(descriptor_index: usize, entity_index: usize) -> u64 {
    ((descriptor_index as u64) << 32) ^ entity_index as u64
}

/// Hashes any value into a tabu identity.
pub fn hash_key<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
