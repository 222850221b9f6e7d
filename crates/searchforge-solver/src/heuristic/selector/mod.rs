//! Move selectors.
//!
//! A selector produces the candidate moves of one step. Selectors are
//! stateless between steps; any randomness comes from the solver's random
//! source so a seeded run enumerates the same candidates in the same order.

mod change;
mod selection_order;
mod swap;
mod union;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use rand::RngCore;
use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

pub use change::{ChangeMoveSelector, ValueRange};
pub use selection_order::SelectionOrder;
pub use swap::SwapMoveSelector;
pub use union::UnionMoveSelector;

/// Produces the candidate moves of one step.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait MoveSelector<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Returns this step's candidates, in evaluation order.
    ///
    /// Moves that are not doable may be included; the phase skips them.
    fn select_moves<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
        rng: &mut dyn RngCore,
    ) -> Vec<M>;

    /// Returns the number of candidates a step would see.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;
}
