//! Selection order for move selectors.

use rand::seq::SliceRandom;
use rand::RngCore;

/// The order in which a selector yields its candidates each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionOrder {
    /// Elements in the order they appear in the underlying collection.
    #[default]
    Original,

    /// A fresh permutation every step, drawn from the solver's random source.
    Shuffled,
}

impl SelectionOrder {
    /// Returns `true` if this order draws from the random source.
    pub fn is_random(&self) -> bool {
        matches!(self, SelectionOrder::Shuffled)
    }

    /// Converts from a boolean random selection flag.
    pub fn from_random_selection(random: bool) -> Self {
        if random {
            SelectionOrder::Shuffled
        } else {
            SelectionOrder::Original
        }
    }

    /// Reorders `items` in place according to this order.
    pub fn apply<T>(&self, items: &mut [T], rng: &mut dyn RngCore) {
        if self.is_random() {
            items.shuffle(rng);
        }
    }
}
