//! Moves that modify planning solutions.
//!
//! Moves are fully typed values; the phase applies them tentatively
//! through an [`UndoGuard`] and keeps at most one per step.
//!
//! - `ChangeMove<S, V>` - assigns a value to a variable
//! - `SwapMove<S, V>` - swaps values between two entities
//! - `EitherMove<S, V>` - either of the above

mod change;
mod either;
mod guard;
mod swap;
mod traits;

#[cfg(test)]
mod tests;

pub use change::ChangeMove;
pub use either::EitherMove;
pub use guard::UndoGuard;
pub use swap::SwapMove;
pub use traits::{entity_key, hash_key, Move, TabuKeys};
