//! Heuristic components for solving
//!
//! This module contains:
//! - Moves: reversible operations on planning variables
//! - Selectors: per-step candidate move generation

pub mod r#move;
pub mod selector;

pub use r#move::{ChangeMove, EitherMove, Move, SwapMove, UndoGuard};
pub use selector::{
    ChangeMoveSelector, MoveSelector, SelectionOrder, SwapMoveSelector, UnionMoveSelector,
    ValueRange,
};
