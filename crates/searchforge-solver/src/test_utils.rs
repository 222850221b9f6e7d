//! Test utilities for searchforge-solver
//!
//! Provides common test fixtures used across the crate's test modules.
//! Re-exports the N-Queens fixtures from searchforge-test and adds
//! solver-specific helpers: queen moves, selectors and a scripted random
//! source.

use rand::RngCore;
use searchforge_core::score::SimpleScore;

use crate::heuristic::r#move::{ChangeMove, EitherMove, SwapMove};
use crate::heuristic::selector::{
    ChangeMoveSelector, SwapMoveSelector, UnionMoveSelector, ValueRange,
};
use crate::scope::PhaseScope;

pub use searchforge_test::nqueens::{
    calculate_conflicts, create_nqueens_director, get_queen_row, nqueens_director_factory,
    queen_rows, set_queen_row, NQueensCalculator, NQueensDirector, NQueensSolution,
};

/// Change move on a queen's row.
pub type QueenMove = ChangeMove<NQueensSolution, usize>;

/// Change or swap move on queen rows.
pub type QueenEitherMove = EitherMove<NQueensSolution, usize>;

/// Moves the queen in column `entity` to `row`.
pub fn queen_move(entity: usize, row: usize) -> QueenMove {
    ChangeMove::new(entity, Some(row), get_queen_row, set_queen_row, "row", 0)
}

/// Swaps the rows of two queens.
pub fn queen_swap(left: usize, right: usize) -> SwapMove<NQueensSolution, usize> {
    SwapMove::new(left, right, get_queen_row, set_queen_row, "row", 0)
}

/// Every row change for every queen, in original order.
pub fn queen_change_selector() -> ChangeMoveSelector<NQueensSolution, usize> {
    ChangeMoveSelector::new(
        get_queen_row,
        set_queen_row,
        0,
        "row",
        ValueRange::FromSolution(queen_rows),
    )
}

/// Row changes followed by row swaps.
pub fn queen_union_selector() -> UnionMoveSelector<
    ChangeMoveSelector<NQueensSolution, usize>,
    SwapMoveSelector<NQueensSolution, usize>,
> {
    UnionMoveSelector::new(
        queen_change_selector(),
        SwapMoveSelector::simple(get_queen_row, set_queen_row, 0, "row"),
    )
}

/// Phase scope over a 4-queens board.
pub fn queen_phase_scope(
    starting_score: SimpleScore,
    best_score: SimpleScore,
) -> PhaseScope<NQueensSolution, QueenMove> {
    PhaseScope::new(0, starting_score, best_score, 4, 4)
}

/// Random source that replays a fixed list of `f64` draws.
///
/// Each call to `next_u64` yields the bits `rand` turns back into the next
/// scripted value when sampling an `f64` in `[0, 1)`. The script repeats
/// when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedRng {
    pub fn new(draws: &[f64]) -> Self {
        assert!(!draws.is_empty(), "a scripted rng needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "scripted draws must lie in [0, 1)"
        );
        Self {
            draws: draws.to_vec(),
            position: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draw_count(&self) -> usize {
        self.position
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        ((draw * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use searchforge_scoring::ScoreDirector;

    use super::*;
    use crate::heuristic::r#move::Move;

    #[test]
    fn test_scripted_rng_replays_draws() {
        let mut rng = ScriptedRng::new(&[0.5, 0.25, 0.9]);
        assert_eq!(rng.random::<f64>(), 0.5);
        assert_eq!(rng.random::<f64>(), 0.25);
        let third: f64 = rng.random();
        assert!((third - 0.9).abs() < 1e-12);
        assert_eq!(rng.random::<f64>(), 0.5);
        assert_eq!(rng.draw_count(), 4);
    }

    #[test]
    fn test_queen_move_targets_row() {
        let mv = queen_move(2, 3);
        assert_eq!(mv.entity_index(), 2);
        assert_eq!(mv.to_value(), Some(&3));
    }

    #[test]
    fn test_queen_swap_exchanges_rows() {
        let mut director = create_nqueens_director(&[0, 2, 1]);
        let mv = queen_swap(0, 1);
        assert_eq!(mv.left_entity_index(), 0);
        assert_eq!(mv.right_entity_index(), 1);

        mv.do_move(&mut director);

        assert_eq!(
            director.working_solution().rows(),
            vec![Some(2), Some(0), Some(1)]
        );
    }
}
