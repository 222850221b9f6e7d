//! Tests for moves and the undo guard.

use std::panic::{catch_unwind, AssertUnwindSafe};

use searchforge_core::score::SimpleScore;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::ScoreDirector;
use searchforge_test::nqueens::{
    create_nqueens_director, get_queen_row, set_queen_row, NQueensDirector, NQueensSolution,
};

use super::*;

type QueenChange = ChangeMove<NQueensSolution, usize>;
type QueenSwap = SwapMove<NQueensSolution, usize>;

fn change(entity: usize, row: usize) -> QueenChange {
    ChangeMove::new(entity, Some(row), get_queen_row, set_queen_row, "row", 0)
}

fn swap(left: usize, right: usize) -> QueenSwap {
    SwapMove::new(left, right, get_queen_row, set_queen_row, "row", 0)
}

#[test]
fn test_change_move_is_doable() {
    let director = create_nqueens_director(&[0, 1, 2]);

    assert!(change(0, 2).is_doable(&director));
    assert!(!change(0, 0).is_doable(&director));
}

#[test]
fn test_change_move_undo_restores_value() {
    let mut director = create_nqueens_director(&[0, 1, 2]);
    let mv = change(1, 0);

    let undo = mv.create_undo_move(&director);
    mv.do_move(&mut director);
    assert_eq!(director.working_solution().rows(), vec![Some(0), Some(0), Some(2)]);

    undo.do_move(&mut director);
    assert_eq!(director.working_solution().rows(), vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_swap_move_exchanges_values() {
    let mut director = create_nqueens_director(&[0, 1, 3]);
    let mv = swap(0, 2);

    assert!(mv.is_doable(&director));
    mv.do_move(&mut director);
    assert_eq!(director.working_solution().rows(), vec![Some(3), Some(1), Some(0)]);

    mv.create_undo_move(&director).do_move(&mut director);
    assert_eq!(director.working_solution().rows(), vec![Some(0), Some(1), Some(3)]);
}

#[test]
fn test_swap_move_not_doable() {
    let director = create_nqueens_director(&[2, 2, 0]);

    assert!(!swap(1, 1).is_doable(&director));
    assert!(!swap(0, 1).is_doable(&director));
    assert!(swap(0, 2).is_doable(&director));
}

#[test]
fn test_tabu_identities() {
    let solution = NQueensSolution::with_rows(&[0, 1, 3]);

    assert_eq!(change(1, 3).tabu_entities().as_slice(), &[entity_key(0, 1)]);
    assert_eq!(change(1, 3).tabu_values(&solution).as_slice(), &[hash_key(&3usize)]);
    assert_eq!(change(1, 3).tabu_key(), change(1, 3).tabu_key());
    assert_ne!(change(1, 3).tabu_key(), change(1, 2).tabu_key());

    assert_eq!(swap(0, 2).tabu_key(), swap(2, 0).tabu_key());
    assert_eq!(
        swap(0, 2).tabu_values(&solution).as_slice(),
        &[hash_key(&0usize), hash_key(&3usize)]
    );
    assert_eq!(swap(0, 2).tabu_entities().len(), 2);
}

#[test]
fn test_either_move_delegates() {
    let mut director = create_nqueens_director(&[0, 1]);
    let moves: Vec<EitherMove<NQueensSolution, usize>> = vec![change(0, 1).into(), swap(0, 1).into()];

    assert!(moves[1].is_doable(&director));
    moves[0].do_move(&mut director);
    assert_eq!(director.working_solution().rows(), vec![Some(1), Some(1)]);
    assert!(!moves[1].is_doable(&director));
    assert_eq!(moves[0].tabu_key(), change(0, 1).tabu_key());
}

#[test]
fn test_guard_reverts_on_drop() {
    let mut director = create_nqueens_director(&[0, 0, 0, 0]);
    let before = director.calculate_score();

    {
        let mut guard = UndoGuard::apply(&mut director, &change(1, 2));
        assert_eq!(guard.calculate_score(), SimpleScore::of(-4));
        assert_eq!(guard.score_director().working_solution().queens[1].row, Some(2));
    }

    assert_eq!(director.calculate_score(), before);
    assert_eq!(director.working_solution().rows(), vec![Some(0); 4]);
}

#[test]
fn test_guard_commit_keeps_move() {
    let mut director = create_nqueens_director(&[0, 0]);

    let guard = UndoGuard::apply(&mut director, &change(0, 1));
    guard.commit();

    assert_eq!(director.working_solution().rows(), vec![Some(1), Some(0)]);
}

#[test]
fn test_guard_reverts_on_panic() {
    let mut director = create_nqueens_director(&[0, 1, 2]);

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut guard = UndoGuard::apply(&mut director, &swap(0, 2));
        guard.calculate_score();
        panic!("evaluation failed");
    }));

    assert!(result.is_err());
    assert_eq!(director.working_solution().rows(), vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_guard_reverts_on_early_return() {
    fn evaluate(director: &mut NQueensDirector) -> Result<SimpleScore> {
        let mut guard = UndoGuard::apply(director, &change(2, 1));
        let score = guard.calculate_score();
        if score < SimpleScore::of(0) {
            return Err(SolverError::InvalidState("worse".to_string()));
        }
        Ok(score)
    }

    let mut director = create_nqueens_director(&[1, 3, 0, 2]);
    assert!(evaluate(&mut director).is_err());
    assert_eq!(
        director.working_solution().rows(),
        vec![Some(1), Some(3), Some(0), Some(2)]
    );
}
