//! Tests for move selectors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use searchforge_test::nqueens::{
    create_nqueens_director, get_queen_row, queen_rows, set_queen_row, NQueensSolution,
};

use super::*;
use crate::heuristic::r#move::{ChangeMove, EitherMove, SwapMove};

type QueenChange = ChangeMove<NQueensSolution, usize>;
type QueenSwap = SwapMove<NQueensSolution, usize>;

fn change_selector() -> ChangeMoveSelector<NQueensSolution, usize> {
    ChangeMoveSelector::new(
        get_queen_row,
        set_queen_row,
        0,
        "row",
        ValueRange::FromSolution(queen_rows),
    )
}

fn swap_selector() -> SwapMoveSelector<NQueensSolution, usize> {
    SwapMoveSelector::simple(get_queen_row, set_queen_row, 0, "row")
}

#[test]
fn test_change_selector_enumerates_entities_then_values() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let moves: Vec<QueenChange> = change_selector().select_moves(&director, &mut rng);

    assert_eq!(moves.len(), 9);
    assert_eq!(MoveSelector::<_, QueenChange>::size(&change_selector(), &director), 9);
    let pairs: Vec<(usize, usize)> = moves
        .iter()
        .map(|m| (m.entity_index(), *m.to_value().unwrap()))
        .take(4)
        .collect();
    assert_eq!(pairs, vec![(0, 0), (0, 1), (0, 2), (1, 0)]);
}

#[test]
fn test_static_values() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let selector = ChangeMoveSelector::simple(get_queen_row, set_queen_row, 0, "row", vec![3]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let moves: Vec<QueenChange> = selector.select_moves(&director, &mut rng);

    assert_eq!(moves.len(), 4);
    assert!(moves.iter().all(|m| m.to_value() == Some(&3)));
}

#[test]
fn test_swap_selector_yields_unordered_pairs() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let moves: Vec<QueenSwap> = swap_selector().select_moves(&director, &mut rng);

    assert_eq!(moves.len(), 6);
    assert!(moves
        .iter()
        .all(|m| m.left_entity_index() < m.right_entity_index()));
}

#[test]
fn test_shuffled_order_is_seeded_permutation() {
    let director = create_nqueens_director(&[0, 1, 2, 3, 4]);
    let selector = change_selector().with_selection_order(SelectionOrder::Shuffled);

    let keys = |seed: u64| -> Vec<(usize, usize)> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let moves: Vec<QueenChange> = selector.select_moves(&director, &mut rng);
        moves
            .iter()
            .map(|m| (m.entity_index(), *m.to_value().unwrap()))
            .collect()
    };

    let first = keys(42);
    assert_eq!(first, keys(42));

    let mut sorted = first.clone();
    sorted.sort();
    let original: Vec<(usize, usize)> = (0..5).flat_map(|e| (0..5).map(move |v| (e, v))).collect();
    assert_eq!(sorted, original);
    assert_ne!(first, original);
}

#[test]
fn test_union_selector_concatenates() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let selector = UnionMoveSelector::new(change_selector(), swap_selector());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let moves: Vec<EitherMove<NQueensSolution, usize>> =
        selector.select_moves(&director, &mut rng);

    assert_eq!(moves.len(), 9 + 3);
    assert!(matches!(moves[0], EitherMove::Change(_)));
    assert!(matches!(moves[11], EitherMove::Swap(_)));
    assert_eq!(
        MoveSelector::<_, EitherMove<NQueensSolution, usize>>::size(&selector, &director),
        12
    );
}

#[test]
fn test_selection_order_flags() {
    assert!(SelectionOrder::Shuffled.is_random());
    assert!(!SelectionOrder::Original.is_random());
    assert_eq!(SelectionOrder::default(), SelectionOrder::Original);
    assert_eq!(
        SelectionOrder::from_random_selection(true),
        SelectionOrder::Shuffled
    );
}
