use std::sync::Arc;
use std::time::Duration;

use searchforge_config::{EnvironmentMode, PickEarlyType};
use searchforge_core::score::SimpleScore;
use searchforge_core::SolverError;

use super::*;
use crate::event::{CountingEventListener, SolverEventSupport};
use crate::heuristic::selector::SelectionOrder;
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::{NeverTermination, StepCountTermination};
use crate::test_utils::{
    create_nqueens_director, nqueens_director_factory, queen_change_selector,
    queen_union_selector, NQueensDirector, NQueensSolution, QueenEitherMove, QueenMove,
};

type QueenScope = SolverScope<NQueensSolution, NQueensDirector>;

fn started_scope(rows: &[usize], seed: u64) -> QueenScope {
    let mut scope = SolverScope::with_seed(create_nqueens_director(rows), seed);
    scope.start_solving();
    scope
}

fn hot_annealing() -> SimulatedAnnealingAcceptor<SimpleScore> {
    SimulatedAnnealingAcceptor::new(SimpleScore::of(1_000_000_000))
}

fn solve<P>(phase: &mut P, scope: &mut QueenScope) -> searchforge_core::Result<()>
where
    P: Phase<NQueensSolution, NQueensDirector>,
{
    phase.solve(scope, &NeverTermination)
}

#[test]
fn test_optimal_start_takes_no_steps() {
    let mut scope = started_scope(&[1, 3, 0, 2], 0);
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        HillClimbingAcceptor::new(),
        AcceptedForager::new(usize::MAX, PickEarlyType::Never),
    );

    solve(&mut phase, &mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(0)));
    let statistics = &scope.statistics().phase_statistics[0];
    assert_eq!(statistics.step_count, 0);
    assert!(statistics.moves_evaluated > 0);
    assert_eq!(statistics.moves_accepted, 0);
}

#[test]
fn test_hill_climbing_improves_best() {
    let mut scope = started_scope(&[0, 0, 0, 0], 11);
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        HillClimbingAcceptor::new(),
        AcceptedForager::new(usize::MAX, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(20));

    solve(&mut phase, &mut scope).unwrap();

    let best = *scope.best_score().unwrap();
    assert!(best > SimpleScore::of(-6));
    assert!(scope.total_step_count() >= 1);
    assert!(scope.total_step_count() <= 20);
    let snapshot = scope.best_solution().unwrap();
    assert_eq!(snapshot.score, Some(best));
    assert_eq!(crate::test_utils::calculate_conflicts(snapshot), best);
}

#[test]
fn test_phase_termination_bounds_step_count() {
    let listener = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::<NQueensSolution>::new();
    events.add_phase_listener(listener.clone());
    events.add_step_listener(listener.clone());
    let mut scope = started_scope(&[0, 0, 0, 0], 5);
    scope = scope.with_events(events);

    let mut phase = LocalSearchPhase::<_, QueenEitherMove, _, _, _>::new(
        queen_union_selector(),
        hot_annealing(),
        AcceptedForager::new(1, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(5));

    solve(&mut phase, &mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 5);
    assert_eq!(listener.phase_started_count(), 1);
    assert_eq!(listener.phase_ended_count(), 1);
    assert_eq!(listener.step_started_count(), 5);
    assert_eq!(listener.step_ended_count(), 5);
    assert_eq!(scope.statistics().phase_count(), 1);
}

#[test]
fn test_solver_termination_stops_phase() {
    let mut scope = started_scope(&[0, 0, 0, 0], 5);
    let mut phase = LocalSearchPhase::<_, QueenEitherMove, _, _, _>::new(
        queen_union_selector(),
        hot_annealing(),
        AcceptedForager::new(1, PickEarlyType::Never),
    );

    phase
        .solve(&mut scope, &StepCountTermination::new(3))
        .unwrap();

    assert_eq!(scope.total_step_count(), 3);
}

#[test]
fn test_invalid_acceptor_fails_before_first_step() {
    let listener = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::<NQueensSolution>::new();
    events.add_phase_listener(listener.clone());
    let mut scope = started_scope(&[0, 0, 0, 0], 0).with_events(events);

    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        LateAcceptanceAcceptor::new(0),
        AcceptedForager::new(1, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(10));

    let err = solve(&mut phase, &mut scope).unwrap_err();

    assert!(matches!(err, SolverError::Config { .. }));
    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(listener.phase_started_count(), 0);
}

#[test]
fn test_terminate_early_before_start() {
    let mut scope = started_scope(&[0, 0, 0, 0], 0);
    scope.terminate_early();
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        HillClimbingAcceptor::new(),
        AcceptedForager::new(usize::MAX, PickEarlyType::Never),
    );

    solve(&mut phase, &mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(scope.best_score(), Some(&SimpleScore::of(-6)));
    assert_eq!(scope.statistics().phase_statistics[0].moves_evaluated, 0);
}

#[test]
fn test_tabu_search_always_finds_a_step() {
    let mut scope = started_scope(&[0, 0, 0, 0], 2);
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        TabuAcceptor::new(TabuScope::Entity, TabuSizeStrategy::Fixed(2)),
        AcceptedForager::new(usize::MAX, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(10));

    solve(&mut phase, &mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 10);
    assert!(*scope.best_score().unwrap() > SimpleScore::of(-6));
}

#[test]
fn test_asserted_modes_run_clean() {
    for mode in [EnvironmentMode::FastAssert, EnvironmentMode::FullAssert] {
        let mut scope = started_scope(&[0, 0, 0, 0], 9).with_environment_mode(mode);
        let mut phase = LocalSearchPhase::<_, QueenEitherMove, _, _, _>::new(
            queen_union_selector(),
            LateAcceptanceAcceptor::new(3),
            AcceptedForager::new(usize::MAX, PickEarlyType::Never),
        )
        .with_termination(StepCountTermination::new(8));

        solve(&mut phase, &mut scope).unwrap();
        assert!(scope.total_step_count() > 0);
    }
}

fn shuffled_run(move_threads: Option<usize>) -> (Vec<Option<usize>>, SimpleScore, u64) {
    let mut scope = started_scope(&[0, 0, 0, 0, 0, 0], 42);
    let mut phase = LocalSearchPhase::<_, QueenEitherMove, _, _, _>::new(
        queen_union_selector().with_selection_order(SelectionOrder::Shuffled),
        LateAcceptanceAcceptor::new(5),
        AcceptedForager::new(4, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(25));
    if let Some(count) = move_threads {
        phase = phase.with_move_threads(MoveThreads::new(
            nqueens_director_factory(),
            count,
            Duration::from_secs(5),
        ));
    }

    solve(&mut phase, &mut scope).unwrap();

    let best = *scope.best_score().unwrap();
    let steps = scope.total_step_count();
    (scope.working_solution().rows(), best, steps)
}

#[test]
fn test_parallel_evaluation_matches_serial_run() {
    let serial = shuffled_run(None);
    assert_eq!(shuffled_run(Some(1)), serial);
    assert_eq!(shuffled_run(Some(3)), serial);
}

#[test]
fn test_same_seed_same_run() {
    assert_eq!(shuffled_run(None), shuffled_run(None));
}

#[test]
fn test_zero_accepted_count_limit_fails_before_first_step() {
    let listener = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::<NQueensSolution>::new();
    events.add_phase_listener(listener.clone());
    let mut scope = started_scope(&[0, 0, 0, 0], 0).with_events(events);

    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        HillClimbingAcceptor::new(),
        AcceptedForager::new(0, PickEarlyType::Never),
    )
    .with_termination(StepCountTermination::new(10));

    let err = solve(&mut phase, &mut scope).unwrap_err();

    match err {
        SolverError::Config { parameter, .. } => assert_eq!(parameter, "accepted_count_limit"),
        other => panic!("expected a configuration error, got {other}"),
    }
    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(listener.phase_started_count(), 0);
}

#[test]
fn test_single_steps_never_lower_best_score() {
    let mut scope = started_scope(&[0, 0, 0, 0, 0, 0], 17);
    // late acceptance takes worsening steps; the best score must not follow them down
    let mut phase = LocalSearchPhase::<_, QueenEitherMove, _, _, _>::new(
        queen_union_selector().with_selection_order(SelectionOrder::Shuffled),
        LateAcceptanceAcceptor::new(8),
        AcceptedForager::new(1, PickEarlyType::Never),
    );

    let mut phase_scope = phase.start_phase(&mut scope).unwrap();
    let mut best = phase_scope.best_score();
    for _ in 0..40 {
        let Some(step) = phase
            .decide_next_step(&mut scope, &mut phase_scope, &NeverTermination)
            .unwrap()
        else {
            break;
        };
        let step_score = step.score().unwrap();
        assert!(step.chosen_move().is_some());

        phase.do_step(&mut scope, &mut phase_scope, step).unwrap();

        assert_eq!(scope.calculate_score(), step_score);
        assert!(phase_scope.best_score() >= best);
        assert!(phase_scope.best_score() >= step_score);
        assert_eq!(*scope.best_score().unwrap(), phase_scope.best_score());
        best = phase_scope.best_score();
        let undo = phase_scope.last_completed_step().and_then(|s| s.undo_move());
        assert!(undo.is_some());
    }
    phase.end_phase(&mut scope, &phase_scope).unwrap();

    assert!(phase_scope.step_count() > 0);
    assert_eq!(scope.statistics().phase_count(), 1);
}

#[test]
fn test_parallel_dispatch_stops_after_first_chunk() {
    let mut scope = started_scope(&[0; 8], 3);
    let mut phase = LocalSearchPhase::<_, QueenMove, _, _, _>::new(
        queen_change_selector(),
        HillClimbingAcceptor::new(),
        AcceptedForager::new(1, PickEarlyType::Never),
    )
    .with_move_threads(MoveThreads::new(
        nqueens_director_factory(),
        2,
        Duration::from_secs(5),
    ));

    let mut phase_scope = phase.start_phase(&mut scope).unwrap();
    let step = phase
        .decide_next_step(&mut scope, &mut phase_scope, &NeverTermination)
        .unwrap()
        .unwrap();

    // 64 candidates, but the first accepted one lies in the first 2 * 10
    let dispatched = phase.evaluator().map(|evaluator| evaluator.dispatched_count());
    assert_eq!(dispatched, Some(20));
    assert_eq!(step.selected_move_count(), 1);

    phase.do_step(&mut scope, &mut phase_scope, step).unwrap();
    phase.end_phase(&mut scope, &phase_scope).unwrap();
    assert!(phase.evaluator().is_none());
    assert_eq!(scope.total_step_count(), 1);
}
