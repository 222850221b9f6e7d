//! Tests for the event system.

use super::*;
use searchforge_core::score::SimpleScore;

#[derive(Clone, Debug)]
struct TestSolution {
    score: Option<SimpleScore>,
}

impl PlanningSolution for TestSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

fn solution(score: i64) -> TestSolution {
    TestSolution {
        score: Some(SimpleScore::of(score)),
    }
}

#[test]
fn test_event_support_new() {
    let support: SolverEventSupport<TestSolution> = SolverEventSupport::new();

    assert_eq!(support.solver_listener_count(), 0);
    assert_eq!(support.phase_listener_count(), 0);
    assert_eq!(support.step_listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_event_support_fire_events() {
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();

    let listener = Arc::new(CountingEventListener::new());
    support.add_solver_listener(listener.clone());
    support.add_phase_listener(listener.clone());
    support.add_step_listener(listener.clone());

    let solution = solution(-5);
    support.fire_solving_started(&solution);
    support.fire_best_solution_changed(&solution, &SimpleScore::of(-5));
    support.fire_phase_started(0, "LocalSearch");
    support.fire_step_started(0);
    support.fire_step_ended(0, &SimpleScore::of(-3));
    support.fire_phase_ended(0, "LocalSearch");
    support.fire_solving_ended(&solution, false);

    assert_eq!(listener.solving_started_count(), 1);
    assert_eq!(listener.best_solution_count(), 1);
    assert_eq!(listener.phase_started_count(), 1);
    assert_eq!(listener.step_started_count(), 1);
    assert_eq!(listener.step_ended_count(), 1);
    assert_eq!(listener.phase_ended_count(), 1);
    assert_eq!(listener.solving_ended_count(), 1);
    assert_eq!(listener.solving_error_count(), 0);
}

#[test]
fn test_solving_error_reaches_listeners() {
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();
    let listener = Arc::new(CountingEventListener::new());
    support.add_solver_listener(listener.clone());

    support.fire_solving_error(&SolverError::config("late_acceptance_size", "must be positive"));

    assert_eq!(listener.solving_error_count(), 1);
    assert_eq!(listener.solving_ended_count(), 0);
}

#[test]
fn test_clone_shares_listeners() {
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();
    let listener = Arc::new(CountingEventListener::new());
    support.add_step_listener(listener.clone());

    let copy = support.clone();
    copy.fire_step_started(3);
    support.fire_step_started(4);

    assert_eq!(listener.step_started_count(), 2);
}

#[test]
fn test_event_support_clear_listeners() {
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();
    support.add_solver_listener(Arc::new(CountingEventListener::new()));
    assert!(support.has_listeners());

    support.clear_listeners();

    assert!(!support.has_listeners());
    assert_eq!(support.solver_listener_count(), 0);
}

#[test]
fn test_counting_listener_reset() {
    let listener = CountingEventListener::new();
    listener.best_solution_count.store(5, Ordering::SeqCst);
    listener.phase_started_count.store(3, Ordering::SeqCst);

    listener.reset();

    assert_eq!(listener.best_solution_count(), 0);
    assert_eq!(listener.phase_started_count(), 0);
}

#[test]
fn test_logging_listener_prefix() {
    assert_eq!(LoggingEventListener::new().prefix, "");
    assert_eq!(LoggingEventListener::with_prefix("nqueens").prefix, "nqueens");
}

#[test]
fn test_channel_listener_forwards_best_solutions() {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();
    support.add_solver_listener(Arc::new(ChannelEventListener::new(sender)));

    support.fire_best_solution_changed(&solution(-2), &SimpleScore::of(-2));
    support.fire_best_solution_changed(&solution(0), &SimpleScore::of(0));

    let (_, first) = receiver.try_recv().unwrap();
    let (best, second) = receiver.try_recv().unwrap();
    assert_eq!(first, SimpleScore::of(-2));
    assert_eq!(second, SimpleScore::of(0));
    assert_eq!(best.score, Some(SimpleScore::of(0)));
}

#[test]
fn test_channel_listener_tolerates_closed_receiver() {
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    drop(receiver);
    let listener = ChannelEventListener::<TestSolution>::new(sender);

    listener.on_best_solution_changed(&solution(1), &SimpleScore::of(1));
}

#[test]
fn test_multiple_listeners_in_order() {
    let mut support: SolverEventSupport<TestSolution> = SolverEventSupport::new();
    let listener1 = Arc::new(CountingEventListener::new());
    let listener2 = Arc::new(CountingEventListener::new());
    support.add_solver_listener(listener1.clone());
    support.add_solver_listener(listener2.clone());

    support.fire_best_solution_changed(&solution(0), &SimpleScore::of(0));

    assert_eq!(listener1.best_solution_count(), 1);
    assert_eq!(listener2.best_solution_count(), 1);
}
