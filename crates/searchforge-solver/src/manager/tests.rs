use searchforge_config::{
    AcceptorConfig, LocalSearchConfig, MoveThreadCount, PhaseConfig, SimulatedAnnealingConfig,
    SolverConfig, TerminationConfig,
};
use searchforge_core::score::SimpleScore;
use searchforge_core::SolverError;
use searchforge_scoring::ScoreDirectorFactory;

use super::*;
use crate::heuristic::selector::ChangeMoveSelector;
use crate::test_utils::{
    calculate_conflicts, nqueens_director_factory, queen_change_selector, NQueensCalculator,
    NQueensSolution, QueenMove,
};

type QueenFactory = SolverFactory<
    NQueensSolution,
    QueenMove,
    ChangeMoveSelector<NQueensSolution, usize>,
    ScoreDirectorFactory<NQueensSolution, NQueensCalculator>,
>;

fn queen_factory(config: &SolverConfig) -> searchforge_core::Result<QueenFactory> {
    SolverFactory::from_config(config, queen_change_selector, nqueens_director_factory())
}

fn step_limit(limit: u64) -> Option<TerminationConfig> {
    Some(TerminationConfig {
        step_count_limit: Some(limit),
        ..Default::default()
    })
}

fn hot_annealing_phase(steps: u64) -> PhaseConfig {
    PhaseConfig::LocalSearch(LocalSearchConfig {
        acceptor: Some(AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some("1000000000".to_string()),
        })),
        termination: step_limit(steps),
        ..Default::default()
    })
}

fn start() -> NQueensSolution {
    NQueensSolution::with_rows(&[0, 0, 0, 0])
}

#[test]
fn test_default_phase_without_phase_configs() {
    let config = SolverConfig {
        random_seed: Some(1),
        termination: step_limit(20),
        ..Default::default()
    };
    let factory = queen_factory(&config).unwrap();

    let result = factory.solve(start()).unwrap();

    assert_eq!(result.statistics.phase_count(), 1);
    assert!(result.statistics.total_step_count <= 20);
    let score = result.score.unwrap();
    assert!(score >= SimpleScore::of(-6));
    assert_eq!(calculate_conflicts(&result.solution), score);
}

#[test]
fn test_configured_phases_run_in_order() {
    let config = SolverConfig {
        random_seed: Some(4),
        ..Default::default()
    }
    .with_phase(hot_annealing_phase(3))
    .with_phase(hot_annealing_phase(3));
    let factory = queen_factory(&config).unwrap();

    let result = factory.solve(start()).unwrap();

    assert_eq!(result.statistics.phase_count(), 2);
    assert_eq!(result.statistics.phase_statistics[0].step_count, 3);
    assert_eq!(result.statistics.phase_statistics[1].step_count, 3);
    assert_eq!(result.statistics.total_step_count, 6);
}

#[test]
fn test_invalid_phase_config_is_rejected_up_front() {
    let config = SolverConfig::default().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
        acceptor: Some(AcceptorConfig::SimulatedAnnealing(
            SimulatedAnnealingConfig::default(),
        )),
        ..Default::default()
    }));

    let err = queen_factory(&config).unwrap_err();

    assert!(matches!(
        err,
        SolverError::Config { ref parameter, .. } if parameter == "starting_temperature"
    ));
}

#[test]
fn test_zero_move_threads_is_rejected() {
    let config = SolverConfig::default().with_move_thread_count(MoveThreadCount::Count(0));
    let err = queen_factory(&config).unwrap_err();
    assert!(matches!(err, SolverError::Config { .. }));
}

#[test]
fn test_unparseable_best_score_limit_is_rejected() {
    let config = SolverConfig {
        termination: Some(TerminationConfig {
            best_score_limit: Some("zero".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let err = queen_factory(&config).unwrap_err();
    assert!(matches!(
        err,
        SolverError::Config { ref parameter, .. } if parameter == "best_score_limit"
    ));
}

#[test]
fn test_move_threads_give_the_same_result() {
    let run = |move_thread_count| {
        let config = SolverConfig {
            random_seed: Some(12),
            termination: step_limit(15),
            move_thread_count,
            ..Default::default()
        };
        let factory = queen_factory(&config).unwrap();
        let result = factory.solve(start()).unwrap();
        (result.solution.rows(), result.score)
    };

    assert_eq!(run(MoveThreadCount::Count(2)), run(MoveThreadCount::None));
}

#[test]
fn test_solve_async_streams_best_solutions() {
    let config = SolverConfig {
        random_seed: Some(5),
        termination: step_limit(30),
        ..Default::default()
    };
    let factory = queen_factory(&config).unwrap();

    let mut job = factory.solve_async(start()).unwrap();
    let mut streamed = Vec::new();
    while let Some((solution, score)) = job.best_solutions().blocking_recv() {
        assert_eq!(solution.score, Some(score));
        streamed.push(score);
    }
    let result = job.join().unwrap();

    assert_eq!(streamed.first(), Some(&SimpleScore::of(-6)));
    assert!(streamed.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(streamed.last().copied(), result.score);
}

#[test]
fn test_terminate_early_stops_async_job() {
    let config = SolverConfig {
        random_seed: Some(2),
        ..Default::default()
    }
    .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
        acceptor: Some(AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some("1000000000".to_string()),
        })),
        ..Default::default()
    }));
    let factory = queen_factory(&config).unwrap();

    let job = factory.solve_async(start()).unwrap();
    job.terminate_early();
    let result = job.join().unwrap();

    assert!(result.terminated_early);
    assert!(result.score.is_some());
}

#[test]
fn test_solver_status_names() {
    assert_eq!(SolverStatus::Solving.as_str(), "SOLVING");
    assert_eq!(SolverStatus::NotSolving.as_str(), "NOT_SOLVING");
}
