//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42
        random_type = "chacha20"
        move_thread_count = { count = 4 }

        [termination]
        seconds_spent_limit = 30

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "late_acceptance"
        late_acceptance_size = 400
        [phases.forager]
        accepted_count_limit = 1
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.random_type, RandomType::ChaCha20);
    assert_eq!(config.move_thread_count, MoveThreadCount::Count(4));
    assert_eq!(config.termination.unwrap().seconds_spent_limit, Some(30));
    assert_eq!(config.phases.len(), 1);

    let PhaseConfig::LocalSearch(phase) = &config.phases[0];
    match &phase.acceptor {
        Some(AcceptorConfig::LateAcceptance(la)) => {
            assert_eq!(la.late_acceptance_size, Some(400))
        }
        other => panic!("unexpected acceptor {:?}", other),
    }
    assert_eq!(phase.forager.as_ref().unwrap().accepted_count_limit, Some(1));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        termination:
          unimproved_step_count_limit: 100
        phases:
          - type: local_search
            acceptor:
              type: simulated_annealing
              starting_temperature: "0hard/500soft"
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(
        config.termination.unwrap().unimproved_step_count_limit,
        Some(100)
    );
    let PhaseConfig::LocalSearch(phase) = &config.phases[0];
    match &phase.acceptor {
        Some(AcceptorConfig::SimulatedAnnealing(sa)) => {
            assert_eq!(sa.starting_temperature.as_deref(), Some("0hard/500soft"))
        }
        other => panic!("unexpected acceptor {:?}", other),
    }
}

#[test]
fn test_composite_acceptor() {
    let toml = r#"
        [[phases]]
        type = "local_search"

        [phases.acceptor]
        type = "composite"

        [[phases.acceptor.acceptors]]
        type = "tabu_search"
        entity_tabu_size = 7

        [[phases.acceptor.acceptors]]
        type = "step_counting_hill_climbing"
        step_counting_hill_climbing_size = 50
        step_counting_hill_climbing_type = "equal_or_improving_step"
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    let PhaseConfig::LocalSearch(phase) = &config.phases[0];
    let Some(AcceptorConfig::Composite(composite)) = &phase.acceptor else {
        panic!("expected composite acceptor");
    };
    assert_eq!(composite.acceptors.len(), 2);
    match &composite.acceptors[1] {
        AcceptorConfig::StepCountingHillClimbing(c) => {
            assert_eq!(c.step_counting_hill_climbing_size, Some(50));
            assert_eq!(
                c.step_counting_hill_climbing_type,
                Some(StepCountingHillClimbingType::EqualOrImprovingStep)
            );
        }
        other => panic!("unexpected acceptor {:?}", other),
    }
}

#[test]
fn test_unknown_counting_mode_is_rejected() {
    let toml = r#"
        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "step_counting_hill_climbing"
        step_counting_hill_climbing_type = "every_other_step"
    "#;

    assert!(matches!(
        SolverConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_hill_climbing_unit_variant() {
    let yaml = r#"
        phases:
          - type: local_search
            local_search_type: tabu_search
            acceptor:
              type: hill_climbing
            forager:
              pick_early_type: first_last_step_score_improving
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    let PhaseConfig::LocalSearch(phase) = &config.phases[0];
    assert_eq!(phase.local_search_type, Some(LocalSearchType::TabuSearch));
    assert!(matches!(phase.acceptor, Some(AcceptorConfig::HillClimbing)));
    assert_eq!(
        phase.forager.as_ref().unwrap().pick_early_type,
        Some(PickEarlyType::FirstLastStepScoreImproving)
    );
}

#[test]
fn test_zero_move_threads_is_invalid() {
    let err = SolverConfig::from_toml_str("move_thread_count = { count = 0 }").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_zero_accepted_count_limit_is_invalid() {
    let err = SolverConfig::from_toml_str(
        r#"
        [[phases]]
        type = "local_search"
        [phases.forager]
        accepted_count_limit = 0
        "#,
    )
    .unwrap_err();
    match err {
        ConfigError::Invalid(message) => assert!(message.contains("accepted_count_limit")),
        other => panic!("unexpected error: {other}"),
    }

    let config = SolverConfig::new().with_phase(PhaseConfig::LocalSearch(
        LocalSearchConfig::default().with_forager(ForagerConfig::default().with_accepted_count_limit(1)),
    ));
    assert!(config.validate().is_ok());
}

#[test]
fn test_forager_podium_and_late_acceptance_switch() {
    let config = SolverConfig::from_yaml_str(
        r#"
phases:
  - type: local_search
    acceptor:
      type: late_acceptance
      late_acceptance_size: 50
      hill_climbing_enabled: false
    forager:
      finalist_podium_type: strategic_oscillation_by_level_on_best_score
"#,
    )
    .unwrap();

    let PhaseConfig::LocalSearch(phase) = &config.phases[0];
    match &phase.acceptor {
        Some(AcceptorConfig::LateAcceptance(late)) => {
            assert_eq!(late.hill_climbing_enabled, Some(false))
        }
        other => panic!("unexpected acceptor: {other:?}"),
    }
    let podium = phase.forager.as_ref().unwrap().finalist_podium_type.unwrap();
    assert_eq!(podium, FinalistPodiumType::StrategicOscillationByLevelOnBestScore);
    assert!(podium.references_best_score());
    assert!(!FinalistPodiumType::default().references_best_score());
}

#[test]
fn test_move_thread_resolution() {
    assert_eq!(MoveThreadCount::None.resolve(8), 0);
    assert_eq!(MoveThreadCount::Auto.resolve(8), 6);
    assert_eq!(MoveThreadCount::Auto.resolve(2), 1);
    assert_eq!(MoveThreadCount::Count(3).resolve(1), 3);
}

#[test]
fn test_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert!(config.environment_mode.is_reproducible());
    assert!(!config.environment_mode.is_asserted());
    assert_eq!(config.move_thread_grace(), Duration::from_millis(1_000));
    assert!(config.time_limit().is_none());
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_environment_mode(EnvironmentMode::FastAssert)
        .with_phase(PhaseConfig::LocalSearch(
            LocalSearchConfig::default().with_acceptor(AcceptorConfig::HillClimbing),
        ));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert!(config.environment_mode.is_asserted());
    assert!(!config.environment_mode.is_fully_asserted());
    assert_eq!(config.phases.len(), 1);
}

#[test]
fn test_termination_minutes_add_up() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(30),
        minutes_spent_limit: Some(2),
        ..Default::default()
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_secs(150)));
    assert!(!termination.is_empty());
    assert!(TerminationConfig::default().is_empty());
}
