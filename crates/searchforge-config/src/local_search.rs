//! Local search phase configuration.

use serde::{Deserialize, Serialize};

use crate::TerminationConfig;

/// Local search configuration.
///
/// `local_search_type` is a shorthand for a default acceptor and forager;
/// an explicit `acceptor` or `forager` wins over the shorthand.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Shorthand acceptor/forager combination.
    pub local_search_type: Option<LocalSearchType>,

    /// Acceptor configuration.
    pub acceptor: Option<AcceptorConfig>,

    /// Forager configuration.
    pub forager: Option<ForagerConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl LocalSearchConfig {
    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    pub fn with_forager(mut self, forager: ForagerConfig) -> Self {
        self.forager = Some(forager);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }
}

/// Shorthand local search algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchType {
    HillClimbing,
    TabuSearch,
    SimulatedAnnealing,
    #[default]
    LateAcceptance,
    GreatDeluge,
    StepCountingHillClimbing,
}

/// Acceptor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Only accept moves that do not worsen the last step score.
    HillClimbing,

    /// Tabu search acceptor.
    TabuSearch(TabuSearchConfig),

    /// Simulated annealing acceptor.
    SimulatedAnnealing(SimulatedAnnealingConfig),

    /// Late acceptance acceptor.
    LateAcceptance(LateAcceptanceConfig),

    /// Probabilistic late acceptance.
    LateSimulatedAnnealing(LateSimulatedAnnealingConfig),

    /// Great deluge acceptor.
    GreatDeluge(GreatDelugeConfig),

    /// Step counting hill climbing acceptor.
    StepCountingHillClimbing(StepCountingHillClimbingConfig),

    /// Accepts only when every child acceptor accepts.
    Composite(CompositeAcceptorConfig),
}

/// Tabu search configuration.
///
/// Each scope takes either a size or a ratio, never both.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TabuSearchConfig {
    pub entity_tabu_size: Option<usize>,
    pub entity_tabu_ratio: Option<f64>,
    pub value_tabu_size: Option<usize>,
    pub value_tabu_ratio: Option<f64>,
    pub fading_entity_tabu_size: Option<usize>,
    pub fading_entity_tabu_ratio: Option<f64>,
    pub fading_value_tabu_size: Option<usize>,
    pub fading_value_tabu_ratio: Option<f64>,
    pub move_tabu_size: Option<usize>,
    pub fading_move_tabu_size: Option<usize>,
    pub undo_move_tabu_size: Option<usize>,
    pub fading_undo_move_tabu_size: Option<usize>,
    pub solution_tabu_size: Option<usize>,

    /// Lets a tabu move through when it beats the best score. Defaults to true.
    pub aspiration_enabled: Option<bool>,
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Starting temperature, in the score's string format (e.g. "2hard/100soft").
    pub starting_temperature: Option<String>,
}

/// Late acceptance configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    pub late_acceptance_size: Option<usize>,

    /// Also accept anything at least as good as the last step. Defaults to true.
    pub hill_climbing_enabled: Option<bool>,
}

/// Late simulated annealing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateSimulatedAnnealingConfig {
    pub late_simulated_annealing_size: Option<usize>,
}

/// Great deluge configuration.
///
/// The water level rises each step either by a fixed score or by a ratio of
/// the starting level; at most one of the two may be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GreatDelugeConfig {
    /// Starting water level; defaults to the best score at phase start.
    pub initial_water_level: Option<String>,

    pub water_level_increment_score: Option<String>,

    pub water_level_increment_ratio: Option<f64>,
}

/// Step counting hill climbing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StepCountingHillClimbingConfig {
    pub step_counting_hill_climbing_size: Option<usize>,
    pub step_counting_hill_climbing_type: Option<StepCountingHillClimbingType>,
}

/// What a step counting hill climbing acceptor counts towards its threshold reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCountingHillClimbingType {
    /// Every move evaluated in the step.
    SelectedMove,

    /// Every accepted move in the step.
    AcceptedMove,

    /// Every step.
    #[default]
    Step,

    /// Steps whose score is at least the previous step score.
    EqualOrImprovingStep,

    /// Steps whose score beats the previous step score.
    ImprovingStep,
}

/// Composite acceptor configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompositeAcceptorConfig {
    pub acceptors: Vec<AcceptorConfig>,
}

/// Forager configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Stop evaluating a step's moves after this many were accepted.
    pub accepted_count_limit: Option<usize>,

    /// Whether to pick early if an improving move is found.
    pub pick_early_type: Option<PickEarlyType>,

    /// Break ties between equally scored winners randomly.
    pub break_tie_randomly: Option<bool>,

    /// How the winner is chosen among the accepted candidates.
    pub finalist_podium_type: Option<FinalistPodiumType>,
}

impl ForagerConfig {
    pub fn with_accepted_count_limit(mut self, limit: usize) -> Self {
        self.accepted_count_limit = Some(limit);
        self
    }

    pub fn with_finalist_podium_type(mut self, podium: FinalistPodiumType) -> Self {
        self.finalist_podium_type = Some(podium);
        self
    }
}

/// Rule a forager uses to rank accepted candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalistPodiumType {
    /// The highest score wins.
    #[default]
    HighestScore,

    /// Same as `StrategicOscillationByLevel`.
    StrategicOscillation,

    /// While nothing improves on the last step score, prefer candidates that
    /// improve the highest score level the current finalist worsens.
    StrategicOscillationByLevel,

    /// Like `StrategicOscillationByLevel`, measured against the best score.
    StrategicOscillationByLevelOnBestScore,
}

impl FinalistPodiumType {
    /// Returns true if levels are compared against the best score rather
    /// than the last step score. Only meaningful for the oscillating types.
    pub fn references_best_score(&self) -> bool {
        matches!(self, FinalistPodiumType::StrategicOscillationByLevelOnBestScore)
    }
}

/// Pick early type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    /// Never pick early.
    #[default]
    Never,

    /// Pick the first accepted move that beats the best score.
    FirstBestScoreImproving,

    /// Pick the first accepted move that beats the last step score.
    FirstLastStepScoreImproving,
}
