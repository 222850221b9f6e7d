//! Configuration system for SearchForge.
//!
//! Load solver configuration from TOML or YAML to control termination,
//! randomness, move threads and local search phases without code changes.
//!
//! # Examples
//!
//! ```
//! use searchforge_config::{AcceptorConfig, PhaseConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!     unimproved_step_count_limit = 500
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "late_acceptance"
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! let PhaseConfig::LocalSearch(phase) = &config.phases[0];
//! assert!(matches!(phase.acceptor, Some(AcceptorConfig::LateAcceptance(_))));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use searchforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! assert!(config.phases.is_empty());
//! ```

mod local_search;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local_search::{
    AcceptorConfig, CompositeAcceptorConfig, FinalistPodiumType, ForagerConfig, GreatDelugeConfig,
    LateAcceptanceConfig, LateSimulatedAnnealingConfig, LocalSearchConfig, LocalSearchType,
    PickEarlyType, SimulatedAnnealingConfig, StepCountingHillClimbingConfig,
    StepCountingHillClimbingType, TabuSearchConfig,
};

/// Default grace period for stopping move evaluation threads.
pub const DEFAULT_MOVE_THREAD_GRACE_MILLIS: u64 = 1_000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Pseudo-random generator family.
    #[serde(default)]
    pub random_type: RandomType,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// How long to wait for move threads to stop, in milliseconds.
    #[serde(default)]
    pub move_thread_grace_millis: Option<u64>,

    /// Solver-level termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phase configurations, run in order.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let MoveThreadCount::Count(0) = self.move_thread_count {
            return Err(ConfigError::Invalid(
                "move_thread_count must be at least 1 when given as a count".to_string(),
            ));
        }
        if self.move_thread_grace_millis == Some(0) {
            return Err(ConfigError::Invalid(
                "move_thread_grace_millis must be positive".to_string(),
            ));
        }
        for (index, phase) in self.phases.iter().enumerate() {
            let PhaseConfig::LocalSearch(local_search) = phase;
            let limit = local_search
                .forager
                .as_ref()
                .and_then(|forager| forager.accepted_count_limit);
            if limit == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "phases[{index}].forager.accepted_count_limit must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Sets the move thread count.
    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    /// Adds a phase configuration.
    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Grace period for stopping move threads.
    pub fn move_thread_grace(&self) -> Duration {
        Duration::from_millis(
            self.move_thread_grace_millis
                .unwrap_or(DEFAULT_MOVE_THREAD_GRACE_MILLIS),
        )
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeds the random source from entropy when no seed is given.
    NonReproducible,

    /// Deterministic: the same seed and input give the same result.
    #[default]
    Reproducible,

    /// Verifies every undo restores the score.
    FastAssert,

    /// Additionally verifies every tentative score against a full recalculation.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true for the modes that run corruption checks.
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    /// Returns true if tentative scores are checked against a full recalculation.
    pub fn is_fully_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }

    /// Returns true if the random source must be seeded deterministically.
    pub fn is_reproducible(&self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }
}

/// Pseudo-random generator family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomType {
    /// ChaCha with 8 rounds.
    #[default]
    #[serde(rename = "chacha8")]
    ChaCha8,

    /// ChaCha with 20 rounds.
    #[serde(rename = "chacha20")]
    ChaCha20,

    /// The `rand` crate's standard generator.
    Std,
}

/// Move thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// All but two of the available cores, at least one.
    Auto,

    /// No parallel move evaluation.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to a worker count. Zero means moves are evaluated on the solver thread.
    pub fn resolve(&self, available_processors: usize) -> usize {
        match self {
            MoveThreadCount::Auto => available_processors.saturating_sub(2).max(1),
            MoveThreadCount::None => 0,
            MoveThreadCount::Count(n) => *n,
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Target best score to achieve (as string, e.g., "0hard/0soft").
    pub best_score_limit: Option<String>,

    /// Maximum number of steps.
    pub step_count_limit: Option<u64>,

    /// Maximum steps without a new best score.
    pub unimproved_step_count_limit: Option<u64>,

    /// Maximum seconds without a new best score.
    pub unimproved_seconds_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }

    /// Returns the unimproved time limit as a Duration, if any.
    pub fn unimproved_time_limit(&self) -> Option<Duration> {
        self.unimproved_seconds_spent_limit.map(Duration::from_secs)
    }

    /// Returns true if no limit is set.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.best_score_limit.is_none()
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.unimproved_seconds_spent_limit.is_none()
    }
}

/// Phase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    /// Local search phase.
    LocalSearch(LocalSearchConfig),
}
