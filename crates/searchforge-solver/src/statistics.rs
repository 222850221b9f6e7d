//! Solver statistics.
//!
//! Phases fill in a [`PhaseStatistics`] as they run and hand it to the
//! solver scope when they end; the solver returns the aggregate
//! [`SolverStatistics`] with its result.

use std::time::Duration;

use searchforge_core::score::Score;

/// Statistics for a single solver phase.
#[derive(Debug, Clone)]
pub struct PhaseStatistics<Sc: Score> {
    /// Index of this phase (0-based).
    pub phase_index: usize,
    /// Type name of the phase (e.g. "LocalSearch").
    pub phase_type: String,
    /// Time spent in this phase.
    pub duration: Duration,
    /// Number of steps taken in this phase.
    pub step_count: u64,
    /// Number of moves evaluated.
    pub moves_evaluated: u64,
    /// Number of moves accepted.
    pub moves_accepted: u64,
    /// Best score when the phase started.
    pub starting_score: Option<Sc>,
    /// Best score when the phase ended.
    pub ending_score: Option<Sc>,
}

impl<Sc: Score> PhaseStatistics<Sc> {
    /// Creates empty phase statistics.
    pub fn new(phase_index: usize, phase_type: impl Into<String>) -> Self {
        Self {
            phase_index,
            phase_type: phase_type.into(),
            duration: Duration::ZERO,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            starting_score: None,
            ending_score: None,
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }

    /// Returns the moves evaluated per second of phase time.
    pub fn moves_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.moves_evaluated as f64 / secs
        } else {
            0.0
        }
    }
}

/// Record of a new best score.
#[derive(Debug, Clone)]
pub struct ScoreImprovement<Sc: Score> {
    /// Time since solving started when the improvement occurred.
    pub time_offset: Duration,
    /// Solver-wide step count at the improvement; `None` for the initial best.
    pub step_count: Option<u64>,
    /// The new best score.
    pub score: Sc,
}

/// Complete statistics for a solver run.
#[derive(Debug, Clone)]
pub struct SolverStatistics<Sc: Score> {
    /// Total time spent solving.
    pub total_duration: Duration,
    /// Total steps taken across all phases.
    pub total_step_count: u64,
    /// Total moves evaluated across all phases.
    pub total_moves_evaluated: u64,
    /// Total moves accepted across all phases.
    pub total_moves_accepted: u64,
    /// Number of score calculations performed by the solver's director.
    pub score_calculation_count: u64,
    /// Statistics for each phase.
    pub phase_statistics: Vec<PhaseStatistics<Sc>>,
    /// History of best score improvements.
    pub score_history: Vec<ScoreImprovement<Sc>>,
}

impl<Sc: Score> SolverStatistics<Sc> {
    /// Creates empty solver statistics.
    pub fn new() -> Self {
        Self {
            total_duration: Duration::ZERO,
            total_step_count: 0,
            total_moves_evaluated: 0,
            total_moves_accepted: 0,
            score_calculation_count: 0,
            phase_statistics: Vec::new(),
            score_history: Vec::new(),
        }
    }

    /// Folds a finished phase into the totals.
    pub fn record_phase(&mut self, phase: PhaseStatistics<Sc>) {
        self.total_step_count += phase.step_count;
        self.total_moves_evaluated += phase.moves_evaluated;
        self.total_moves_accepted += phase.moves_accepted;
        self.phase_statistics.push(phase);
    }

    /// Appends a new best score.
    pub fn record_improvement(&mut self, improvement: ScoreImprovement<Sc>) {
        self.score_history.push(improvement);
    }

    /// Returns the overall acceptance rate.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_moves_evaluated == 0 {
            0.0
        } else {
            self.total_moves_accepted as f64 / self.total_moves_evaluated as f64
        }
    }

    /// Returns the number of phases.
    pub fn phase_count(&self) -> usize {
        self.phase_statistics.len()
    }

    /// Returns the best score achieved (last in history, or None).
    pub fn best_score(&self) -> Option<&Sc> {
        self.score_history.last().map(|s| &s.score)
    }

    /// Returns the number of score improvements recorded.
    pub fn improvement_count(&self) -> usize {
        self.score_history.len()
    }
}

impl<Sc: Score> Default for SolverStatistics<Sc> {
    fn default() -> Self {
        Self::new()
    }
}
