//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha20Rng, ChaCha8Rng};
use searchforge_config::{EnvironmentMode, RandomType};
use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use crate::event::SolverEventSupport;
use crate::statistics::{PhaseStatistics, ScoreImprovement, SolverStatistics};

/// Builds the solver's random source.
///
/// Without a seed the generator is seeded from the operating system.
pub fn build_rng(random_type: RandomType, seed: Option<u64>) -> Box<dyn RngCore + Send> {
    match (random_type, seed) {
        (RandomType::ChaCha8, Some(seed)) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        (RandomType::ChaCha8, None) => Box::new(ChaCha8Rng::from_os_rng()),
        (RandomType::ChaCha20, Some(seed)) => Box::new(ChaCha20Rng::seed_from_u64(seed)),
        (RandomType::ChaCha20, None) => Box::new(ChaCha20Rng::from_os_rng()),
        (RandomType::Std, Some(seed)) => Box::new(StdRng::seed_from_u64(seed)),
        (RandomType::Std, None) => Box::new(StdRng::from_os_rng()),
    }
}

/// Top-level scope for the entire solving process.
///
/// Generic over `D: ScoreDirector<S>` for zero type erasure. The best
/// solution record lives here and is written only by the best solution
/// recaller.
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    best_solution: Option<S>,
    best_score: Option<S::Score>,
    rng: Box<dyn RngCore + Send>,
    start_time: Option<Instant>,
    total_step_count: u64,
    last_improvement_step_count: u64,
    last_improvement_time: Option<Instant>,
    terminate_early_flag: Arc<AtomicBool>,
    events: SolverEventSupport<S>,
    environment_mode: EnvironmentMode,
    statistics: SolverStatistics<S::Score>,
    phase_count: usize,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    /// Creates a scope seeded from the operating system.
    pub fn new(score_director: D) -> Self {
        Self::with_rng(score_director, build_rng(RandomType::default(), None))
    }

    /// Creates a reproducible scope.
    pub fn with_seed(score_director: D, seed: u64) -> Self {
        Self::with_rng(score_director, build_rng(RandomType::default(), Some(seed)))
    }

    pub fn with_rng(score_director: D, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            score_director,
            best_solution: None,
            best_score: None,
            rng,
            start_time: None,
            total_step_count: 0,
            last_improvement_step_count: 0,
            last_improvement_time: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            events: SolverEventSupport::new(),
            environment_mode: EnvironmentMode::default(),
            statistics: SolverStatistics::new(),
            phase_count: 0,
        }
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_events(mut self, events: SolverEventSupport<S>) -> Self {
        self.events = events;
        self
    }

    /// Shares an externally owned terminate-early flag.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = flag;
        self
    }

    pub fn start_solving(&mut self) {
        let now = Instant::now();
        self.start_time = Some(now);
        self.last_improvement_time = Some(now);
        self.total_step_count = 0;
        self.last_improvement_step_count = 0;
    }

    /// Time since solving started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.best_score.as_ref()
    }

    /// Replaces the best solution record.
    ///
    /// `step_count` is the solver-wide step count at which it was found, or
    /// `None` for the solution solving started from.
    pub fn set_best_solution(&mut self, solution: S, score: S::Score, step_count: Option<u64>) {
        self.best_solution = Some(solution);
        self.best_score = Some(score);
        if step_count.is_some() {
            self.last_improvement_step_count = self.total_step_count;
            self.last_improvement_time = Some(Instant::now());
        }
        self.statistics.record_improvement(ScoreImprovement {
            time_offset: self.elapsed(),
            step_count,
            score,
        });
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// Borrows the working solution and the random source together.
    pub fn solution_and_rng(&mut self) -> (&S, &mut dyn RngCore) {
        (self.score_director.working_solution(), &mut *self.rng)
    }

    /// Borrows the score director and the random source together.
    pub fn director_and_rng(&mut self) -> (&mut D, &mut dyn RngCore) {
        (&mut self.score_director, &mut *self.rng)
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Steps taken since the best score last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.total_step_count - self.last_improvement_step_count
    }

    /// Time since the best score last improved.
    pub fn unimproved_duration(&self) -> Duration {
        self.last_improvement_time
            .map(|t| t.elapsed())
            .unwrap_or_default()
    }

    /// Returns the flag that asks the solver to stop at the next check.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    pub fn terminate_early(&self) {
        self.terminate_early_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> &SolverEventSupport<S> {
        &self.events
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// Allocates the next phase index.
    pub fn next_phase_index(&mut self) -> usize {
        let index = self.phase_count;
        self.phase_count += 1;
        index
    }

    pub fn record_phase_statistics(&mut self, phase: PhaseStatistics<S::Score>) {
        self.statistics.record_phase(phase);
    }

    pub fn statistics(&self) -> &SolverStatistics<S::Score> {
        &self.statistics
    }

    /// Finalizes and returns the statistics, and the best (or working) solution.
    pub fn into_result(mut self) -> (S, Option<S::Score>, SolverStatistics<S::Score>) {
        self.statistics.total_duration = self.elapsed();
        self.statistics.score_calculation_count = self.score_director.calculation_count();
        let solution = match self.best_solution {
            Some(solution) => solution,
            None => self.score_director.clone_working_solution(),
        };
        (solution, self.best_score, self.statistics)
    }
}
