//! Event system for solver monitoring.
//!
//! Listeners are notified synchronously, on the solver thread, in
//! registration order.
//!
//! # Event Types
//!
//! - **Solver events**: solving started/ended/failed, best solution changed
//! - **Phase events**: phase started, phase ended
//! - **Step events**: step started, step ended
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use searchforge_solver::event::{SolverEventSupport, SolverEventListener};
//! use searchforge_core::{PlanningSolution, SimpleScore};
//!
//! #[derive(Clone, Debug)]
//! struct MySolution { score: Option<SimpleScore> }
//! impl PlanningSolution for MySolution {
//!     type Score = SimpleScore;
//!     fn score(&self) -> Option<Self::Score> { self.score }
//!     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
//! }
//!
//! #[derive(Debug)]
//! struct MyListener;
//! impl SolverEventListener<MySolution> for MyListener {
//!     fn on_best_solution_changed(&self, _solution: &MySolution, score: &SimpleScore) {
//!         println!("New best: {}", score);
//!     }
//! }
//!
//! let mut support = SolverEventSupport::<MySolution>::new();
//! support.add_solver_listener(Arc::new(MyListener));
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::SolverError;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Listener for solver-level events.
pub trait SolverEventListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a new best solution is found.
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score);

    /// Called when solving starts.
    fn on_solving_started(&self, _solution: &S) {}

    /// Called when solving ends, with the best solution.
    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {}

    /// Called when solving fails. No `on_solving_ended` follows.
    fn on_solving_error(&self, _error: &SolverError) {}
}

/// Listener for phase lifecycle events.
pub trait PhaseLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a phase starts.
    fn on_phase_started(&self, phase_index: usize, phase_type: &str);

    /// Called when a phase ends.
    fn on_phase_ended(&self, phase_index: usize, phase_type: &str);
}

/// Listener for step-level events within a phase.
pub trait StepLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a step starts.
    fn on_step_started(&self, step_index: u64);

    /// Called when a step ends, with the score after its move.
    fn on_step_ended(&self, step_index: u64, score: &S::Score);
}

/// Central event broadcaster for solver events.
pub struct SolverEventSupport<S: PlanningSolution> {
    solver_listeners: Vec<Arc<dyn SolverEventListener<S>>>,
    phase_listeners: Vec<Arc<dyn PhaseLifecycleListener<S>>>,
    step_listeners: Vec<Arc<dyn StepLifecycleListener<S>>>,
}

impl<S: PlanningSolution> SolverEventSupport<S> {
    /// Creates a new event support instance.
    pub fn new() -> Self {
        Self {
            solver_listeners: Vec::new(),
            phase_listeners: Vec::new(),
            step_listeners: Vec::new(),
        }
    }

    // === Listener Registration ===

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.solver_listeners.push(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) {
        self.phase_listeners.push(listener);
    }

    pub fn add_step_listener(&mut self, listener: Arc<dyn StepLifecycleListener<S>>) {
        self.step_listeners.push(listener);
    }

    /// Removes all listeners.
    pub fn clear_listeners(&mut self) {
        self.solver_listeners.clear();
        self.phase_listeners.clear();
        self.step_listeners.clear();
    }

    // === Event Firing ===

    pub fn fire_best_solution_changed(&self, solution: &S, score: &S::Score) {
        for listener in &self.solver_listeners {
            listener.on_best_solution_changed(solution, score);
        }
    }

    pub fn fire_solving_started(&self, solution: &S) {
        for listener in &self.solver_listeners {
            listener.on_solving_started(solution);
        }
    }

    pub fn fire_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        for listener in &self.solver_listeners {
            listener.on_solving_ended(solution, is_terminated_early);
        }
    }

    pub fn fire_solving_error(&self, error: &SolverError) {
        for listener in &self.solver_listeners {
            listener.on_solving_error(error);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_started(phase_index, phase_type);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_ended(phase_index, phase_type);
        }
    }

    pub fn fire_step_started(&self, step_index: u64) {
        for listener in &self.step_listeners {
            listener.on_step_started(step_index);
        }
    }

    pub fn fire_step_ended(&self, step_index: u64, score: &S::Score) {
        for listener in &self.step_listeners {
            listener.on_step_ended(step_index, score);
        }
    }

    // === Query Methods ===

    pub fn solver_listener_count(&self) -> usize {
        self.solver_listeners.len()
    }

    pub fn phase_listener_count(&self) -> usize {
        self.phase_listeners.len()
    }

    pub fn step_listener_count(&self) -> usize {
        self.step_listeners.len()
    }

    /// Returns true if there are any listeners registered.
    pub fn has_listeners(&self) -> bool {
        !self.solver_listeners.is_empty()
            || !self.phase_listeners.is_empty()
            || !self.step_listeners.is_empty()
    }
}

impl<S: PlanningSolution> Clone for SolverEventSupport<S> {
    fn clone(&self) -> Self {
        Self {
            solver_listeners: self.solver_listeners.clone(),
            phase_listeners: self.phase_listeners.clone(),
            step_listeners: self.step_listeners.clone(),
        }
    }
}

impl<S: PlanningSolution> Default for SolverEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Debug for SolverEventSupport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("solver_listeners", &self.solver_listeners.len())
            .field("phase_listeners", &self.phase_listeners.len())
            .field("step_listeners", &self.step_listeners.len())
            .finish()
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventListener {
    prefix: String,
}

impl LoggingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener that tags every event with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for LoggingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, score: &S::Score) {
        info!(listener = %self.prefix, event = "best_solution_changed", score = %score);
    }

    fn on_solving_started(&self, _solution: &S) {
        info!(listener = %self.prefix, event = "solving_started");
    }

    fn on_solving_ended(&self, _solution: &S, is_terminated_early: bool) {
        info!(
            listener = %self.prefix,
            event = "solving_ended",
            terminated_early = is_terminated_early,
        );
    }

    fn on_solving_error(&self, error: &SolverError) {
        warn!(listener = %self.prefix, event = "solving_error", error = %error);
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for LoggingEventListener {
    fn on_phase_started(&self, phase_index: usize, phase_type: &str) {
        info!(listener = %self.prefix, event = "phase_started", phase_index, phase_type);
    }

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str) {
        info!(listener = %self.prefix, event = "phase_ended", phase_index, phase_type);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for LoggingEventListener {
    fn on_step_started(&self, step_index: u64) {
        debug!(listener = %self.prefix, event = "step_started", step_index);
    }

    fn on_step_ended(&self, step_index: u64, score: &S::Score) {
        debug!(listener = %self.prefix, event = "step_ended", step_index, score = %score);
    }
}

/// Counts event occurrences.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    best_solution_count: AtomicUsize,
    solving_started_count: AtomicUsize,
    solving_ended_count: AtomicUsize,
    solving_error_count: AtomicUsize,
    phase_started_count: AtomicUsize,
    phase_ended_count: AtomicUsize,
    step_started_count: AtomicUsize,
    step_ended_count: AtomicUsize,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_solution_count(&self) -> usize {
        self.best_solution_count.load(Ordering::SeqCst)
    }

    pub fn solving_started_count(&self) -> usize {
        self.solving_started_count.load(Ordering::SeqCst)
    }

    pub fn solving_ended_count(&self) -> usize {
        self.solving_ended_count.load(Ordering::SeqCst)
    }

    pub fn solving_error_count(&self) -> usize {
        self.solving_error_count.load(Ordering::SeqCst)
    }

    pub fn phase_started_count(&self) -> usize {
        self.phase_started_count.load(Ordering::SeqCst)
    }

    pub fn phase_ended_count(&self) -> usize {
        self.phase_ended_count.load(Ordering::SeqCst)
    }

    pub fn step_started_count(&self) -> usize {
        self.step_started_count.load(Ordering::SeqCst)
    }

    pub fn step_ended_count(&self) -> usize {
        self.step_ended_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.best_solution_count,
            &self.solving_started_count,
            &self.solving_ended_count,
            &self.solving_error_count,
            &self.phase_started_count,
            &self.phase_ended_count,
            &self.step_started_count,
            &self.step_ended_count,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for CountingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, _score: &S::Score) {
        self.best_solution_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_started(&self, _solution: &S) {
        self.solving_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {
        self.solving_ended_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_error(&self, _error: &SolverError) {
        self.solving_error_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for CountingEventListener {
    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for CountingEventListener {
    fn on_step_started(&self, _step_index: u64) {
        self.step_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_step_ended(&self, _step_index: u64, _score: &S::Score) {
        self.step_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Streams every new best solution into a tokio channel.
///
/// Sending never blocks; once the receiver is dropped, events are discarded.
pub struct ChannelEventListener<S: PlanningSolution> {
    sender: UnboundedSender<(S, S::Score)>,
}

impl<S: PlanningSolution> ChannelEventListener<S> {
    pub fn new(sender: UnboundedSender<(S, S::Score)>) -> Self {
        Self { sender }
    }
}

impl<S: PlanningSolution> Debug for ChannelEventListener<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelEventListener")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for ChannelEventListener<S> {
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score) {
        if self.sender.send((solution.clone(), *score)).is_err() {
            debug!(event = "best_solution_dropped", score = %score);
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
