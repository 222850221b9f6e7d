//! Handle to a solve running on its own thread.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::{Result, SolverError};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::solver::SolveResult;

/// Status of a solving job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Not currently solving.
    NotSolving,
    /// Actively solving.
    Solving,
}

impl SolverStatus {
    /// Returns the status as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::NotSolving => "NOT_SOLVING",
            SolverStatus::Solving => "SOLVING",
        }
    }
}

/// A solve started by [`SolverFactory::solve_async`](super::SolverFactory::solve_async).
///
/// New best solutions arrive in discovery order. Dropping the job asks the
/// solver to stop but does not wait for it.
pub struct SolverJob<S: PlanningSolution> {
    handle: Option<JoinHandle<Result<SolveResult<S>>>>,
    best_solutions: UnboundedReceiver<(S, S::Score)>,
    terminate_early: Arc<AtomicBool>,
}

impl<S: PlanningSolution> SolverJob<S> {
    pub(crate) fn new(
        handle: JoinHandle<Result<SolveResult<S>>>,
        best_solutions: UnboundedReceiver<(S, S::Score)>,
        terminate_early: Arc<AtomicBool>,
    ) -> Self {
        Self {
            handle: Some(handle),
            best_solutions,
            terminate_early,
        }
    }

    pub fn status(&self) -> SolverStatus {
        match &self.handle {
            Some(handle) if !handle.is_finished() => SolverStatus::Solving,
            _ => SolverStatus::NotSolving,
        }
    }

    /// Asks the solver to stop after the move it is evaluating.
    pub fn terminate_early(&self) {
        self.terminate_early.store(true, Ordering::SeqCst);
    }

    /// Receiver of every new best solution and its score.
    ///
    /// Await it inside an async runtime, or call `blocking_recv` outside one.
    pub fn best_solutions(&mut self) -> &mut UnboundedReceiver<(S, S::Score)> {
        &mut self.best_solutions
    }

    /// The next best solution already found, without waiting.
    pub fn try_next_best(&mut self) -> Option<(S, S::Score)> {
        match self.best_solutions.try_recv() {
            Ok(best) => Some(best),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits for the solve to finish.
    pub fn join(mut self) -> Result<SolveResult<S>> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| SolverError::InvalidState("solver job already joined".to_string()))?;
        handle
            .join()
            .map_err(|panic| SolverError::WorkerFailed(panic_message(panic.as_ref())))?
    }
}

impl<S: PlanningSolution> Drop for SolverJob<S> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.terminate_early();
        }
    }
}

impl<S: PlanningSolution> fmt::Debug for SolverJob<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverJob")
            .field("status", &self.status())
            .field("terminate_early", &self.terminate_early.load(Ordering::SeqCst))
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("solver thread panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("solver thread panicked: {message}")
    } else {
        "solver thread panicked".to_string()
    }
}
