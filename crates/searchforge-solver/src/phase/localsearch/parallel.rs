//! Move evaluation on worker threads.
//!
//! Every worker owns a private fork of the working solution inside its own
//! score director. The decision thread hands out candidates round-robin,
//! gathers the scores over one fan-in channel and reorders them by
//! candidate index, so what the acceptor and forager see never depends on
//! which worker finished first. Committed moves are broadcast to every
//! worker to keep the forks in step with the working solution.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, select, Receiver, RecvTimeoutError, Sender};
use searchforge_config::EnvironmentMode;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::{DirectorFactory, ScoreDirector};
use tracing::{debug, warn};

use super::evaluation::{evaluate_move, Evaluation};
use crate::heuristic::r#move::Move;

enum WorkerMessage<M> {
    Evaluate { move_index: usize, candidate: M },
    Commit(M),
    Stop,
}

type Reply<Sc> = (usize, Result<Option<Evaluation<Sc>>>);

type Spawner<S, M> =
    dyn Fn(&S, EnvironmentMode, bool) -> Result<ParallelEvaluator<S, M>> + Send + Sync;

/// Settings for evaluating moves on worker threads.
///
/// Holds the director factory used to fork the working solution once per
/// worker when a phase starts.
pub struct MoveThreads<S: PlanningSolution, M: Move<S>> {
    thread_count: usize,
    grace: Duration,
    spawner: Arc<Spawner<S, M>>,
}

impl<S: PlanningSolution, M: Move<S>> MoveThreads<S, M> {
    pub fn new<F>(factory: F, thread_count: usize, grace: Duration) -> Self
    where
        F: DirectorFactory<S> + 'static,
    {
        let factory = Arc::new(factory);
        let spawner: Arc<Spawner<S, M>> =
            Arc::new(move |solution: &S, mode: EnvironmentMode, with_solution_key: bool| {
                ParallelEvaluator::spawn(
                    &*factory,
                    solution,
                    thread_count,
                    grace,
                    mode,
                    with_solution_key,
                )
            });
        Self {
            thread_count,
            grace,
            spawner,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Starts the workers, each on its own clone of `solution`.
    pub fn start(
        &self,
        solution: &S,
        environment_mode: EnvironmentMode,
        with_solution_key: bool,
    ) -> Result<ParallelEvaluator<S, M>> {
        (self.spawner)(solution, environment_mode, with_solution_key)
    }
}

impl<S: PlanningSolution, M: Move<S>> fmt::Debug for MoveThreads<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveThreads")
            .field("thread_count", &self.thread_count)
            .field("grace", &self.grace)
            .finish()
    }
}

struct Worker<M> {
    sender: Sender<WorkerMessage<M>>,
    handle: Option<JoinHandle<()>>,
}

/// Running pool of move evaluation workers.
///
/// Must be shut down with [`shutdown`](ParallelEvaluator::shutdown); a
/// pool dropped without it still asks its workers to stop but does not
/// wait for them.
pub struct ParallelEvaluator<S: PlanningSolution, M: Move<S>> {
    workers: Vec<Worker<M>>,
    replies: Receiver<Reply<S::Score>>,
    stopped: Receiver<usize>,
    stopped_workers: usize,
    grace: Duration,
    is_shut_down: bool,
    dispatched_count: u64,
}

impl<S: PlanningSolution, M: Move<S>> ParallelEvaluator<S, M> {
    /// Spawns `thread_count` workers with directors built by `factory`.
    pub fn spawn<F>(
        factory: &F,
        solution: &S,
        thread_count: usize,
        grace: Duration,
        environment_mode: EnvironmentMode,
        with_solution_key: bool,
    ) -> Result<Self>
    where
        F: DirectorFactory<S>,
    {
        if thread_count == 0 {
            return Err(SolverError::config(
                "move_thread_count",
                "must be at least 1 to evaluate moves in parallel",
            ));
        }
        let (reply_sender, replies) = channel::unbounded();
        let (stopped_sender, stopped) = channel::unbounded();
        let mut workers = Vec::with_capacity(thread_count);

        for worker_index in 0..thread_count {
            let (sender, inbox) = channel::unbounded();
            let director = factory.build_score_director(solution.clone());
            let reply_sender = reply_sender.clone();
            let stopped_sender = stopped_sender.clone();
            let handle = thread::Builder::new()
                .name(format!("searchforge-move-{worker_index}"))
                .spawn(move || {
                    let _stopped = StoppedSignal {
                        worker_index,
                        sender: stopped_sender,
                    };
                    worker_loop::<S, _, M>(
                        worker_index,
                        director,
                        inbox,
                        reply_sender,
                        environment_mode,
                        with_solution_key,
                    );
                })
                .map_err(|err| {
                    SolverError::WorkerFailed(format!(
                        "could not spawn move thread {worker_index}: {err}"
                    ))
                })?;
            workers.push(Worker {
                sender,
                handle: Some(handle),
            });
        }

        debug!(event = "move_threads_started", threads = thread_count);
        Ok(Self {
            workers,
            replies,
            stopped,
            stopped_workers: 0,
            grace,
            is_shut_down: false,
            dispatched_count: 0,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Candidates handed to the workers since the pool started.
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched_count
    }

    /// Evaluates every candidate and returns the outcomes in candidate order.
    pub fn evaluate(&mut self, candidates: &[M]) -> Result<Vec<Option<Evaluation<S::Score>>>> {
        self.dispatched_count += candidates.len() as u64;
        for (move_index, candidate) in candidates.iter().enumerate() {
            let worker = &self.workers[move_index % self.workers.len()];
            worker
                .sender
                .send(WorkerMessage::Evaluate {
                    move_index,
                    candidate: candidate.clone(),
                })
                .map_err(|_| {
                    SolverError::WorkerFailed(format!(
                        "move thread {} stopped accepting moves",
                        move_index % self.workers.len()
                    ))
                })?;
        }

        let mut outcomes = BTreeMap::new();
        while outcomes.len() < candidates.len() {
            let mut exited = None;
            select! {
                recv(self.replies) -> reply => {
                    let (move_index, outcome) = reply.map_err(|_| {
                        SolverError::WorkerFailed("every move thread hung up".to_string())
                    })?;
                    outcomes.insert(move_index, outcome?);
                }
                recv(self.stopped) -> worker_index => exited = Some(worker_index.ok()),
            }
            if let Some(worker_index) = exited {
                self.stopped_workers += 1;
                return Err(SolverError::WorkerFailed(match worker_index {
                    Some(index) => format!("move thread {index} exited during evaluation"),
                    None => "every move thread exited during evaluation".to_string(),
                }));
            }
        }
        Ok(outcomes.into_values().collect())
    }

    /// Applies a committed step move to every worker's fork.
    pub fn commit(&mut self, step_move: &M) -> Result<()> {
        for (worker_index, worker) in self.workers.iter().enumerate() {
            worker
                .sender
                .send(WorkerMessage::Commit(step_move.clone()))
                .map_err(|_| {
                    SolverError::WorkerFailed(format!(
                        "move thread {worker_index} stopped accepting moves"
                    ))
                })?;
        }
        Ok(())
    }

    /// Stops every worker and waits for them within the grace period.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop_and_wait()
    }

    fn stop_and_wait(&mut self) -> Result<()> {
        self.is_shut_down = true;
        for worker in &self.workers {
            // a worker that already exited has dropped its inbox
            let _ = worker.sender.send(WorkerMessage::Stop);
        }

        let deadline = Instant::now() + self.grace;
        for _ in self.stopped_workers..self.workers.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.stopped.recv_timeout(remaining) {
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    return Err(SolverError::WorkerShutdown { grace: self.grace });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut failures = Vec::new();
        for (worker_index, worker) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    failures.push(worker_index);
                }
            }
        }
        if !failures.is_empty() {
            return Err(SolverError::WorkerFailed(format!(
                "move threads {failures:?} panicked"
            )));
        }
        debug!(event = "move_threads_stopped", threads = self.workers.len());
        Ok(())
    }
}

impl<S: PlanningSolution, M: Move<S>> Drop for ParallelEvaluator<S, M> {
    fn drop(&mut self) {
        if !self.is_shut_down {
            warn!(event = "move_threads_dropped", threads = self.workers.len());
            self.is_shut_down = true;
            for worker in &self.workers {
                let _ = worker.sender.send(WorkerMessage::Stop);
            }
        }
    }
}

impl<S: PlanningSolution, M: Move<S>> fmt::Debug for ParallelEvaluator<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelEvaluator")
            .field("threads", &self.workers.len())
            .field("grace", &self.grace)
            .field("is_shut_down", &self.is_shut_down)
            .finish()
    }
}

/// Reports a worker as stopped when its thread exits, panics included.
struct StoppedSignal {
    worker_index: usize,
    sender: Sender<usize>,
}

impl Drop for StoppedSignal {
    fn drop(&mut self) {
        let _ = self.sender.send(self.worker_index);
    }
}

fn worker_loop<S, D, M>(
    worker_index: usize,
    mut director: D,
    inbox: Receiver<WorkerMessage<M>>,
    replies: Sender<Reply<S::Score>>,
    environment_mode: EnvironmentMode,
    with_solution_key: bool,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    while let Ok(message) = inbox.recv() {
        match message {
            WorkerMessage::Evaluate {
                move_index,
                candidate,
            } => {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    evaluate_move(&mut director, &candidate, environment_mode, with_solution_key)
                }))
                .unwrap_or_else(|_| {
                    Err(SolverError::WorkerFailed(format!(
                        "move thread {worker_index} panicked evaluating {candidate:?}"
                    )))
                });
                let failed = outcome.is_err();
                if replies.send((move_index, outcome)).is_err() || failed {
                    return;
                }
            }
            WorkerMessage::Commit(step_move) => step_move.do_move(&mut director),
            WorkerMessage::Stop => return,
        }
    }
}
