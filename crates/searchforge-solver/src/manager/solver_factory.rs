//! SolverFactory for configuration-driven solvers.

use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;

use searchforge_config::{LocalSearchConfig, PhaseConfig, SolverConfig};
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::ParseableScore;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::DirectorFactory;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::SolverJob;
use crate::builder::{AcceptorBuilder, ForagerBuilder, TerminationBuilder};
use crate::event::ChannelEventListener;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::phase::localsearch::{LocalSearchPhase, MoveThreads};
use crate::phase::Phase;
use crate::solver::{SolveResult, Solver};
use crate::termination::OrTermination;

/// Builds solvers from a [`SolverConfig`].
///
/// Every solve gets fresh phases, so acceptor and forager state never
/// leaks between runs. Moves come from `move_selector_factory`; directors,
/// including the private ones of move evaluation workers, come from the
/// director factory.
///
/// # Type Parameters
/// * `S` - The solution type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `F` - The score director factory type
pub struct SolverFactory<S, M, MS, F>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    F: DirectorFactory<S>,
{
    config: SolverConfig,
    move_selector_factory: Box<dyn Fn() -> MS + Send + Sync>,
    director_factory: Arc<F>,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, MS, F> SolverFactory<S, M, MS, F>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    M: Move<S>,
    MS: MoveSelector<S, M> + 'static,
    F: DirectorFactory<S> + 'static,
{
    /// Creates a factory, rejecting configurations that cannot build a solver.
    ///
    /// Without phase configurations the solver runs one late acceptance
    /// phase.
    pub fn from_config<MF>(
        config: &SolverConfig,
        move_selector_factory: MF,
        director_factory: F,
    ) -> Result<Self>
    where
        MF: Fn() -> MS + Send + Sync + 'static,
    {
        config
            .validate()
            .map_err(|err| SolverError::config("solver_config", err.to_string()))?;
        let factory = Self {
            config: config.clone(),
            move_selector_factory: Box::new(move_selector_factory),
            director_factory: Arc::new(director_factory),
            _phantom: PhantomData,
        };

        let solver = factory.build_solver()?;
        let move_threads = factory.move_thread_count();
        info!(
            event = "solver_factory_ready",
            phases = solver.phase_count(),
            move_threads,
            environment_mode = ?config.environment_mode,
        );
        if config.termination.as_ref().map_or(true, |t| t.is_empty()) {
            for (phase_index, phase_config) in factory.phase_configs().iter().enumerate() {
                let PhaseConfig::LocalSearch(local_search) = phase_config;
                if local_search.termination.as_ref().map_or(true, |t| t.is_empty()) {
                    warn!(event = "unbounded_phase", phase_index);
                }
            }
        }
        Ok(factory)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Worker count for move evaluation; zero evaluates on the solver thread.
    pub fn move_thread_count(&self) -> usize {
        let available = thread::available_parallelism().map_or(1, |n| n.get());
        self.config.move_thread_count.resolve(available)
    }

    /// Builds a solver with fresh phases.
    pub fn build_solver(&self) -> Result<Solver<S, F::Director>> {
        let mut solver = Solver::new()
            .with_environment_mode(self.config.environment_mode)
            .with_random_type(self.config.random_type);
        if let Some(seed) = self.config.random_seed {
            solver = solver.with_random_seed(seed);
        }
        if let Some(termination) =
            TerminationBuilder::build_optional::<S, F::Director>(self.config.termination.as_ref())?
        {
            solver = solver.with_termination(termination);
        }
        for phase_config in &self.phase_configs() {
            let PhaseConfig::LocalSearch(local_search) = phase_config;
            solver = solver.with_boxed_phase(self.build_local_search(local_search)?);
        }
        Ok(solver)
    }

    /// Solves `solution` on the calling thread.
    pub fn solve(&self, solution: S) -> Result<SolveResult<S>> {
        let mut solver = self.build_solver()?;
        solver.solve(self.director_factory.build_score_director(solution))
    }

    /// Solves `solution` on a dedicated thread.
    ///
    /// Every new best solution is sent over the job's channel as soon as it
    /// is found.
    pub fn solve_async(&self, solution: S) -> Result<SolverJob<S>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut solver = self
            .build_solver()?
            .with_solver_listener(Arc::new(ChannelEventListener::new(sender)));
        let terminate_early = solver.terminate_early_handle();
        let director = self.director_factory.build_score_director(solution);

        let handle = thread::Builder::new()
            .name("searchforge-solver".to_string())
            .spawn(move || solver.solve(director))
            .map_err(|err| SolverError::WorkerFailed(format!("cannot spawn solver thread: {err}")))?;
        Ok(SolverJob::new(handle, receiver, terminate_early))
    }

    fn phase_configs(&self) -> Vec<PhaseConfig> {
        if self.config.phases.is_empty() {
            vec![PhaseConfig::LocalSearch(LocalSearchConfig::default())]
        } else {
            self.config.phases.clone()
        }
    }

    fn build_local_search(
        &self,
        config: &LocalSearchConfig,
    ) -> Result<Box<dyn Phase<S, F::Director>>> {
        let acceptor = AcceptorBuilder::for_phase::<S, M>(config)?;
        let forager = ForagerBuilder::for_phase::<S::Score>(config)?;
        let termination = match &config.termination {
            Some(termination) => TerminationBuilder::build::<S, F::Director>(termination)?,
            None => OrTermination::new(Vec::new()),
        };

        let mut phase = LocalSearchPhase::<S, M, MS, _, _>::new(
            (self.move_selector_factory)(),
            acceptor,
            forager,
        )
        .with_termination(termination);
        let thread_count = self.move_thread_count();
        if thread_count > 0 {
            phase = phase.with_move_threads(MoveThreads::new(
                Arc::clone(&self.director_factory),
                thread_count,
                self.config.move_thread_grace(),
            ));
        }
        Ok(Box::new(phase))
    }
}

impl<S, M, MS, F> std::fmt::Debug for SolverFactory<S, M, MS, F>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    F: DirectorFactory<S>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverFactory")
            .field("config", &self.config)
            .finish()
    }
}
