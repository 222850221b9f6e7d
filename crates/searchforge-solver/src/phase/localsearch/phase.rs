//! Local search phase implementation.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::ScoreDirector;
use tracing::{debug, info, warn};

use super::evaluation::{evaluate_move, Evaluation};
use super::parallel::{MoveThreads, ParallelEvaluator};
use super::{Acceptor, BestSolutionRecaller, LocalSearchForager};
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::phase::Phase;
use crate::scope::{MoveScope, PhaseScope, SolverScope, StepScope};
use crate::statistics::PhaseStatistics;
use crate::termination::{NeverTermination, Termination};

const LOCAL_SEARCH: &str = "LocalSearch";

/// Candidates handed to each move thread per dispatch. Termination and
/// quit-early are checked between dispatches, so this bounds the wasted work.
const MOVE_THREAD_BUFFER_SIZE: usize = 10;

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. Selects the step's candidate moves
/// 2. Applies, scores and undoes each doable candidate
/// 3. Asks the acceptor about it and hands the verdict to the forager
/// 4. Commits the forager's winner and lets the recaller snapshot a new best
///
/// The phase ends when a termination fires, the terminate-early flag is
/// raised, or a step has no accepted candidate.
///
/// [`Phase::solve`] runs the whole phase. Callers that want to observe or
/// drive single steps use [`start_phase`](Self::start_phase), then
/// [`decide_next_step`](Self::decide_next_step) and
/// [`do_step`](Self::do_step) until it returns `None`, then
/// [`end_phase`](Self::end_phase).
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `A` - The acceptor type
/// * `Fo` - The forager type
/// * `T` - The phase's own termination
pub struct LocalSearchPhase<S, M, MS, A, Fo, T = NeverTermination>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    Fo: LocalSearchForager<S::Score>,
{
    move_selector: MS,
    acceptor: A,
    forager: Fo,
    termination: T,
    recaller: BestSolutionRecaller,
    move_threads: Option<MoveThreads<S, M>>,
    evaluator: Option<ParallelEvaluator<S, M>>,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, MS, A, Fo> LocalSearchPhase<S, M, MS, A, Fo>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    Fo: LocalSearchForager<S::Score>,
{
    /// Creates a phase that runs until the solver stops it or it gets stuck.
    pub fn new(move_selector: MS, acceptor: A, forager: Fo) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            termination: NeverTermination,
            recaller: BestSolutionRecaller::new(),
            move_threads: None,
            evaluator: None,
            _phantom: PhantomData,
        }
    }
}

impl<S, M, MS, A, Fo, T> LocalSearchPhase<S, M, MS, A, Fo, T>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    Fo: LocalSearchForager<S::Score>,
{
    /// Replaces the phase's own termination.
    pub fn with_termination<T2>(self, termination: T2) -> LocalSearchPhase<S, M, MS, A, Fo, T2> {
        LocalSearchPhase {
            move_selector: self.move_selector,
            acceptor: self.acceptor,
            forager: self.forager,
            termination,
            recaller: self.recaller,
            move_threads: self.move_threads,
            evaluator: self.evaluator,
            _phantom: PhantomData,
        }
    }

    /// Evaluates candidates on worker threads.
    pub fn with_move_threads(mut self, move_threads: MoveThreads<S, M>) -> Self {
        self.move_threads = Some(move_threads);
        self
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    pub fn forager(&self) -> &Fo {
        &self.forager
    }

    pub fn termination(&self) -> &T {
        &self.termination
    }

    fn is_terminated<D>(
        &self,
        solver_scope: &SolverScope<S, D>,
        solver_termination: &dyn Termination<S, D>,
    ) -> bool
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        solver_scope.is_terminate_early()
            || solver_termination.is_solver_terminated(solver_scope)
            || self.termination.is_phase_terminated(solver_scope)
    }

    /// Move thread pool of the running phase, if any.
    pub fn evaluator(&self) -> Option<&ParallelEvaluator<S, M>> {
        self.evaluator.as_ref()
    }

    /// Prepares the phase and its components for the first step.
    ///
    /// Fails with a configuration error before any step runs.
    pub fn start_phase<D>(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<PhaseScope<S, M>>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        let phase_index = solver_scope.next_phase_index();

        self.recaller.phase_started(solver_scope);
        self.termination.phase_started(solver_scope);
        let starting_score = solver_scope.calculate_score();
        let best_score = solver_scope
            .best_score()
            .copied()
            .unwrap_or(starting_score);
        let phase_scope: PhaseScope<S, M> = PhaseScope::new(
            phase_index,
            starting_score,
            best_score,
            solver_scope.score_director().entity_count(),
            solver_scope.score_director().value_count(),
        );
        self.acceptor.phase_started(&phase_scope)?;
        self.forager.phase_started()?;

        solver_scope.events().fire_phase_started(phase_index, LOCAL_SEARCH);
        info!(
            event = "phase_start",
            phase = LOCAL_SEARCH,
            phase_index = phase_index,
            score = %starting_score,
        );

        if let Some(move_threads) = &self.move_threads {
            self.evaluator = Some(move_threads.start(
                solver_scope.working_solution(),
                solver_scope.environment_mode(),
                self.acceptor.needs_solution_key(),
            )?);
        }
        Ok(phase_scope)
    }

    /// Evaluates the candidates of one step and returns the step with its
    /// winning move, not yet committed.
    ///
    /// Returns `None` when the phase is over: a termination fired before or
    /// during the step, or no candidate was accepted.
    pub fn decide_next_step<D>(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_scope: &mut PhaseScope<S, M>,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<Option<StepScope<S, M>>>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        if self.is_terminated(solver_scope, solver_termination) {
            return Ok(None);
        }
        let environment_mode = solver_scope.environment_mode();
        let with_solution_key = self.acceptor.needs_solution_key();

        let step_index = phase_scope.next_step_index();
        let time_gradient = solver_termination
            .calculate_solver_time_gradient(solver_scope)
            .max(self.termination.calculate_phase_time_gradient(solver_scope));
        let mut step_scope = StepScope::new(step_index, time_gradient);
        self.acceptor.step_started(phase_scope, &step_scope);
        self.forager
            .step_started(phase_scope.last_step_score(), phase_scope.best_score());
        solver_scope.events().fire_step_started(step_index);

        let mut candidates = {
            let (director, rng) = solver_scope.director_and_rng();
            self.move_selector.select_moves(&*director, rng)
        };
        let chunk_size = self
            .evaluator
            .as_ref()
            .map_or(0, |evaluator| evaluator.thread_count() * MOVE_THREAD_BUFFER_SIZE);
        // evaluations of candidates[chunk_start..]
        let mut chunk: Vec<Option<Evaluation<S::Score>>> = Vec::new();
        let mut chunk_start = 0;

        for (move_index, candidate) in candidates.iter().enumerate() {
            let evaluation = match self.evaluator.as_mut() {
                Some(evaluator) => {
                    if move_index >= chunk_start + chunk.len() {
                        let chunk_end = (move_index + chunk_size).min(candidates.len());
                        chunk = evaluator.evaluate(&candidates[move_index..chunk_end])?;
                        chunk_start = move_index;
                    }
                    chunk[move_index - chunk_start]
                }
                None => evaluate_move(
                    solver_scope.score_director_mut(),
                    candidate,
                    environment_mode,
                    with_solution_key,
                )?,
            };
            let Some(evaluation) = evaluation else {
                continue;
            };

            let accepted = {
                let (solution, rng) = solver_scope.solution_and_rng();
                let mut move_scope = MoveScope::new(
                    phase_scope,
                    &step_scope,
                    move_index,
                    candidate,
                    evaluation.score,
                    solution,
                    rng,
                )
                .with_solution_key(evaluation.solution_key);
                self.acceptor.is_accepted(&mut move_scope)
            };
            self.forager
                .add_move_index(move_index, evaluation.score, accepted);
            step_scope.record_move(accepted);
            phase_scope.record_move(accepted);

            if self.forager.is_quit_early() {
                break;
            }
            if self.is_terminated(solver_scope, solver_termination) {
                debug!(
                    event = "step_interrupted",
                    step = step_index,
                    evaluated = step_scope.selected_move_count(),
                );
                return Ok(None);
            }
        }

        let Some((move_index, step_score)) = self.forager.pick_move_index(solver_scope.rng())
        else {
            debug!(
                event = "no_accepted_move",
                step = step_index,
                evaluated = step_scope.selected_move_count(),
                max_unaccepted = ?self.forager.max_unaccepted_score(),
            );
            return Ok(None);
        };
        step_scope.set_chosen_move(candidates.swap_remove(move_index), step_score);
        Ok(Some(step_scope))
    }

    /// Commits the step's chosen move and retires the step.
    pub fn do_step<D>(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_scope: &mut PhaseScope<S, M>,
        mut step_scope: StepScope<S, M>,
    ) -> Result<()>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        let step_index = step_scope.step_index();
        let (Some(step_move), Some(step_score)) =
            (step_scope.chosen_move().cloned(), step_scope.score())
        else {
            return Err(SolverError::InvalidState(format!(
                "step {step_index} has no chosen move"
            )));
        };

        let undo_move = step_move.create_undo_move(solver_scope.score_director());
        step_move.do_move(solver_scope.score_director_mut());
        if let Some(evaluator) = self.evaluator.as_mut() {
            evaluator.commit(&step_move)?;
        }
        if solver_scope.environment_mode().is_asserted() {
            let committed = solver_scope.score_director_mut().calculate_score_from_scratch();
            if committed != step_score {
                return Err(SolverError::ScoreCorruption {
                    expected: step_score.to_string(),
                    actual: committed.to_string(),
                    context: format!("after committing {step_move:?} in step {step_index}"),
                });
            }
        }

        step_scope.set_undo_move(undo_move);
        solver_scope.increment_step_count();
        self.recaller
            .step_ended(solver_scope, phase_scope, &mut step_scope)?;
        self.acceptor
            .step_ended(phase_scope, &step_scope, solver_scope.working_solution());
        self.termination.step_ended(solver_scope);
        solver_scope.events().fire_step_ended(step_index, &step_score);

        debug!(
            event = "step",
            step = step_index,
            score = %step_score,
            best = %phase_scope.best_score(),
            selected = step_scope.selected_move_count(),
            accepted = step_scope.accepted_move_count(),
            new_best = step_scope.best_score_improved(),
        );
        phase_scope.complete_step(step_scope);
        Ok(())
    }

    /// Stops the move threads and records the phase's statistics.
    pub fn end_phase<D>(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_scope: &PhaseScope<S, M>,
    ) -> Result<()>
    where
        D: ScoreDirector<S>,
    {
        if let Some(evaluator) = self.evaluator.take() {
            evaluator.shutdown()?;
        }
        self.acceptor.phase_ended(phase_scope);

        let phase_index = phase_scope.phase_index();
        let duration = phase_scope.elapsed();
        let mut statistics = PhaseStatistics::new(phase_index, LOCAL_SEARCH);
        statistics.duration = duration;
        statistics.step_count = phase_scope.step_count();
        statistics.moves_evaluated = phase_scope.moves_evaluated();
        statistics.moves_accepted = phase_scope.moves_accepted();
        statistics.starting_score = Some(phase_scope.starting_score());
        statistics.ending_score = Some(phase_scope.best_score());
        let speed = statistics.moves_per_second() as u64;
        solver_scope.record_phase_statistics(statistics);
        solver_scope.events().fire_phase_ended(phase_index, LOCAL_SEARCH);

        info!(
            event = "phase_end",
            phase = LOCAL_SEARCH,
            phase_index = phase_index,
            duration_ms = duration.as_millis() as u64,
            steps = phase_scope.step_count(),
            speed = speed,
            improvements = self.recaller.phase_improvement_count(),
            score = %phase_scope.best_score(),
        );
        Ok(())
    }

    fn run_steps<D>(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_scope: &mut PhaseScope<S, M>,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        while let Some(step_scope) =
            self.decide_next_step(solver_scope, phase_scope, solver_termination)?
        {
            self.do_step(solver_scope, phase_scope, step_scope)?;
        }
        Ok(())
    }
}

impl<S, M, MS, A, Fo, T> Debug for LocalSearchPhase<S, M, MS, A, Fo, T>
where
    S: PlanningSolution,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    Fo: LocalSearchForager<S::Score>,
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("termination", &self.termination)
            .field("move_threads", &self.move_threads)
            .finish()
    }
}

impl<S, D, M, MS, A, Fo, T> Phase<S, D> for LocalSearchPhase<S, M, MS, A, Fo, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    Fo: LocalSearchForager<S::Score>,
    T: Termination<S, D>,
{
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()> {
        let mut phase_scope = self.start_phase(solver_scope)?;
        if let Err(err) = self.run_steps(solver_scope, &mut phase_scope, solver_termination) {
            if let Some(evaluator) = self.evaluator.take() {
                if let Err(shutdown_err) = evaluator.shutdown() {
                    warn!(event = "move_threads_shutdown_failed", error = %shutdown_err);
                }
            }
            return Err(err);
        }
        self.end_phase(solver_scope, &phase_scope)
    }

    fn phase_type_name(&self) -> &'static str {
        LOCAL_SEARCH
    }
}
