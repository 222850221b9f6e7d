//! Solver implementation.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use searchforge_config::{EnvironmentMode, RandomType};
use searchforge_core::domain::PlanningSolution;
use searchforge_core::Result;
use searchforge_scoring::ScoreDirector;
use tracing::{error, info};

use crate::event::{
    PhaseLifecycleListener, SolverEventListener, SolverEventSupport, StepLifecycleListener,
};
use crate::phase::localsearch::BestSolutionRecaller;
use crate::phase::Phase;
use crate::scope::{build_rng, SolverScope};
use crate::statistics::SolverStatistics;
use crate::termination::{NeverTermination, Termination};

/// Outcome of a finished solve.
pub struct SolveResult<S: PlanningSolution> {
    /// The best solution found, carrying its score.
    pub solution: S,

    /// Score of `solution`.
    pub score: Option<S::Score>,

    /// True if solving was stopped through [`Solver::terminate_early`].
    pub terminated_early: bool,

    pub statistics: SolverStatistics<S::Score>,
}

impl<S: PlanningSolution> SolveResult<S> {
    pub fn duration(&self) -> Duration {
        self.statistics.total_duration
    }
}

impl<S: PlanningSolution> Debug for SolveResult<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveResult")
            .field("score", &self.score)
            .field("terminated_early", &self.terminated_early)
            .field("statistics", &self.statistics)
            .finish()
    }
}

/// The main solver that optimizes planning solutions.
///
/// Runs its phases in order on one working solution. The solver-level
/// termination is shared by every phase; each phase may add its own.
///
/// # Type Parameters
/// * `S` - Solution type
/// * `D` - Score director type
///
/// # Example
///
/// ```
/// use searchforge_config::PickEarlyType;
/// use searchforge_solver::phase::localsearch::{
///     AcceptedForager, HillClimbingAcceptor, LocalSearchPhase,
/// };
/// use searchforge_solver::termination::StepCountTermination;
/// use searchforge_solver::{ChangeMove, ChangeMoveSelector, Solver, ValueRange};
/// use searchforge_test::nqueens::{
///     create_nqueens_director, get_queen_row, queen_rows, set_queen_row, NQueensSolution,
/// };
///
/// let selector = ChangeMoveSelector::new(
///     get_queen_row,
///     set_queen_row,
///     0,
///     "row",
///     ValueRange::FromSolution(queen_rows),
/// );
/// let phase = LocalSearchPhase::<_, ChangeMove<NQueensSolution, usize>, _, _, _>::new(
///     selector,
///     HillClimbingAcceptor::new(),
///     AcceptedForager::new(1, PickEarlyType::Never),
/// );
///
/// let mut solver = Solver::new()
///     .with_phase(phase)
///     .with_termination(StepCountTermination::new(50))
///     .with_random_seed(7);
/// let result = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();
/// assert!(result.score.is_some());
/// ```
pub struct Solver<S: PlanningSolution, D: ScoreDirector<S>> {
    phases: Vec<Box<dyn Phase<S, D>>>,
    termination: Box<dyn Termination<S, D>>,
    events: SolverEventSupport<S>,
    environment_mode: EnvironmentMode,
    random_type: RandomType,
    random_seed: Option<u64>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Solver<S, D> {
    /// Creates a solver with no phases that never terminates on its own.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            termination: Box::new(NeverTermination),
            events: SolverEventSupport::new(),
            environment_mode: EnvironmentMode::default(),
            random_type: RandomType::default(),
            random_seed: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_phase<P: Phase<S, D> + 'static>(mut self, phase: P) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn with_boxed_phase(mut self, phase: Box<dyn Phase<S, D>>) -> Self {
        self.phases.push(phase);
        self
    }

    /// Sets the termination every phase obeys.
    pub fn with_termination<T: Termination<S, D> + 'static>(mut self, termination: T) -> Self {
        self.termination = Box::new(termination);
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_random_type(mut self, random_type: RandomType) -> Self {
        self.random_type = random_type;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_solver_listener(mut self, listener: Arc<dyn SolverEventListener<S>>) -> Self {
        self.events.add_solver_listener(listener);
        self
    }

    pub fn with_phase_listener(mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) -> Self {
        self.events.add_phase_listener(listener);
        self
    }

    pub fn with_step_listener(mut self, listener: Arc<dyn StepLifecycleListener<S>>) -> Self {
        self.events.add_step_listener(listener);
        self
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// Requests early termination of the solving process.
    ///
    /// Thread-safe. Returns false if the solver is not currently solving.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Returns true if the solver is currently solving.
    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// A handle that stops this solver from another thread.
    ///
    /// Raising it before `solve` starts stops the next solve before its
    /// first phase. The flag is cleared when a solve returns.
    pub fn terminate_early_handle(&self) -> Arc<AtomicBool> {
        self.terminate_early_flag.clone()
    }

    /// Solves starting from the director's working solution.
    ///
    /// On error, listeners get `solving_error` instead of `solving_ended`
    /// and the error is returned.
    pub fn solve(&mut self, score_director: D) -> Result<SolveResult<S>> {
        self.solving.store(true, Ordering::SeqCst);

        let mut solver_scope =
            SolverScope::with_rng(score_director, build_rng(self.random_type, self.random_seed))
                .with_environment_mode(self.environment_mode)
                .with_events(self.events.clone())
                .with_terminate_early_flag(self.terminate_early_flag.clone());

        let outcome = self.run_phases(&mut solver_scope);
        let terminated_early = solver_scope.is_terminate_early();
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        self.solving.store(false, Ordering::SeqCst);

        if let Err(err) = outcome {
            error!(event = "solve_error", error = %err);
            solver_scope.events().fire_solving_error(&err);
            return Err(err);
        }

        let (solution, score, statistics) = solver_scope.into_result();
        self.events.fire_solving_ended(&solution, terminated_early);
        info!(
            event = "solve_end",
            duration_ms = statistics.total_duration.as_millis() as u64,
            steps = statistics.total_step_count,
            moves = statistics.total_moves_evaluated,
            score_calculations = statistics.score_calculation_count,
            terminated_early = terminated_early,
            score = %DisplayScore(score),
        );
        Ok(SolveResult {
            solution,
            score,
            terminated_early,
            statistics,
        })
    }

    fn run_phases(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        solver_scope.start_solving();
        let starting_score = solver_scope.calculate_score();
        solver_scope
            .events()
            .fire_solving_started(solver_scope.working_solution());
        info!(
            event = "solve_start",
            phases = self.phases.len(),
            entity_count = solver_scope.score_director().entity_count() as u64,
            value_count = solver_scope.score_director().value_count() as u64,
            environment_mode = ?self.environment_mode,
            random_seed = ?self.random_seed,
            score = %starting_score,
        );

        BestSolutionRecaller::new().solving_started(solver_scope);
        for phase in self.phases.iter_mut() {
            if solver_scope.is_terminate_early()
                || self.termination.is_solver_terminated(solver_scope)
            {
                break;
            }
            phase.solve(solver_scope, &*self.termination)?;
        }
        Ok(())
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Default for Solver<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for Solver<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_type", &self.random_type)
            .field("random_seed", &self.random_seed)
            .finish()
    }
}

struct DisplayScore<Sc>(Option<Sc>);

impl<Sc: fmt::Display> fmt::Display for DisplayScore<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(score) => score.fmt(f),
            None => f.write_str("uninitialized"),
        }
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
