//! Best solution recaller.

use searchforge_core::domain::PlanningSolution;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::ScoreDirector;
use tracing::info;

use crate::scope::{PhaseScope, SolverScope, StepScope};

/// Keeps the best solution record of the solver scope up to date.
///
/// The recaller is the only writer of the best solution. After every
/// committed step it compares the step score with the best score and, on a
/// strict improvement, snapshots the working solution.
#[derive(Debug, Clone, Default)]
pub struct BestSolutionRecaller {
    phase_improvement_count: u64,
}

impl BestSolutionRecaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// New best solutions found in the current phase.
    pub fn phase_improvement_count(&self) -> u64 {
        self.phase_improvement_count
    }

    /// Records the starting solution as best if nothing was recorded yet.
    pub fn solving_started<S, D>(&mut self, solver_scope: &mut SolverScope<S, D>)
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        if solver_scope.best_score().is_none() {
            record_working_solution(solver_scope, None);
        }
    }

    /// Makes sure the best record covers the solution the phase starts from.
    pub fn phase_started<S, D>(&mut self, solver_scope: &mut SolverScope<S, D>)
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        self.phase_improvement_count = 0;
        let working_score = solver_scope.calculate_score();
        let improved = solver_scope
            .best_score()
            .map_or(true, |best| working_score > *best);
        if improved {
            record_working_solution(solver_scope, None);
        }
    }

    /// Snapshots the working solution if the committed step beat the best score.
    ///
    /// Under full assertion the step score is first checked against a
    /// from-scratch calculation, so a corrupt score never becomes the best.
    pub fn step_ended<S, D, M>(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_scope: &mut PhaseScope<S, M>,
        step_scope: &mut StepScope<S, M>,
    ) -> Result<()>
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        let Some(step_score) = step_scope.score() else {
            return Ok(());
        };
        if step_score <= phase_scope.best_score() {
            return Ok(());
        }

        if solver_scope.environment_mode().is_fully_asserted() {
            let recalculated = solver_scope
                .score_director_mut()
                .calculate_score_from_scratch();
            if recalculated != step_score {
                return Err(SolverError::ScoreCorruption {
                    expected: step_score.to_string(),
                    actual: recalculated.to_string(),
                    context: format!("at new best solution of step {}", step_scope.step_index()),
                });
            }
        }

        let total_step_count = solver_scope.total_step_count();
        record_working_solution(solver_scope, Some(total_step_count));
        phase_scope.set_best_score(step_score, Some(step_scope.step_index()));
        step_scope.set_best_score_improved(true);
        self.phase_improvement_count += 1;

        info!(
            event = "new_best",
            phase_index = phase_scope.phase_index(),
            step = step_scope.step_index(),
            score = %step_score,
        );
        Ok(())
    }
}

fn record_working_solution<S, D>(solver_scope: &mut SolverScope<S, D>, step_count: Option<u64>)
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let score = solver_scope.calculate_score();
    let mut snapshot = solver_scope.score_director().clone_working_solution();
    snapshot.set_score(Some(score));
    solver_scope.events().fire_best_solution_changed(&snapshot, &score);
    solver_scope.set_best_solution(snapshot, score, step_count);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use searchforge_config::EnvironmentMode;
    use searchforge_core::score::SimpleScore;

    use super::*;
    use crate::event::{CountingEventListener, SolverEventSupport};
    use crate::heuristic::r#move::Move;
    use crate::test_utils::{
        create_nqueens_director, queen_move, NQueensDirector, NQueensSolution, QueenMove,
    };

    fn scope_with_listener(
        rows: &[usize],
    ) -> (SolverScope<NQueensSolution, NQueensDirector>, Arc<CountingEventListener>) {
        let listener = Arc::new(CountingEventListener::new());
        let mut events = SolverEventSupport::<NQueensSolution>::new();
        events.add_solver_listener(listener.clone());
        let mut scope =
            SolverScope::with_seed(create_nqueens_director(rows), 3).with_events(events);
        scope.start_solving();
        (scope, listener)
    }

    fn commit(
        solver_scope: &mut SolverScope<NQueensSolution, NQueensDirector>,
        step_index: u64,
        mv: QueenMove,
    ) -> StepScope<NQueensSolution, QueenMove> {
        mv.do_move(solver_scope.score_director_mut());
        let score = solver_scope.calculate_score();
        solver_scope.increment_step_count();
        let mut step = StepScope::new(step_index, 0.0);
        step.set_chosen_move(mv, score);
        step
    }

    #[test]
    fn test_solving_started_records_initial_solution() {
        let (mut scope, listener) = scope_with_listener(&[0, 0, 0, 0]);
        let mut recaller = BestSolutionRecaller::new();

        recaller.solving_started(&mut scope);
        assert_eq!(scope.best_score(), Some(&SimpleScore::of(-6)));
        assert_eq!(
            scope.best_solution().and_then(|s| s.score),
            Some(SimpleScore::of(-6))
        );
        assert_eq!(listener.best_solution_count(), 1);

        // a second start keeps the existing record
        recaller.solving_started(&mut scope);
        assert_eq!(listener.best_solution_count(), 1);
    }

    #[test]
    fn test_improving_step_updates_best() {
        let (mut scope, listener) = scope_with_listener(&[0, 0, 0, 0]);
        let mut recaller = BestSolutionRecaller::new();
        recaller.phase_started(&mut scope);
        let mut phase: PhaseScope<NQueensSolution, QueenMove> =
            PhaseScope::new(0, SimpleScore::of(-6), SimpleScore::of(-6), 4, 4);

        let mut step = commit(&mut scope, 0, queen_move(1, 2));
        recaller.step_ended(&mut scope, &mut phase, &mut step).unwrap();

        let improved = step.score().unwrap();
        assert!(improved > SimpleScore::of(-6));
        assert!(step.best_score_improved());
        assert_eq!(scope.best_score(), Some(&improved));
        assert_eq!(phase.best_score(), improved);
        assert_eq!(phase.best_solution_step_index(), Some(0));
        assert_eq!(scope.unimproved_step_count(), 0);
        assert_eq!(recaller.phase_improvement_count(), 1);
        assert_eq!(listener.best_solution_count(), 2);
    }

    #[test]
    fn test_equal_step_leaves_best_untouched() {
        let (mut scope, listener) = scope_with_listener(&[0, 2, 0, 2]);
        let mut recaller = BestSolutionRecaller::new();
        recaller.phase_started(&mut scope);
        let best = *scope.best_score().unwrap();
        let mut phase: PhaseScope<NQueensSolution, QueenMove> =
            PhaseScope::new(0, best, best, 4, 4);

        // moving a queen to the row it already occupies keeps the score
        let mut step = commit(&mut scope, 0, queen_move(0, 0));
        recaller.step_ended(&mut scope, &mut phase, &mut step).unwrap();

        assert!(!step.best_score_improved());
        assert_eq!(phase.best_solution_step_index(), None);
        assert_eq!(scope.unimproved_step_count(), 1);
        assert_eq!(listener.best_solution_count(), 1);
    }

    #[test]
    fn test_full_assert_verifies_new_best() {
        let (scope, _) = scope_with_listener(&[0, 0, 0, 0]);
        let mut scope = scope.with_environment_mode(EnvironmentMode::FullAssert);
        let mut recaller = BestSolutionRecaller::new();
        recaller.phase_started(&mut scope);
        let mut phase: PhaseScope<NQueensSolution, QueenMove> =
            PhaseScope::new(0, SimpleScore::of(-6), SimpleScore::of(-6), 4, 4);

        let mv = queen_move(1, 2);
        mv.do_move(scope.score_director_mut());
        let mut step = StepScope::new(0, 0.0);
        // claim a score the solution does not have
        step.set_chosen_move(mv, SimpleScore::of(0));

        let err = recaller
            .step_ended(&mut scope, &mut phase, &mut step)
            .unwrap_err();
        assert!(matches!(err, SolverError::ScoreCorruption { .. }));
        assert_eq!(scope.best_score(), Some(&SimpleScore::of(-6)));
    }
}
