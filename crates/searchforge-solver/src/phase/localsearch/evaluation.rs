//! Tentative evaluation of a single candidate move.

use searchforge_config::EnvironmentMode;
use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::Score;
use searchforge_core::{Result, SolverError};
use searchforge_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::{Move, UndoGuard};

/// Outcome of applying, scoring and undoing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation<Sc: Score> {
    /// Score of the working solution with the candidate applied.
    pub score: Sc,

    /// Fingerprint of the solution the candidate leads to, when requested.
    pub solution_key: Option<u64>,
}

/// Applies `candidate`, scores it and undoes it.
///
/// Returns `Ok(None)` for a move that is not doable. The working solution
/// is restored on every path, including errors. Assert modes verify the
/// tentative score and the undo against from-scratch calculations.
pub fn evaluate_move<S, D, M>(
    score_director: &mut D,
    candidate: &M,
    environment_mode: EnvironmentMode,
    with_solution_key: bool,
) -> Result<Option<Evaluation<S::Score>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    if !candidate.is_doable(&*score_director) {
        return Ok(None);
    }
    let before = environment_mode
        .is_asserted()
        .then(|| score_director.calculate_score());

    let evaluation = {
        let mut guard = UndoGuard::apply(score_director, candidate);
        let score = guard.calculate_score();
        if environment_mode.is_fully_asserted() {
            let recalculated = guard.score_director_mut().calculate_score_from_scratch();
            if recalculated != score {
                return Err(SolverError::ScoreCorruption {
                    expected: score.to_string(),
                    actual: recalculated.to_string(),
                    context: format!("after tentative move {candidate:?}"),
                });
            }
        }
        let solution_key = if with_solution_key {
            guard.score_director().working_solution().tabu_fingerprint()
        } else {
            None
        };
        Evaluation {
            score,
            solution_key,
        }
    };

    if let Some(before) = before {
        let after = score_director.calculate_score_from_scratch();
        if after != before {
            return Err(SolverError::UndoCorruption {
                before: before.to_string(),
                after: after.to_string(),
                move_repr: format!("{candidate:?}"),
            });
        }
    }

    trace!(event = "move", score = %evaluation.score);
    Ok(Some(evaluation))
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use searchforge_core::score::SimpleScore;
    use smallvec::smallvec;

    use super::*;
    use crate::heuristic::r#move::TabuKeys;
    use crate::test_utils::{
        create_nqueens_director, get_queen_row, queen_move, set_queen_row, NQueensDirector,
        NQueensSolution,
    };

    #[test]
    fn test_evaluation_restores_working_solution() {
        let mut director = create_nqueens_director(&[0, 0, 0, 0]);
        let evaluation = evaluate_move(
            &mut director,
            &queen_move(1, 2),
            EnvironmentMode::FullAssert,
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(evaluation.score, SimpleScore::of(-4));
        assert_eq!(
            evaluation.solution_key,
            NQueensSolution::with_rows(&[0, 2, 0, 0]).tabu_fingerprint()
        );
        assert_eq!(director.working_solution().rows(), vec![Some(0); 4]);
        assert_eq!(director.calculate_score(), SimpleScore::of(-6));
    }

    #[test]
    fn test_not_doable_move_is_skipped() {
        let mut director = create_nqueens_director(&[0, 1, 2, 3]);
        let evaluation = evaluate_move(
            &mut director,
            &queen_move(2, 2),
            EnvironmentMode::Reproducible,
            false,
        )
        .unwrap();
        assert_eq!(evaluation, None);
    }

    #[test]
    fn test_solution_key_only_when_requested() {
        let mut director = create_nqueens_director(&[0, 0, 0, 0]);
        let evaluation = evaluate_move(
            &mut director,
            &queen_move(0, 3),
            EnvironmentMode::Reproducible,
            false,
        )
        .unwrap()
        .unwrap();
        assert_eq!(evaluation.solution_key, None);
    }

    /// Sets a row but "undoes" to a fixed row, whatever was there before.
    #[derive(Clone)]
    struct LossyMove {
        entity: usize,
        row: usize,
    }

    impl fmt::Debug for LossyMove {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "LossyMove({} -> {})", self.entity, self.row)
        }
    }

    impl Move<NQueensSolution> for LossyMove {
        fn is_doable<D: ScoreDirector<NQueensSolution>>(&self, _: &D) -> bool {
            true
        }

        fn do_move<D: ScoreDirector<NQueensSolution>>(&self, score_director: &mut D) {
            score_director.before_variable_changed(0, self.entity, "row");
            set_queen_row(score_director.working_solution_mut(), self.entity, Some(self.row));
            score_director.after_variable_changed(0, self.entity, "row");
        }

        fn create_undo_move<D: ScoreDirector<NQueensSolution>>(&self, score_director: &D) -> Self {
            let current = get_queen_row(score_director.working_solution(), self.entity);
            LossyMove {
                entity: self.entity,
                row: current.map_or(0, |row| row + 1),
            }
        }

        fn tabu_entities(&self) -> TabuKeys {
            smallvec![self.entity as u64]
        }

        fn tabu_values(&self, _: &NQueensSolution) -> TabuKeys {
            smallvec![self.row as u64]
        }

        fn tabu_key(&self) -> u64 {
            self.entity as u64
        }
    }

    fn lossy(director: &mut NQueensDirector, mode: EnvironmentMode) -> Result<()> {
        evaluate_move(director, &LossyMove { entity: 0, row: 3 }, mode, false).map(|_| ())
    }

    #[test]
    fn test_fast_assert_detects_broken_undo() {
        let mut director = create_nqueens_director(&[0, 0, 0, 0]);
        let err = lossy(&mut director, EnvironmentMode::FastAssert).unwrap_err();
        assert!(matches!(err, SolverError::UndoCorruption { .. }));
        assert!(err.to_string().contains("LossyMove(0 -> 3)"));
    }

    #[test]
    fn test_broken_undo_passes_unnoticed_without_assertions() {
        let mut director = create_nqueens_director(&[0, 0, 0, 0]);
        assert!(lossy(&mut director, EnvironmentMode::Reproducible).is_ok());
    }
}
