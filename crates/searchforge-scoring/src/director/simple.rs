//! Simple score director with full recalculation.

use std::fmt::{self, Debug};

use searchforge_core::domain::PlanningSolution;

use super::traits::ScoreDirector;

/// A score director that recalculates the full score with a calculator closure.
///
/// The score is cached until the next variable notification or mutable
/// access to the working solution.
///
/// ```
/// use searchforge_core::{PlanningSolution, SimpleScore};
/// use searchforge_scoring::{ScoreDirector, SimpleScoreDirector};
///
/// #[derive(Clone)]
/// struct Sum { values: Vec<i64>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Sum {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// let solution = Sum { values: vec![1, -4], score: None };
/// let mut director = SimpleScoreDirector::new(solution, |s: &Sum| {
///     SimpleScore::of(s.values.iter().sum())
/// });
/// assert_eq!(director.calculate_score(), SimpleScore::of(-3));
/// ```
pub struct SimpleScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    score_calculator: C,
    score_dirty: bool,
    cached_score: Option<S::Score>,
    calculation_count: u64,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    /// Creates a new SimpleScoreDirector.
    pub fn new(solution: S, score_calculator: C) -> Self {
        SimpleScoreDirector {
            working_solution: solution,
            score_calculator,
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        }
    }

    /// Consumes the director and returns the working solution.
    pub fn into_working_solution(self) -> S {
        self.working_solution
    }

    fn mark_dirty(&mut self) {
        self.score_dirty = true;
    }

    fn recalculate(&mut self) -> S::Score {
        let score = (self.score_calculator)(&self.working_solution);
        self.calculation_count += 1;
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        score
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.mark_dirty();
        &mut self.working_solution
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }
        self.recalculate()
    }

    fn calculate_score_from_scratch(&mut self) -> S::Score {
        self.recalculate()
    }

    fn set_working_solution(&mut self, solution: S) {
        self.working_solution = solution;
        self.cached_score = None;
        self.mark_dirty();
    }

    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.mark_dirty();
    }

    fn after_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        // Already marked dirty in before_variable_changed
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }
}

impl<S: PlanningSolution + Debug, C> Debug for SimpleScoreDirector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleScoreDirector")
            .field("working_solution", &self.working_solution)
            .field("cached_score", &self.cached_score)
            .field("score_dirty", &self.score_dirty)
            .finish()
    }
}
