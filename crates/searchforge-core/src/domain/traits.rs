//! Core domain traits

use crate::score::Score;

/// Trait for planning solutions.
///
/// A planning solution holds both the problem definition and the current
/// assignment of its planning variables, plus the score of that assignment.
///
/// # Example
///
/// ```
/// use searchforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct NQueens {
///     rows: Vec<usize>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
///
///     fn entity_count(&self) -> usize {
///         self.rows.len()
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Planning solutions must be `Send + Sync` so move evaluation workers can
/// each own a fork of the working solution.
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);

    /// Number of planning entities, used by ratio-based tabu sizes.
    fn entity_count(&self) -> usize {
        0
    }

    /// Number of distinct planning values, used by ratio-based tabu sizes.
    fn value_count(&self) -> usize {
        0
    }

    /// Structural hash of the planning variables.
    ///
    /// Solution tabu uses it to recognize revisited solutions. When `None`,
    /// solutions are told apart by their score only.
    fn tabu_fingerprint(&self) -> Option<u64> {
        None
    }
}
