//! Score director factories.
//!
//! Every move evaluation worker owns a private director built from a fork
//! of the working solution, so factories must be shareable across threads.

use std::marker::PhantomData;
use std::sync::Arc;

use searchforge_core::domain::PlanningSolution;

use super::simple::SimpleScoreDirector;
use super::traits::ScoreDirector;

/// Builds independent score directors for a solution.
pub trait DirectorFactory<S: PlanningSolution>: Send + Sync {
    /// The director type produced for each solution.
    type Director: ScoreDirector<S> + 'static;

    /// Creates a new director owning `solution`.
    fn build_score_director(&self, solution: S) -> Self::Director;
}

impl<S, F> DirectorFactory<S> for Arc<F>
where
    S: PlanningSolution,
    F: DirectorFactory<S> + ?Sized,
{
    type Director = F::Director;

    fn build_score_director(&self, solution: S) -> Self::Director {
        (**self).build_score_director(solution)
    }
}

/// Factory for [`SimpleScoreDirector`]s sharing one calculator.
///
/// The calculator is stored as a concrete generic type parameter and cloned
/// into every director it builds.
pub struct ScoreDirectorFactory<S: PlanningSolution, C> {
    score_calculator: C,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, C> ScoreDirectorFactory<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Clone + Send + Sync + 'static,
{
    /// Creates a new ScoreDirectorFactory.
    pub fn new(score_calculator: C) -> Self {
        Self {
            score_calculator,
            _phantom: PhantomData,
        }
    }
}

impl<S, C> DirectorFactory<S> for ScoreDirectorFactory<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Clone + Send + Sync + 'static,
{
    type Director = SimpleScoreDirector<S, C>;

    fn build_score_director(&self, solution: S) -> Self::Director {
        SimpleScoreDirector::new(solution, self.score_calculator.clone())
    }
}

impl<S: PlanningSolution, C: Clone> Clone for ScoreDirectorFactory<S, C> {
    fn clone(&self) -> Self {
        Self {
            score_calculator: self.score_calculator.clone(),
            _phantom: PhantomData,
        }
    }
}
