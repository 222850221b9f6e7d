//! Hill climbing acceptor.

use searchforge_core::domain::PlanningSolution;

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::MoveScope;

/// Hill climbing acceptor - accepts moves that do not worsen the last step score.
///
/// Equal moves are accepted so the search can walk across plateaus. It has
/// no memory and gets stuck in local optima.
///
/// # Example
///
/// ```
/// use searchforge_solver::phase::localsearch::HillClimbingAcceptor;
///
/// let acceptor = HillClimbingAcceptor::new();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution, M: Move<S>> Acceptor<S, M> for HillClimbingAcceptor {
    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        move_scope.score() >= move_scope.last_step_score()
    }
}
