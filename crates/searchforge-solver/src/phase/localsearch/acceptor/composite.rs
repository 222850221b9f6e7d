//! Composite acceptor.

use std::fmt;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::Result;

use super::Acceptor;
use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

/// Accepts a move only if every child acceptor accepts it.
///
/// Lifecycle hooks are forwarded to every child, in order. Evaluation stops
/// at the first rejection, so later children draw no random numbers for
/// that move.
pub struct CompositeAcceptor<S: PlanningSolution, M: Move<S>> {
    acceptors: Vec<Box<dyn Acceptor<S, M>>>,
}

impl<S: PlanningSolution, M: Move<S>> CompositeAcceptor<S, M> {
    pub fn new(acceptors: Vec<Box<dyn Acceptor<S, M>>>) -> Self {
        Self { acceptors }
    }

    pub fn len(&self) -> usize {
        self.acceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acceptors.is_empty()
    }
}

impl<S: PlanningSolution, M: Move<S>> fmt::Debug for CompositeAcceptor<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeAcceptor")
            .field("acceptors", &self.acceptors)
            .finish()
    }
}

impl<S: PlanningSolution, M: Move<S>> Acceptor<S, M> for CompositeAcceptor<S, M> {
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        for acceptor in &mut self.acceptors {
            acceptor.phase_started(phase_scope)?;
        }
        Ok(())
    }

    fn step_started(&mut self, phase_scope: &PhaseScope<S, M>, step_scope: &StepScope<S, M>) {
        for acceptor in &mut self.acceptors {
            acceptor.step_started(phase_scope, step_scope);
        }
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        self.acceptors
            .iter()
            .all(|acceptor| acceptor.is_accepted(move_scope))
    }

    fn step_ended(
        &mut self,
        phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        solution: &S,
    ) {
        for acceptor in &mut self.acceptors {
            acceptor.step_ended(phase_scope, step_scope, solution);
        }
    }

    fn phase_ended(&mut self, phase_scope: &PhaseScope<S, M>) {
        for acceptor in &mut self.acceptors {
            acceptor.phase_ended(phase_scope);
        }
    }

    fn needs_solution_key(&self) -> bool {
        self.acceptors.iter().any(|acceptor| acceptor.needs_solution_key())
    }
}
