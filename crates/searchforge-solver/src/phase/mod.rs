//! Solver phases.
//!
//! Phases run one after another on the same working solution. The only
//! phase kind is local search, which improves the solution one committed
//! move at a time.

pub mod localsearch;

use std::fmt::Debug;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::Result;
use searchforge_scoring::ScoreDirector;

use crate::scope::SolverScope;
use crate::termination::Termination;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver. Each phase has its own
/// strategy for exploring the solution space.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Executes this phase.
    ///
    /// The phase modifies the working solution in the solver scope and
    /// stops once `solver_termination` or its own stop condition fires.
    /// Configuration errors are returned before the first step.
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

impl<S, D, P> Phase<S, D> for Box<P>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    P: Phase<S, D> + ?Sized,
{
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()> {
        (**self).solve(solver_scope, solver_termination)
    }

    fn phase_type_name(&self) -> &'static str {
        (**self).phase_type_name()
    }
}
