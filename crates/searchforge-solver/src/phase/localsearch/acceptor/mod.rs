//! Acceptors for local search phases.
//!
//! Acceptors decide which candidate moves may become the next step. Every
//! acceptor lets a move through whose score is at least the last step score;
//! the variants differ in which worsening moves they also tolerate. The one
//! opt-out is late acceptance with hill climbing switched off, which judges
//! every candidate by the late score alone.

mod composite;
mod great_deluge;
mod hill_climbing;
mod late_acceptance;
mod late_simulated_annealing;
mod simulated_annealing;
mod step_counting;
mod tabu;


use std::fmt::Debug;

use searchforge_core::domain::PlanningSolution;
use searchforge_core::Result;

use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, PhaseScope, StepScope};

pub use composite::CompositeAcceptor;
pub use great_deluge::GreatDelugeAcceptor;
pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use late_simulated_annealing::LateSimulatedAnnealingAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use step_counting::StepCountingHillClimbingAcceptor;
pub use tabu::{TabuAcceptor, TabuScope, TabuSizeStrategy};

/// Trait for accepting or rejecting candidate moves in local search.
///
/// Lifecycle hooks run in this order for a phase:
/// `phase_started`, then per step `step_started`, any number of
/// `is_accepted`, `step_ended`, and finally `phase_ended`.
///
/// `step_ended` runs after the chosen move is committed but before the
/// phase retires the step, so [`PhaseScope::last_step_score`] still
/// returns the previous step's score there.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait Acceptor<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Validates the configuration and resets per-phase state.
    fn phase_started(&mut self, _phase_scope: &PhaseScope<S, M>) -> Result<()> {
        Ok(())
    }

    fn step_started(&mut self, _phase_scope: &PhaseScope<S, M>, _step_scope: &StepScope<S, M>) {}

    /// Returns true if the candidate may be chosen as the next step.
    ///
    /// Must not change the acceptor's state; randomness comes from the
    /// move scope's random source.
    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool;

    /// Records the committed step. `solution` is the working solution after it.
    fn step_ended(
        &mut self,
        _phase_scope: &PhaseScope<S, M>,
        _step_scope: &StepScope<S, M>,
        _solution: &S,
    ) {
    }

    fn phase_ended(&mut self, _phase_scope: &PhaseScope<S, M>) {}

    /// Returns true if candidates must carry the key of the solution they lead to.
    fn needs_solution_key(&self) -> bool {
        false
    }
}

impl<S, M, A> Acceptor<S, M> for Box<A>
where
    S: PlanningSolution,
    M: Move<S>,
    A: Acceptor<S, M> + ?Sized,
{
    fn phase_started(&mut self, phase_scope: &PhaseScope<S, M>) -> Result<()> {
        (**self).phase_started(phase_scope)
    }

    fn step_started(&mut self, phase_scope: &PhaseScope<S, M>, step_scope: &StepScope<S, M>) {
        (**self).step_started(phase_scope, step_scope)
    }

    fn is_accepted(&self, move_scope: &mut MoveScope<'_, S, M>) -> bool {
        (**self).is_accepted(move_scope)
    }

    fn step_ended(
        &mut self,
        phase_scope: &PhaseScope<S, M>,
        step_scope: &StepScope<S, M>,
        solution: &S,
    ) {
        (**self).step_ended(phase_scope, step_scope, solution)
    }

    fn phase_ended(&mut self, phase_scope: &PhaseScope<S, M>) {
        (**self).phase_ended(phase_scope)
    }

    fn needs_solution_key(&self) -> bool {
        (**self).needs_solution_key()
    }
}
