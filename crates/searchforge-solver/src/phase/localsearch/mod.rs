//! Local search phase
//!
//! Improves an existing solution by committing one move per step. The
//! acceptor filters the step's candidates, the forager picks the winner
//! among the accepted ones and the recaller keeps the best solution.

mod acceptor;
mod evaluation;
mod forager;
mod parallel;
mod phase;
mod recaller;

#[cfg(test)]
mod tests;

pub use acceptor::{
    Acceptor, CompositeAcceptor, GreatDelugeAcceptor, HillClimbingAcceptor,
    LateAcceptanceAcceptor, LateSimulatedAnnealingAcceptor, SimulatedAnnealingAcceptor,
    StepCountingHillClimbingAcceptor, TabuAcceptor, TabuScope, TabuSizeStrategy,
};
pub use evaluation::{evaluate_move, Evaluation};
pub use forager::{AcceptedForager, LocalSearchForager};
pub use parallel::{MoveThreads, ParallelEvaluator};
pub use phase::LocalSearchPhase;
pub use recaller::BestSolutionRecaller;
