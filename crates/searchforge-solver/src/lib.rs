//! SearchForge Solver Engine
//!
//! This crate provides the local search engine:
//! - Solver and SolverFactory
//! - Local search phase with pluggable acceptors and a forager
//! - Move system and reference move selectors
//! - Termination conditions
//! - Event system for monitoring
//! - Configuration wiring (builder module)

pub mod builder;
pub mod event;
pub mod heuristic;
pub mod manager;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod statistics;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{AcceptorBuilder, ForagerBuilder, TerminationBuilder};
pub use event::{
    ChannelEventListener, CountingEventListener, LoggingEventListener, PhaseLifecycleListener,
    SolverEventListener, SolverEventSupport, StepLifecycleListener,
};
pub use heuristic::{
    ChangeMove, ChangeMoveSelector, EitherMove, Move, MoveSelector, SelectionOrder, SwapMove,
    SwapMoveSelector, UndoGuard, UnionMoveSelector, ValueRange,
};
pub use manager::{SolverFactory, SolverJob, SolverStatus};
pub use phase::{
    localsearch::{
        AcceptedForager, Acceptor, CompositeAcceptor, GreatDelugeAcceptor, HillClimbingAcceptor,
        LateAcceptanceAcceptor, LateSimulatedAnnealingAcceptor, LocalSearchForager,
        LocalSearchPhase, MoveThreads, SimulatedAnnealingAcceptor,
        StepCountingHillClimbingAcceptor, TabuAcceptor, TabuScope, TabuSizeStrategy,
    },
    Phase,
};
pub use scope::{MoveScope, PhaseScope, SolverScope, StepScope};
pub use solver::{SolveResult, Solver};
pub use statistics::{PhaseStatistics, ScoreImprovement, SolverStatistics};
pub use termination::{
    AndTermination, BestScoreTermination, NeverTermination, OrTermination, StepCountTermination,
    Termination, TimeTermination, UnimprovedStepCountTermination, UnimprovedTimeTermination,
};
