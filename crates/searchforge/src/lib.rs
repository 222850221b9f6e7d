//! SearchForge - A local search decision engine in Rust
//!
//! Configure phases in TOML or YAML, plug in a move selector and a score
//! director factory, and let the solver improve your solution.
//!
//! # Example
//!
//! ```rust
//! use searchforge::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(score.is_feasible());
//! ```

// Score types
#[cfg(feature = "decimal")]
pub use searchforge_core::score::HardSoftDecimalScore;
pub use searchforge_core::score::{
    HardMediumSoftScore, HardSoftScore, ParseableScore, Score, SimpleScore,
};
pub use searchforge_core::{PlanningSolution, Result, SolverError};

// Score directors
pub use searchforge_scoring::{
    DirectorFactory, ScoreDirector, ScoreDirectorFactory, SimpleScoreDirector,
};

// Configuration
pub use searchforge_config::{
    AcceptorConfig, EnvironmentMode, ForagerConfig, LocalSearchConfig, LocalSearchType,
    MoveThreadCount, PhaseConfig, PickEarlyType, RandomType, SolverConfig, TerminationConfig,
};

// Engine
pub use searchforge_solver::{
    ChangeMove, ChangeMoveSelector, Move, MoveSelector, SelectionOrder, SolveResult, Solver,
    SolverFactory, SolverJob, SolverStatus, SwapMove, SwapMoveSelector, UnionMoveSelector,
    ValueRange,
};

/// Full access to the engine's building blocks.
pub use searchforge_solver as solver;

#[cfg(feature = "console")]
pub use searchforge_console as console;

mod loader;
pub use loader::load_solver_factory;

pub mod prelude {
    #[cfg(feature = "decimal")]
    pub use super::HardSoftDecimalScore;
    pub use super::{
        HardMediumSoftScore, HardSoftScore, ParseableScore, PlanningSolution, Score, SimpleScore,
    };
    pub use super::{ScoreDirector, ScoreDirectorFactory, SolverConfig, SolverFactory};
}
