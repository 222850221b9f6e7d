//! Configuration-driven solver management.
//!
//! The manager module provides:
//! - [`SolverFactory`]: builds local search solvers from a `SolverConfig`
//! - [`SolverJob`]: a solve running on its own thread, streaming best solutions
//! - [`SolverStatus`]: whether a job is still solving

mod solver_factory;
mod solver_job;

#[cfg(test)]
mod tests;

pub use solver_factory::SolverFactory;
pub use solver_job::{SolverJob, SolverStatus};
