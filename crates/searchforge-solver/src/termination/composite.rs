//! Composite termination conditions (AND/OR).
//!
//! Tuples get macro-generated implementations with no type erasure. A
//! `Vec` of boxed terminations covers combinations only known at runtime,
//! such as the ones built from configuration.

use searchforge_core::domain::PlanningSolution;
use searchforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::SolverScope;

/// Combines multiple terminations with OR logic (any must terminate).
///
/// The time gradient is the highest child gradient.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use searchforge_solver::termination::{OrTermination, StepCountTermination, TimeTermination};
///
/// // Terminate after 30 seconds OR 1000 steps
/// let termination = OrTermination((
///     TimeTermination::new(Duration::from_secs(30)),
///     StepCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple or vector of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Combines multiple terminations with AND logic (all must terminate).
///
/// The time gradient is the lowest child gradient.
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    /// Creates a new AND termination from a tuple or vector of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR and AND tuples.
macro_rules! impl_tuple_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<S, D, $($T),+> Termination<S, D> for OrTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))||+
            }

            fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(solver_scope))||+
            }

            fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 0.0_f64;
                $(gradient = gradient.max((self.0).$idx.calculate_solver_time_gradient(solver_scope));)+
                gradient
            }

            fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 0.0_f64;
                $(gradient = gradient.max((self.0).$idx.calculate_phase_time_gradient(solver_scope));)+
                gradient
            }

            fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
                $((self.0).$idx.phase_started(solver_scope);)+
            }

            fn step_ended(&mut self, solver_scope: &SolverScope<S, D>) {
                $((self.0).$idx.step_ended(solver_scope);)+
            }
        }

        impl<S, D, $($T),+> Termination<S, D> for AndTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))&&+
            }

            fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(solver_scope))&&+
            }

            fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 1.0_f64;
                $(gradient = gradient.min((self.0).$idx.calculate_solver_time_gradient(solver_scope));)+
                gradient
            }

            fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 1.0_f64;
                $(gradient = gradient.min((self.0).$idx.calculate_phase_time_gradient(solver_scope));)+
                gradient
            }

            fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
                $((self.0).$idx.phase_started(solver_scope);)+
            }

            fn step_ended(&mut self, solver_scope: &SolverScope<S, D>) {
                $((self.0).$idx.step_ended(solver_scope);)+
            }
        }
    };
}

impl_tuple_termination!(0: T0);
impl_tuple_termination!(0: T0, 1: T1);
impl_tuple_termination!(0: T0, 1: T1, 2: T2);
impl_tuple_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_tuple_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_tuple_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);

/// Boxed terminations combined at runtime.
pub type BoxedTerminations<S, D> = Vec<Box<dyn Termination<S, D>>>;

impl<S, D> Termination<S, D> for OrTermination<BoxedTerminations<S, D>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.0.iter().any(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.0.iter().any(|t| t.is_phase_terminated(solver_scope))
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.calculate_solver_time_gradient(solver_scope))
            .fold(0.0, f64::max)
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.calculate_phase_time_gradient(solver_scope))
            .fold(0.0, f64::max)
    }

    fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
        for termination in &mut self.0 {
            termination.phase_started(solver_scope);
        }
    }

    fn step_ended(&mut self, solver_scope: &SolverScope<S, D>) {
        for termination in &mut self.0 {
            termination.step_ended(solver_scope);
        }
    }
}

// An empty AND never terminates, the same as an empty OR.
impl<S, D> Termination<S, D> for AndTermination<BoxedTerminations<S, D>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_phase_terminated(solver_scope))
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.calculate_solver_time_gradient(solver_scope))
            .fold(1.0, f64::min)
    }

    fn calculate_phase_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.calculate_phase_time_gradient(solver_scope))
            .fold(1.0, f64::min)
    }

    fn phase_started(&mut self, solver_scope: &SolverScope<S, D>) {
        for termination in &mut self.0 {
            termination.phase_started(solver_scope);
        }
    }

    fn step_ended(&mut self, solver_scope: &SolverScope<S, D>) {
        for termination in &mut self.0 {
            termination.step_ended(solver_scope);
        }
    }
}
