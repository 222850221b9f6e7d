//! Tabu list sizing.

use searchforge_core::{Result, SolverError};

/// How many steps a tabooed key stays tabu.
///
/// Every strategy's result is clamped to at least 1 and, when the number
/// of candidates in the tabu scope is known, to at most one less than that
/// number, so some candidate always stays reachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabuSizeStrategy {
    /// A fixed number of steps.
    Fixed(usize),

    /// A fraction of the entity count.
    EntityRatio(f64),

    /// A fraction of the planning value count.
    ValueRatio(f64),
}

impl TabuSizeStrategy {
    /// Sizes the list as a fraction of the entity count; `ratio` must lie in `(0, 1)`.
    pub fn entity_ratio(ratio: f64) -> Result<Self> {
        check_ratio("entity_tabu_ratio", ratio)?;
        Ok(TabuSizeStrategy::EntityRatio(ratio))
    }

    /// Sizes the list as a fraction of the value count; `ratio` must lie in `(0, 1)`.
    pub fn value_ratio(ratio: f64) -> Result<Self> {
        check_ratio("value_tabu_ratio", ratio)?;
        Ok(TabuSizeStrategy::ValueRatio(ratio))
    }

    /// Resolves the tabu size for the current step.
    ///
    /// `scope_total` is the number of candidates a fixed size is clamped
    /// against, if the scope has one.
    pub fn determine_tabu_size(
        &self,
        entity_count: usize,
        value_count: usize,
        scope_total: Option<usize>,
    ) -> usize {
        match *self {
            TabuSizeStrategy::Fixed(size) => protect_corner_cases(scope_total, size),
            TabuSizeStrategy::EntityRatio(ratio) => {
                protect_corner_cases(Some(entity_count), scaled(entity_count, ratio))
            }
            TabuSizeStrategy::ValueRatio(ratio) => {
                protect_corner_cases(Some(value_count), scaled(value_count, ratio))
            }
        }
    }
}

fn check_ratio(parameter: &str, ratio: f64) -> Result<()> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(SolverError::config(
            parameter,
            format!("must lie strictly between 0 and 1, got {}", ratio),
        ))
    }
}

fn scaled(count: usize, ratio: f64) -> usize {
    (count as f64 * ratio).round_ties_even() as usize
}

fn protect_corner_cases(total: Option<usize>, size: usize) -> usize {
    if size < 1 {
        return 1;
    }
    match total {
        Some(total) if size > total.saturating_sub(1) => total.saturating_sub(1),
        _ => size,
    }
}
