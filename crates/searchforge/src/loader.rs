//! Solver factories built straight from configuration files.

use std::path::Path;

use searchforge_config::SolverConfig;
use searchforge_core::score::ParseableScore;
use searchforge_core::{PlanningSolution, Result, SolverError};
use searchforge_scoring::DirectorFactory;
use searchforge_solver::{Move, MoveSelector, SolverFactory};

/// Loads a TOML or YAML solver configuration and builds a factory from it.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, everything else as
/// TOML. Unreadable or malformed files are reported as a configuration
/// error on `config_file`.
///
/// # Example
///
/// ```no_run
/// use searchforge::{load_solver_factory, ChangeMove, SolverFactory};
/// # use searchforge::{ChangeMoveSelector, ValueRange};
/// # use searchforge_test::nqueens::{
/// #     get_queen_row, nqueens_director_factory, queen_rows, set_queen_row,
/// # };
///
/// let factory: SolverFactory<_, ChangeMove<_, usize>, _, _> = load_solver_factory(
///     "solver.toml",
///     || ChangeMoveSelector::new(get_queen_row, set_queen_row, 0, "row", ValueRange::FromSolution(queen_rows)),
///     nqueens_director_factory(),
/// )?;
/// # Ok::<(), searchforge::SolverError>(())
/// ```
pub fn load_solver_factory<S, M, MS, F, MF>(
    path: impl AsRef<Path>,
    move_selector_factory: MF,
    director_factory: F,
) -> Result<SolverFactory<S, M, MS, F>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    M: Move<S>,
    MS: MoveSelector<S, M> + 'static,
    F: DirectorFactory<S> + 'static,
    MF: Fn() -> MS + Send + Sync + 'static,
{
    let path = path.as_ref();
    let config = SolverConfig::load(path).map_err(|err| {
        SolverError::config("config_file", format!("{}: {err}", path.display()))
    })?;
    SolverFactory::from_config(&config, move_selector_factory, director_factory)
}
