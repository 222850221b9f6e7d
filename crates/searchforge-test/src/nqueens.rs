//! N-Queens problem test fixtures.
//!
//! Places N queens on an N×N board, one per column; the row of each queen is
//! the planning variable. The score is minus the number of attacking pairs.
//!
//! # Example
//!
//! ```ignore
//! use searchforge_test::nqueens::create_nqueens_director;
//!
//! let mut director = create_nqueens_director(&[0, 2, 1, 3]);
//! let score = director.calculate_score();
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use searchforge_core::domain::PlanningSolution;
use searchforge_core::score::SimpleScore;
use searchforge_scoring::{ScoreDirectorFactory, SimpleScoreDirector};

/// A queen entity. `column` is fixed, `row` is the planning variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Queen {
    pub id: usize,
    pub column: usize,
    pub row: Option<usize>,
}

impl Queen {
    /// Creates a queen with an assigned row.
    pub fn assigned(id: usize, column: usize, row: usize) -> Self {
        Self {
            id,
            column,
            row: Some(row),
        }
    }

    /// Creates a queen with no row assigned.
    pub fn unassigned(id: usize, column: usize) -> Self {
        Self {
            id,
            column,
            row: None,
        }
    }
}

/// N-Queens problem solution.
#[derive(Clone, Debug)]
pub struct NQueensSolution {
    pub n: usize,
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    /// Creates an N-Queens solution with queens at the specified rows.
    ///
    /// Queens are placed in columns `0..rows.len()`.
    pub fn with_rows(rows: &[usize]) -> Self {
        let queens = rows
            .iter()
            .enumerate()
            .map(|(i, &row)| Queen::assigned(i, i, row))
            .collect();
        Self {
            n: rows.len(),
            queens,
            score: None,
        }
    }

    /// Creates an N-Queens solution with n queens all on row 0.
    pub fn all_on_first_row(n: usize) -> Self {
        Self::with_rows(&vec![0; n])
    }

    /// Creates an N-Queens solution with n uninitialized queens.
    pub fn uninitialized(n: usize) -> Self {
        Self {
            n,
            queens: (0..n).map(|i| Queen::unassigned(i, i)).collect(),
            score: None,
        }
    }

    /// Returns the assigned rows, in column order.
    pub fn rows(&self) -> Vec<Option<usize>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn entity_count(&self) -> usize {
        self.queens.len()
    }

    fn value_count(&self) -> usize {
        self.n
    }

    fn tabu_fingerprint(&self) -> Option<u64> {
        let mut hasher = DefaultHasher::new();
        for queen in &self.queens {
            queen.row.hash(&mut hasher);
        }
        Some(hasher.finish())
    }
}

/// Typed getter for the row planning variable.
pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<usize> {
    s.queens.get(idx).and_then(|q| q.row)
}

/// Typed setter for the row planning variable.
pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<usize>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

/// Row values available to every queen.
pub fn queen_rows(s: &NQueensSolution) -> Vec<usize> {
    (0..s.n).collect()
}

/// Counts attacking pairs (same row or same diagonal) and returns minus that count.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let mut conflicts = 0i64;
    let queens = &solution.queens;

    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if let (Some(row_i), Some(row_j)) = (queens[i].row, queens[j].row) {
                if row_i == row_j {
                    conflicts += 1;
                }
                let col_diff = queens[j].column.abs_diff(queens[i].column);
                if row_i.abs_diff(row_j) == col_diff {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}

/// Calculator type used by the N-Queens directors.
pub type NQueensCalculator = fn(&NQueensSolution) -> SimpleScore;

/// Score director type for N-Queens fixtures.
pub type NQueensDirector = SimpleScoreDirector<NQueensSolution, NQueensCalculator>;

/// Creates a director for N-Queens with queens at the specified rows.
pub fn create_nqueens_director(rows: &[usize]) -> NQueensDirector {
    SimpleScoreDirector::new(
        NQueensSolution::with_rows(rows),
        calculate_conflicts as NQueensCalculator,
    )
}

/// Creates a factory producing N-Queens directors, for move evaluation workers.
pub fn nqueens_director_factory() -> ScoreDirectorFactory<NQueensSolution, NQueensCalculator> {
    ScoreDirectorFactory::new(calculate_conflicts as NQueensCalculator)
}
