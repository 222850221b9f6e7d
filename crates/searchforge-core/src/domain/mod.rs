//! Domain model traits for defining planning problems

mod traits;

pub use traits::PlanningSolution;
