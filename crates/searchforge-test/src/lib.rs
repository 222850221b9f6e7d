//! Shared test fixtures for SearchForge crates.
//!
//! - [`nqueens`] - N-Queens problem data types, conflict calculation and directors
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! searchforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use searchforge_test::nqueens::{create_nqueens_director, NQueensSolution};
//! ```

pub mod nqueens;

pub use nqueens::{NQueensSolution, Queen};
