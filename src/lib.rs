#![warn(missing_docs)]
//! Exact cover solving with Dancing Links
//!
//! ## Overview
//!
//! Given a universe of elements `0..N` and a list of rows, each a subset of the universe,
//! an exact cover is a selection of rows such that every element is contained in
//! exactly one selected row.
//!
//! This library finds an exact cover with Knuth's Algorithm X. The problem is stored
//! as a sparse matrix of circular doubly linked lists, the "dancing links", in which
//! rows and columns can be removed and restored in constant time per node.
//! The search always branches on the column with the fewest remaining rows
//! and stops at the first solution.
//!
//! ## Example
//!
//! ```
//! use dancing_links::{Matrix, Problem};
//!
//! let rows = vec![
//!     vec![2, 4, 5],
//!     vec![0, 3, 6],
//!     vec![1, 2, 5],
//!     vec![0, 3],
//!     vec![1, 6],
//!     vec![3, 4, 6],
//! ];
//!
//! // Matrices can be built directly from rows...
//! let matrix = Matrix::new(7, rows.clone()).unwrap();
//! let solution = matrix.solve().expect("an exact cover exists");
//!
//! // ...or from a `Problem`, which can also check solutions.
//! let problem = Problem::from_rows(7, rows);
//! assert!(problem.is_exact_cover(solution.rows()));
//!
//! // `None` means no exact cover exists.
//! assert!(Matrix::new(2, vec![vec![0], vec![0]]).unwrap().solve().is_none());
//! ```
//!
//! Searches can be bounded with a [`SolverConfig`], sudokus are solved through their
//! exact cover reduction in [`Sudoku`] and [`Matrix::dot`] renders the matrix with Graphviz.
mod dot;
mod errors;
mod generator;
mod matrix;
pub mod parse_errors;
mod problem;
mod solver;
mod sudoku;

pub use crate::dot::Dot;
pub use crate::errors::{BuildError, Interrupted, ProblemError};
pub use crate::matrix::{ColumnRows, Columns, Matrix};
pub use crate::problem::Problem;
pub use crate::solver::{SearchStats, Solution, SolverConfig};
pub use crate::sudoku::{Iter, Sudoku};
