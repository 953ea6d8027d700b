// Algorithm X on top of the dancing links matrix.
//
// The search is a plain depth first traversal. At every level the column
// with the fewest remaining rows is covered and every row in it is tried
// in turn: the row is pushed onto the partial solution and all other
// columns of the row are covered, which removes every row conflicting with it.
// When the column ring runs empty, the partial solution is an exact cover.
//
// A column without rows can't be covered anymore, it has no row to try
// and the level is left right away, so the search backtracks.
//
// On success the search returns immediately without uncovering anything.
// The matrix is left in a covered state, which is why solving consumes it.
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::errors::Interrupted;
use crate::matrix::{Covered, Matrix};

/// Limits for a search, see [`Matrix::solve_with`].
///
/// The default configuration searches until a solution is found
/// or the search space is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Maximum number of search nodes to visit
    pub node_limit: Option<u64>,
    /// Maximum wall clock time, checked once per search node
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    /// Unbounded search, same as `SolverConfig::default()`
    pub fn new() -> SolverConfig {
        SolverConfig::default()
    }

    /// Abort after visiting more than `limit` search nodes
    pub fn node_limit(mut self, limit: u64) -> SolverConfig {
        self.node_limit = Some(limit);
        self
    }

    /// Abort once the search has run for `limit` or longer
    pub fn time_limit(mut self, limit: Duration) -> SolverConfig {
        self.time_limit = Some(limit);
        self
    }
}

/// Counters collected during a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of search nodes visited, including the root
    pub nodes: u64,
    /// Number of times a cell was unlinked from its column
    pub updates: u64,
}

/// An exact cover: the ids of the selected rows.
///
/// Row ids are positions in the row sequence the [`Matrix`] was built from.
/// They are listed in the order the search selected them, which is not
/// necessarily ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    rows: Vec<usize>,
    stats: SearchStats,
}

impl Solution {
    /// The selected rows
    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The selected rows, sorted ascending
    pub fn sorted_rows(&self) -> Vec<usize> {
        let mut rows = self.rows.clone();
        rows.sort_unstable();
        rows
    }

    /// Consumes the solution, returning the selected rows
    #[inline]
    pub fn into_rows(self) -> Vec<usize> {
        self.rows
    }

    /// Number of selected rows
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were selected. Only possible for an empty universe.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Counters of the search that found this solution
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut rows = self.rows.iter();
        if let Some(first) = rows.next() {
            write!(f, "{}", first)?;
            for row in rows {
                write!(f, " {}", row)?;
            }
        }
        Ok(())
    }
}

impl Matrix {
    /// Searches for an exact cover and returns the first one found.
    ///
    /// Returns `None` if no subset of the rows covers every column exactly once.
    /// An empty universe is covered by the empty solution.
    pub fn solve(self) -> Option<Solution> {
        // without limits the search can't be interrupted
        self.solve_with(&SolverConfig::default()).ok().flatten()
    }

    /// Like [`Matrix::solve`] but stops early once a limit of `config` is hit.
    pub fn solve_with(self, config: &SolverConfig) -> Result<Option<Solution>, Interrupted> {
        debug!(
            "searching exact cover of {} columns with {} rows, {} cells",
            self.universe_size(),
            self.row_count(),
            self.cell_count()
        );
        let mut search = Search {
            matrix: self,
            config,
            started: Instant::now(),
            nodes: 0,
            solution: Vec::new(),
            trail: Vec::new(),
        };
        let result = search.search();
        let stats = SearchStats {
            nodes: search.nodes,
            updates: search.matrix.updates(),
        };
        let elapsed = search.started.elapsed();

        match result {
            Ok(true) => {
                debug!(
                    "found exact cover of {} rows after {} nodes, {} updates in {:?}",
                    search.solution.len(),
                    stats.nodes,
                    stats.updates,
                    elapsed
                );
                Ok(Some(Solution {
                    rows: search.solution,
                    stats,
                }))
            }
            Ok(false) => {
                debug_assert!(search.matrix.is_consistent());
                debug!(
                    "no exact cover exists, searched {} nodes, {} updates in {:?}",
                    stats.nodes, stats.updates, elapsed
                );
                Ok(None)
            }
            Err(interrupted) => {
                debug!(
                    "search interrupted after {} nodes, {} updates in {:?}: {}",
                    stats.nodes, stats.updates, elapsed, interrupted
                );
                Err(interrupted)
            }
        }
    }
}

// Helper struct for solving
struct Search<'a> {
    matrix: Matrix,
    config: &'a SolverConfig,
    started: Instant,
    nodes: u64,
    // partial solution, one row per search level
    solution: Vec<usize>,
    // columns covered by the rows of the partial solution
    trail: Vec<Covered>,
}

// One level of the search: the column branched on and the row currently tried.
struct Frame {
    column: Covered,
    header: usize,
    // cell of the selected row, the header itself before the first row
    row_cell: usize,
    // length of the trail before the selected row's columns were covered
    mark: usize,
}

impl Search<'_> {
    fn check_limits(&self) -> Result<(), Interrupted> {
        if let Some(limit) = self.config.node_limit {
            if self.nodes > limit {
                return Err(Interrupted::NodeLimit(limit));
            }
        }
        if let Some(limit) = self.config.time_limit {
            if self.started.elapsed() >= limit {
                return Err(Interrupted::TimeLimit(limit));
            }
        }
        Ok(())
    }

    // Returns Ok(true) when a solution was found, in which case
    // `solution` holds it and the matrix is left covered.
    //
    // Depth first with an explicit stack of levels, solutions can be
    // arbitrarily deep without touching the call stack.
    fn search(&mut self) -> Result<bool, Interrupted> {
        let mut frames: Vec<Frame> = Vec::new();
        loop {
            // a new search node
            self.nodes += 1;
            self.check_limits()?;

            let header = match self.matrix.min_column() {
                Some(header) => header,
                None => return Ok(true),
            };
            trace!(
                "depth {}: branching on column {} with {} rows",
                self.solution.len(),
                header - 1,
                self.matrix.len_of(header)
            );
            let column = self.matrix.cover(header);
            frames.push(Frame {
                column,
                header,
                row_cell: header,
                mark: self.trail.len(),
            });

            // select the next row of the innermost level that has one left
            loop {
                let frame = match frames.last_mut() {
                    Some(frame) => frame,
                    None => return Ok(false),
                };
                if frame.row_cell != frame.header {
                    // right to left, newest first
                    for covered in self.trail.drain(frame.mark..).rev() {
                        self.matrix.uncover(covered);
                    }
                    self.solution.pop();
                }
                frame.row_cell = self.matrix.down(frame.row_cell);
                let row_cell = frame.row_cell;
                if row_cell == frame.header {
                    let header = frame.header;
                    if let Some(exhausted) = frames.pop() {
                        self.matrix.uncover(exhausted.column);
                    }
                    trace!(
                        "depth {}: column {} exhausted, backtracking",
                        self.solution.len(),
                        header - 1
                    );
                    continue;
                }

                let row = self.matrix.row_of(row_cell);
                trace!("depth {}: trying row {}", self.solution.len(), row);
                self.solution.push(row);
                let mut cell = self.matrix.right(row_cell);
                while cell != row_cell {
                    let covered = self.matrix.cover(self.matrix.header_of(cell));
                    self.trail.push(covered);
                    cell = self.matrix.right(cell);
                }
                break;
            }
        }
    }
}
