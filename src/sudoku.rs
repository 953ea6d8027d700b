use std::{fmt, iter, slice};

use crate::errors::Interrupted;
use crate::parse_errors::{InvalidEntry, LineParseError};
use crate::{Problem, SolverConfig};

// A sudoku as an exact cover problem.
//
// There are a total of 729 (81 cells * 9 digits) entry possibilities,
// these are the rows. Every entry satisfies 4 constraints:
// 1. a cell   needs to be filled               (81 cells, 1 digit each)
// 2. a row    needs to have 1 of each digit    (9 rows, 9 digits each)
// 3. a column needs to have 1 of each digit    (9 cols, 9 digits each)
// 4. a block  needs to have 1 of each digit    (9 blocks, 9 digits each)
//
// for a total of 81 * 4 = 324 columns.
//
// Row id of entry (cell, digit) is `cell * 9 + digit - 1`.
// Givens are applied by emptying the rows of all other digits of their cell,
// which keeps the ids stable.
const N_CELLS: usize = 81;
const N_CONSTRAINTS: usize = 4 * N_CELLS;
const ROW_OFFSET: usize = N_CELLS;
const COL_OFFSET: usize = 2 * N_CELLS;
const BLOCK_OFFSET: usize = 3 * N_CELLS;

/// A 9x9 sudoku grid. Empty cells are stored as 0.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Sudoku([u8; N_CELLS]);

/// Iterator over the cells of a sudoku, see [`Sudoku::iter`]
pub type Iter<'a> = iter::Map<slice::Iter<'a, u8>, fn(&u8) -> Option<u8>>;

impl Sudoku {
    /// Reads a sudoku in the line format: 81 cells, left to right, top to bottom.
    /// Digits `1..=9` are entries, `.`, `_` and `0` are empty cells.
    /// Everything after the 81st cell must be separated by whitespace and is ignored.
    ///
    /// ```
    /// use dancing_links::Sudoku;
    ///
    /// let sudoku = Sudoku::from_str_line(
    ///     "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1..."
    /// ).unwrap();
    /// let solution = sudoku.solve_one().unwrap();
    /// assert!(solution.is_solved());
    /// ```
    pub fn from_str_line(s: &str) -> Result<Sudoku, LineParseError> {
        let mut grid = [0; N_CELLS];
        let mut n_cells = 0;
        for ch in s.chars() {
            if n_cells == N_CELLS {
                return match ch {
                    _ if ch.is_whitespace() => Ok(Sudoku(grid)),
                    '1'..='9' | '.' | '_' | '0' => Err(LineParseError::TooManyCells),
                    _ => Err(LineParseError::MissingCommentDelimiter),
                };
            }
            grid[n_cells] = match ch {
                '1'..='9' => ch as u8 - b'0',
                '.' | '_' | '0' => 0,
                _ if ch.is_whitespace() => {
                    return Err(LineParseError::NotEnoughCells(n_cells as u8))
                }
                _ => {
                    return Err(LineParseError::InvalidEntry(InvalidEntry {
                        cell: n_cells as u8,
                        ch,
                    }))
                }
            };
            n_cells += 1;
        }
        if n_cells < N_CELLS {
            return Err(LineParseError::NotEnoughCells(n_cells as u8));
        }
        Ok(Sudoku(grid))
    }

    /// Creates a sudoku from its cells, left to right, top to bottom.
    /// Returns `None` if a cell is greater than 9.
    pub fn from_bytes(bytes: [u8; N_CELLS]) -> Option<Sudoku> {
        if bytes.iter().all(|&num| num <= 9) {
            Some(Sudoku(bytes))
        } else {
            None
        }
    }

    /// The cells, left to right, top to bottom. 0 for empty cells.
    #[inline]
    pub fn to_bytes(self) -> [u8; N_CELLS] {
        self.0
    }

    /// Returns an Iterator over sudoku, going from left to right, top to bottom
    pub fn iter(&self) -> Iter<'_> {
        self.0.iter().map(num_to_opt as fn(&u8) -> Option<u8>)
    }

    /// The sudoku in line format, with `.` for empty cells
    pub fn to_str_line(&self) -> String {
        self.0
            .iter()
            .map(|&num| match num {
                0 => '.',
                _ => (b'0' + num) as char,
            })
            .collect()
    }

    /// The exact cover problem whose solutions are the solutions of this sudoku
    pub fn to_problem(&self) -> Problem {
        let rows = (0..N_CELLS * 9).map(|id| {
            let (cell, num) = entry_of_row(id);
            match self.0[cell] {
                given if given != 0 && given != num => Vec::new(),
                _ => constraints(cell, num).to_vec(),
            }
        });
        Problem::from_rows(N_CONSTRAINTS, rows)
    }

    /// Find a solution to the sudoku. If multiple solutions exist,
    /// it will not find them and just stop at the first.
    /// Return `None` if no solution exists.
    pub fn solve_one(&self) -> Option<Sudoku> {
        self.solve_with(&SolverConfig::default()).ok().flatten()
    }

    /// Like [`Sudoku::solve_one`] but gives up once a limit of `config` is hit
    pub fn solve_with(&self, config: &SolverConfig) -> Result<Option<Sudoku>, Interrupted> {
        let matrix = match self.to_problem().matrix() {
            Ok(matrix) => matrix,
            // every row holds 4 distinct constraints out of 324
            Err(err) => unreachable!("invalid sudoku reduction: {}", err),
        };
        let solution = match matrix.solve_with(config)? {
            Some(solution) => solution,
            None => return Ok(None),
        };
        let mut grid = [0; N_CELLS];
        for &id in solution.rows() {
            let (cell, num) = entry_of_row(id);
            grid[cell] = num;
        }
        Ok(Some(Sudoku(grid)))
    }

    /// Check whether the sudoku is completely and correctly filled.
    pub fn is_solved(&self) -> bool {
        if self.0.iter().any(|&num| num == 0 || num > 9) {
            return false;
        }
        let selection: Vec<usize> = (0..N_CELLS)
            .map(|cell| cell * 9 + self.0[cell] as usize - 1)
            .collect();
        self.to_problem().is_exact_cover(&selection)
    }

    /// Number of filled cells
    pub fn n_clues(&self) -> usize {
        self.0.iter().filter(|&&num| num != 0).count()
    }
}

fn num_to_opt(num: &u8) -> Option<u8> {
    if *num == 0 {
        None
    } else {
        Some(*num)
    }
}

#[inline]
fn entry_of_row(id: usize) -> (usize, u8) {
    (id / 9, (id % 9) as u8 + 1)
}

// the 4 columns satisfied by entering `num` into `cell`
#[inline]
fn constraints(cell: usize, num: u8) -> [usize; 4] {
    let (row, col) = (cell / 9, cell % 9);
    let block = row / 3 * 3 + col / 3;
    let digit = num as usize - 1;
    [
        cell,
        ROW_OFFSET + row * 9 + digit,
        COL_OFFSET + col * 9 + digit,
        BLOCK_OFFSET + block * 9 + digit,
    ]
}

impl fmt::Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (cell, &num) in self.0.iter().enumerate() {
            match (cell / 9, cell % 9) {
                (_, 3) | (_, 6) => write!(f, " ")?,    // seperate blocks in columns
                (3, 0) | (6, 0) => write!(f, "\n\n")?, // separate blocks in rows
                (0, 0) => {}
                (_, 0) => writeln!(f)?, // separate lines not between blocks
                _ => {}
            }
            match num {
                0 => write!(f, "_")?,
                _ => write!(f, "{}", num)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sudoku({})", self.to_str_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...";

    #[test]
    fn parse_line() {
        let sudoku = Sudoku::from_str_line(README).unwrap();
        assert_eq!(sudoku.to_str_line(), README);
        assert_eq!(sudoku.iter().next(), Some(None));
        assert_eq!(sudoku.iter().nth(3), Some(Some(2)));
        assert_eq!(sudoku.n_clues(), 27);

        let with_comment = format!("{} some comment", README.replace('.', "_"));
        assert_eq!(Sudoku::from_str_line(&with_comment).unwrap(), sudoku);
    }

    #[test]
    fn parse_line_errors() {
        assert_eq!(
            Sudoku::from_str_line(&README[..80]),
            Err(LineParseError::NotEnoughCells(80))
        );
        assert_eq!(
            Sudoku::from_str_line(&format!("{}1", README)),
            Err(LineParseError::TooManyCells)
        );
        assert_eq!(
            Sudoku::from_str_line(&format!("{}x", README)),
            Err(LineParseError::MissingCommentDelimiter)
        );
        let err = Sudoku::from_str_line(&format!("12a{}", &README[3..])).unwrap_err();
        assert_eq!(err, LineParseError::InvalidEntry(InvalidEntry { cell: 2, ch: 'a' }));
        if let LineParseError::InvalidEntry(entry) = err {
            assert_eq!((entry.row(), entry.col()), (0, 2));
        }
        assert_eq!(
            Sudoku::from_str_line("12 "),
            Err(LineParseError::NotEnoughCells(2))
        );
    }

    #[test]
    fn reduction() {
        let sudoku = Sudoku::from_str_line(README).unwrap();
        let problem = sudoku.to_problem();
        assert_eq!(problem.universe_size(), 324);
        assert_eq!(problem.rows().len(), 729);
        // cell 3 holds a 2, the other digits of that cell are gone
        assert!(problem.row(3 * 9).unwrap().is_empty());
        assert_eq!(
            problem.row(3 * 9 + 1).unwrap(),
            &[3, 81 + 1, 162 + 3 * 9 + 1, 243 + 9 + 1]
        );
        let non_empty = problem.rows().iter().filter(|row| !row.is_empty()).count();
        assert_eq!(non_empty, 729 - 27 * 8);
    }

    #[test]
    fn solve() {
        let sudoku = Sudoku::from_str_line(README).unwrap();
        let solution = sudoku.solve_one().unwrap();
        assert!(solution.is_solved());
        for (given, solved) in sudoku.iter().zip(solution.iter()) {
            if given.is_some() {
                assert_eq!(given, solved);
            }
        }
    }

    #[test]
    fn solve_empty_grid() {
        let solution = Sudoku::from_bytes([0; 81]).unwrap().solve_one().unwrap();
        assert!(solution.is_solved());
    }

    #[test]
    fn conflicting_givens() {
        // two 5s in the first row
        let sudoku = Sudoku::from_str_line(&format!("5...5{}", &README[5..])).unwrap();
        assert_eq!(sudoku.solve_one(), None);
        assert!(!sudoku.is_solved());
    }

    #[test]
    fn reduction_always_builds() {
        let conflicting = Sudoku::from_str_line(&format!("55{}", &README[2..])).unwrap();
        let sudokus = [
            Sudoku::from_str_line(README).unwrap(),
            Sudoku::from_bytes([0; 81]).unwrap(),
            conflicting,
            Sudoku::from_str_line(README).unwrap().solve_one().unwrap(),
        ];
        for sudoku in &sudokus {
            let matrix = sudoku.to_problem().matrix().unwrap();
            assert_eq!(matrix.universe_size(), N_CONSTRAINTS);
            assert_eq!(matrix.row_count(), N_CELLS * 9);
            assert!(matrix.is_consistent());
        }
        assert_eq!(conflicting.solve_with(&SolverConfig::default()), Ok(None));
    }

    #[test]
    fn from_bytes_rejects_invalid() {
        let mut bytes = [0; 81];
        bytes[40] = 10;
        assert_eq!(Sudoku::from_bytes(bytes), None);
    }

    #[test]
    fn display() {
        let sudoku = Sudoku::from_str_line(README).unwrap();
        let text = sudoku.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "___ 2__ _63");
        assert_eq!(lines[3], "");
    }
}
