use std::fmt;
use std::str::FromStr;

use crate::errors::{BuildError, ProblemError};
use crate::parse_errors::ParseError;
use crate::{Matrix, Solution};

/// An exact cover problem as a plain list of rows.
///
/// This is the owned, editable description of a problem. It is turned into the
/// linked [`Matrix`] the solver works on with [`Problem::matrix`].
///
/// ## Text format
///
/// `Problem` implements [`FromStr`] and [`Display`](fmt::Display) for a line based format.
/// `#` starts a comment, blank lines are ignored. The first line declares the
/// universe size, every following line is one row of whitespace separated
/// elements. A line containing only `-` is an empty row.
///
/// ```
/// use dancing_links::Problem;
///
/// let problem: Problem = "\
/// ## universe of 4 elements
/// 4
/// 0 1
/// 2 3
/// 1 2
/// -
/// ".parse().unwrap();
///
/// assert_eq!(problem.rows().len(), 4);
/// let solution = problem.solve().unwrap().unwrap();
/// assert_eq!(solution.sorted_rows(), vec![0, 1]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    universe_size: usize,
    rows: Vec<Vec<usize>>,
}

impl Problem {
    /// Creates a problem over the universe `0..universe_size` without any rows
    pub fn new(universe_size: usize) -> Problem {
        Problem {
            universe_size,
            rows: Vec::new(),
        }
    }

    /// Creates a problem from a universe size and a list of rows.
    ///
    /// Rows are not validated until the matrix is built.
    pub fn from_rows<R, I>(universe_size: usize, rows: R) -> Problem
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = usize>,
    {
        Problem {
            universe_size,
            rows: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
        }
    }

    /// Appends a row and returns its id
    pub fn add_row<I: IntoIterator<Item = usize>>(&mut self, row: I) -> usize {
        self.rows.push(row.into_iter().collect());
        self.rows.len() - 1
    }

    /// Number of elements that have to be covered
    #[inline]
    pub fn universe_size(&self) -> usize {
        self.universe_size
    }

    /// All rows, indexed by row id
    #[inline]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// The row with the given id, if it exists
    pub fn row(&self, id: usize) -> Option<&[usize]> {
        self.rows.get(id).map(Vec::as_slice)
    }

    /// Builds the linked matrix for this problem.
    pub fn matrix(&self) -> Result<Matrix, BuildError> {
        Matrix::new(
            self.universe_size,
            self.rows.iter().map(|row| row.iter().copied()),
        )
    }

    /// Builds the matrix and searches for an exact cover.
    ///
    /// The outer `Result` reports invalid rows, the inner `Option` is `None`
    /// if no exact cover exists.
    pub fn solve(&self) -> Result<Option<Solution>, BuildError> {
        Ok(self.matrix()?.solve())
    }

    /// Parses `text` and searches for an exact cover.
    pub fn solve_str(text: &str) -> Result<Option<Solution>, ProblemError> {
        let problem: Problem = text.parse()?;
        Ok(problem.solve()?)
    }

    /// Checks whether the rows with the given ids form an exact cover:
    /// every element of the universe is in exactly one of them.
    ///
    /// Unknown or repeated row ids make the selection invalid.
    pub fn is_exact_cover(&self, selection: &[usize]) -> bool {
        let mut selected = vec![false; self.rows.len()];
        let mut covered = vec![false; self.universe_size];
        for &id in selection {
            match selected.get_mut(id) {
                Some(selected) if !*selected => *selected = true,
                _ => return false,
            }
            for &element in &self.rows[id] {
                match covered.get_mut(element) {
                    Some(covered) if !*covered => *covered = true,
                    _ => return false,
                }
            }
        }
        covered.iter().all(|&covered| covered)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

impl FromStr for Problem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Problem, ParseError> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, strip_comment(line).trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line, universe) = lines.next().ok_or(ParseError::MissingUniverse)?;
        let universe_size = universe
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidUniverse {
                line,
                token: universe.to_string(),
            })?;

        let mut problem = Problem::new(universe_size);
        for (line, content) in lines {
            if content == "-" {
                problem.rows.push(Vec::new());
                continue;
            }
            let row = content
                .split_whitespace()
                .map(|token| {
                    token.parse::<usize>().map_err(|_| ParseError::InvalidElement {
                        line,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<usize>, _>>()?;
            problem.rows.push(row);
        }
        Ok(problem)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.universe_size)?;
        for row in &self.rows {
            match row.split_first() {
                None => writeln!(f, "-")?,
                Some((first, rest)) => {
                    write!(f, "{}", first)?;
                    for element in rest {
                        write!(f, " {}", element)?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
