//! Errors that may be encountered when reading a problem or a sudoku from a string

/// An invalid sudoku entry encountered during parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvalidEntry {
    /// Cell number goes from 0..=80, 0..=8 for first line, 9..=17 for 2nd and so on
    pub cell: u8,
    /// The parsed invalid char
    pub ch: char,
}

impl InvalidEntry {
    /// Row index from 0..=8, topmost row is 0
    #[inline]
    pub fn row(self) -> u8 {
        self.cell / 9
    }
    /// Column index from 0..=8, leftmost col is 0
    #[inline]
    pub fn col(self) -> u8 {
        self.cell % 9
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A structure representing an error caused when parsing a sudoku line
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum LineParseError {
    /// Accepted values are numbers 1...9 and '0', '.' or '_' for empty cells
    #[error("cell {} contains invalid character '{}'", .0.cell, .0.ch)]
    InvalidEntry(InvalidEntry),
    /// Returns number of cells supplied
    #[error("sudoku contains {0} cells instead of required 81")]
    NotEnoughCells(u8),
    /// Returned if >=82 valid cell positions are supplied
    #[error("sudoku contains more than 81 cells or is missing comment delimiter")]
    TooManyCells,
    /// Comments must be delimited by a space or tab.
    #[error("missing comment delimiter")]
    MissingCommentDelimiter,
}

/// An error in the text format of a [`Problem`](crate::Problem).
///
/// Line numbers start at 1.
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The input has no content line declaring the universe size
    #[error("missing universe size")]
    MissingUniverse,
    /// The universe size line is not a single non-negative integer
    #[error("line {line}: invalid universe size `{token}`")]
    InvalidUniverse {
        /// Line of the declaration
        line: usize,
        /// The text that failed to parse
        token: String,
    },
    /// A row contains something other than a non-negative integer
    #[error("line {line}: invalid element `{token}`")]
    InvalidElement {
        /// Line of the row
        line: usize,
        /// The text that failed to parse
        token: String,
    },
}
