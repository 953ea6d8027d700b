// The exact cover matrix is stored as Knuth's "dancing links":
// a sparse 0/1 matrix in which every 1 is a node linked to its neighbours
// in four directions, each direction forming a circular list.
//
// Instead of pointers, all links are indices into one node vector
// which owns every node for the whole lifetime of the matrix.
// Nodes are laid out as
//
//   index 0             root, sentinel of the column ring
//   index 1..=N         column headers, header of column c sits at c + 1
//   index N+1..         cells, in input order (row by row)
//
// Nothing is ever removed from the vector. Covering a column only redirects
// the links of its neighbours, the hidden nodes keep their own links
// so they know where to reinsert themselves on uncover.
use crate::errors::BuildError;

/// Index of the root header
pub(crate) const ROOT: usize = 0;

/// Row id of the root and column headers
const NO_ROW: usize = usize::MAX;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    // header node of the column, headers and the root point to themselves
    column: usize,
    row: usize,
}

impl Node {
    fn header(index: usize) -> Node {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            column: index,
            row: NO_ROW,
        }
    }
}

/// Proof that a column is currently covered.
///
/// Returned by [`Matrix::cover`] and consumed by [`Matrix::uncover`], so a column
/// can't be uncovered without having been covered or be uncovered twice.
/// Tokens must be handed back in the reverse order they were received in,
/// which is checked in debug builds.
#[must_use = "covered columns have to be uncovered in reverse order of covering"]
#[derive(Debug)]
pub(crate) struct Covered {
    header: usize,
    depth: usize,
}

/// The sparse linked matrix of an exact cover problem.
///
/// Columns are the elements of the universe, rows are the candidate subsets.
/// A matrix is built once with [`Matrix::new`] and consumed by
/// [`Matrix::solve`] or [`Matrix::solve_with`].
#[derive(Clone, Debug)]
pub struct Matrix {
    nodes: Vec<Node>,
    // live count of each column, indexed by column number
    lens: Vec<usize>,
    n_rows: usize,
    // number of columns currently covered
    depth: usize,
    // number of cells unlinked from their column so far
    updates: u64,
}

impl Matrix {
    /// Builds the matrix for a universe of `universe_size` elements and the given rows.
    ///
    /// Each row is identified by its position in `rows`. Rows may be empty,
    /// such rows can never be part of a solution but still take up an id.
    ///
    /// Returns an error if a row contains an element `>= universe_size`
    /// or the same element more than once.
    pub fn new<R, I>(universe_size: usize, rows: R) -> Result<Matrix, BuildError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = usize>,
    {
        let mut matrix = Matrix {
            nodes: Vec::with_capacity(universe_size + 1),
            lens: vec![0; universe_size],
            n_rows: 0,
            depth: 0,
            updates: 0,
        };

        matrix.nodes.push(Node::header(ROOT));
        for column in 0..universe_size {
            let header = column + 1;
            matrix.nodes.push(Node::header(header));
            // append at the end of the column ring, left of the root
            let last = matrix.nodes[ROOT].left;
            matrix.nodes[header].left = last;
            matrix.nodes[header].right = ROOT;
            matrix.relink_horizontal(header);
        }

        // row that last used each column, catches duplicates within a row
        let mut last_row = vec![NO_ROW; universe_size];
        for (row, elements) in rows.into_iter().enumerate() {
            matrix.n_rows += 1;
            let mut first_cell = None;
            for element in elements {
                if element >= universe_size {
                    return Err(BuildError::ElementOutOfRange {
                        row,
                        element,
                        universe_size,
                    });
                }
                if last_row[element] == row {
                    return Err(BuildError::DuplicateElement { row, element });
                }
                last_row[element] = row;
                let cell = matrix.push_cell(element + 1, row);
                match first_cell {
                    None => first_cell = Some(cell),
                    Some(first) => {
                        // append at the end of the row ring, left of the first cell
                        let last = matrix.nodes[first].left;
                        matrix.nodes[cell].left = last;
                        matrix.nodes[cell].right = first;
                        matrix.relink_horizontal(cell);
                    }
                }
            }
        }

        Ok(matrix)
    }

    // Creates a cell at the bottom of the column and in a row ring of its own.
    fn push_cell(&mut self, header: usize, row: usize) -> usize {
        let cell = self.nodes.len();
        let up = self.nodes[header].up;
        self.nodes.push(Node {
            left: cell,
            right: cell,
            up,
            down: header,
            column: header,
            row,
        });
        self.relink_vertical(cell);
        self.lens[header - 1] += 1;
        cell
    }

    /// Number of elements in the universe, i.e. number of columns
    #[inline]
    pub fn universe_size(&self) -> usize {
        self.lens.len()
    }

    /// Number of rows the matrix was built from, including empty ones
    #[inline]
    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    /// Number of cells, i.e. the sum of all row lengths
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.nodes.len() - self.universe_size() - 1
    }

    /// Number of cells currently present in `column`.
    /// Returns `None` if the column doesn't exist.
    pub fn column_len(&self, column: usize) -> Option<usize> {
        self.lens.get(column).copied()
    }

    /// Iterator over the columns currently in the column ring, in ring order.
    pub fn columns(&self) -> Columns<'_> {
        Columns {
            matrix: self,
            node: self.right(ROOT),
        }
    }

    /// Iterator over the ids of the rows currently linked into `column`, top to bottom.
    /// Returns `None` if the column doesn't exist.
    pub fn column_rows(&self, column: usize) -> Option<ColumnRows<'_>> {
        if column >= self.universe_size() {
            return None;
        }
        let header = column + 1;
        Some(ColumnRows {
            matrix: self,
            header,
            node: self.down(header),
        })
    }

    // Link accessors. Index validity is an invariant of the arena,
    // every link stored in a node points into `nodes`.

    #[inline]
    pub(crate) fn left(&self, node: usize) -> usize {
        self.nodes[node].left
    }

    #[inline]
    pub(crate) fn right(&self, node: usize) -> usize {
        self.nodes[node].right
    }

    #[inline]
    pub(crate) fn up(&self, node: usize) -> usize {
        self.nodes[node].up
    }

    #[inline]
    pub(crate) fn down(&self, node: usize) -> usize {
        self.nodes[node].down
    }

    /// Header node of the column a cell belongs to
    #[inline]
    pub(crate) fn header_of(&self, node: usize) -> usize {
        self.nodes[node].column
    }

    /// Input row of a cell
    #[inline]
    pub(crate) fn row_of(&self, node: usize) -> usize {
        self.nodes[node].row
    }

    /// Live count of the column with the given header node
    #[inline]
    pub(crate) fn len_of(&self, header: usize) -> usize {
        self.lens[header - 1]
    }

    #[inline]
    pub(crate) fn is_header(&self, node: usize) -> bool {
        node != ROOT && node <= self.universe_size()
    }

    #[inline]
    pub(crate) fn updates(&self) -> u64 {
        self.updates
    }

    fn unlink_horizontal(&mut self, node: usize) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = right;
        self.nodes[right].left = left;
    }

    fn relink_horizontal(&mut self, node: usize) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = node;
        self.nodes[right].left = node;
    }

    fn unlink_vertical(&mut self, node: usize) {
        let Node { up, down, .. } = self.nodes[node];
        self.nodes[up].down = down;
        self.nodes[down].up = up;
    }

    fn relink_vertical(&mut self, node: usize) {
        let Node { up, down, .. } = self.nodes[node];
        self.nodes[up].down = node;
        self.nodes[down].up = node;
    }

    /// The live column with the fewest cells, the first one in ring order on ties.
    /// `None` if every column is covered.
    pub(crate) fn min_column(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut header = self.right(ROOT);
        while header != ROOT {
            let len = self.len_of(header);
            if best.map_or(true, |best| len < self.len_of(best)) {
                best = Some(header);
                if len == 0 {
                    break;
                }
            }
            header = self.right(header);
        }
        best
    }

    /// Removes the column from the column ring and every row that has a cell in it
    /// from all other columns.
    ///
    /// Rows are processed top to bottom, cells within a row left to right.
    pub(crate) fn cover(&mut self, header: usize) -> Covered {
        debug_assert!(self.is_header(header));
        self.unlink_horizontal(header);
        let mut row_cell = self.down(header);
        while row_cell != header {
            let mut cell = self.right(row_cell);
            while cell != row_cell {
                self.unlink_vertical(cell);
                let column = self.header_of(cell) - 1;
                self.lens[column] -= 1;
                self.updates += 1;
                cell = self.right(cell);
            }
            row_cell = self.down(row_cell);
        }
        self.depth += 1;
        Covered {
            header,
            depth: self.depth,
        }
    }

    /// Exact inverse of [`Matrix::cover`]: bottom to top, right to left,
    /// the column header last.
    pub(crate) fn uncover(&mut self, covered: Covered) {
        debug_assert_eq!(
            covered.depth, self.depth,
            "columns must be uncovered in reverse order of covering"
        );
        self.depth -= 1;
        let header = covered.header;
        let mut row_cell = self.up(header);
        while row_cell != header {
            let mut cell = self.left(row_cell);
            while cell != row_cell {
                let column = self.header_of(cell) - 1;
                self.lens[column] += 1;
                self.relink_vertical(cell);
                cell = self.left(cell);
            }
            row_cell = self.up(row_cell);
        }
        self.relink_horizontal(header);
    }

    /// Walks every ring reachable from the root and every row ring and checks
    /// that links are symmetric and live counts match the cell rings.
    pub(crate) fn is_consistent(&self) -> bool {
        let n_nodes = self.nodes.len();

        // column ring
        let mut node = ROOT;
        let mut steps = 0;
        loop {
            let right = self.right(node);
            if self.left(right) != node || (right != ROOT && !self.is_header(right)) {
                return false;
            }
            node = right;
            steps += 1;
            if node == ROOT {
                break;
            }
            if steps > n_nodes {
                return false;
            }
        }

        // cell rings of live columns
        for column in self.columns() {
            let header = column + 1;
            let mut len = 0;
            let mut node = header;
            loop {
                let down = self.down(node);
                if self.up(down) != node {
                    return false;
                }
                node = down;
                if node == header {
                    break;
                }
                if self.header_of(node) != header || len > n_nodes {
                    return false;
                }
                len += 1;
            }
            if len != self.len_of(header) {
                return false;
            }
        }

        // row rings are never modified after construction
        (self.universe_size() + 1..n_nodes).all(|cell| {
            let right = self.right(cell);
            self.left(right) == cell && self.row_of(right) == self.row_of(cell)
        })
    }
}

/// Iterator over the live columns of a [`Matrix`], see [`Matrix::columns`]
#[derive(Clone, Debug)]
pub struct Columns<'a> {
    matrix: &'a Matrix,
    node: usize,
}

impl Iterator for Columns<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.node == ROOT {
            return None;
        }
        let column = self.node - 1;
        self.node = self.matrix.right(self.node);
        Some(column)
    }
}

/// Iterator over the rows linked into a column, see [`Matrix::column_rows`]
#[derive(Clone, Debug)]
pub struct ColumnRows<'a> {
    matrix: &'a Matrix,
    header: usize,
    node: usize,
}

impl Iterator for ColumnRows<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.node == self.header {
            return None;
        }
        let row = self.matrix.row_of(self.node);
        self.node = self.matrix.down(self.node);
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        let rows: Vec<Vec<usize>> = vec![
            vec![2, 4, 5],
            vec![0, 3, 6],
            vec![1, 2, 5],
            vec![0, 3],
            vec![1, 6],
            vec![3, 4, 6],
        ];
        Matrix::new(7, rows).unwrap()
    }

    fn snapshot(matrix: &Matrix) -> (Vec<Node>, Vec<usize>) {
        (matrix.nodes.clone(), matrix.lens.clone())
    }

    #[test]
    fn construction() {
        let matrix = sample();
        assert_eq!(matrix.universe_size(), 7);
        assert_eq!(matrix.row_count(), 6);
        assert_eq!(matrix.cell_count(), 16);
        assert_eq!(matrix.columns().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        assert!(matrix.is_consistent());

        let lens: Vec<usize> = (0..7).map(|c| matrix.column_len(c).unwrap()).collect();
        assert_eq!(lens, vec![2, 2, 2, 3, 2, 2, 3]);
        for column in 0..7 {
            assert_eq!(
                matrix.column_rows(column).unwrap().count(),
                matrix.column_len(column).unwrap()
            );
        }
        assert_eq!(matrix.column_rows(3).unwrap().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert!(matrix.column_rows(7).is_none());
        assert_eq!(matrix.column_len(7), None);
    }

    #[test]
    fn row_ring_follows_input_order() {
        let matrix = sample();
        // root and 7 headers, then 13 cells of rows 0..5
        let first = 8 + 13;
        assert_eq!(matrix.row_of(first), 5);
        let mut columns = vec![matrix.header_of(first) - 1];
        let mut cell = matrix.right(first);
        while cell != first {
            columns.push(matrix.header_of(cell) - 1);
            cell = matrix.right(cell);
        }
        assert_eq!(columns, vec![3, 4, 6]);
    }

    #[test]
    fn empty_rows() {
        let rows: Vec<Vec<usize>> = vec![vec![], vec![1], vec![]];
        let matrix = Matrix::new(2, rows).unwrap();
        assert_eq!(matrix.row_count(), 3);
        assert_eq!(matrix.cell_count(), 1);
        assert_eq!(matrix.column_len(0), Some(0));
        assert_eq!(matrix.column_rows(1).unwrap().collect::<Vec<_>>(), vec![1]);
        assert!(matrix.is_consistent());
    }

    #[test]
    fn empty_universe() {
        let matrix = Matrix::new(0, Vec::<Vec<usize>>::new()).unwrap();
        assert_eq!(matrix.columns().count(), 0);
        assert_eq!(matrix.min_column(), None);
        assert!(matrix.is_consistent());
    }

    #[test]
    fn out_of_range() {
        let err = Matrix::new(3, vec![vec![0, 1], vec![2, 3]]).unwrap_err();
        assert_eq!(
            err,
            BuildError::ElementOutOfRange {
                row: 1,
                element: 3,
                universe_size: 3
            }
        );
    }

    #[test]
    fn duplicate_element() {
        let err = Matrix::new(3, vec![vec![0, 1], vec![2, 0, 2]]).unwrap_err();
        assert_eq!(err, BuildError::DuplicateElement { row: 1, element: 2 });
        // the same element in different rows is fine
        assert!(Matrix::new(3, vec![vec![0], vec![0]]).is_ok());
    }

    #[test]
    fn cover_hides_conflicting_rows() {
        let mut matrix = sample();
        // column 0 holds rows 1 and 3, both also touch 3 and row 1 touches 6
        let covered = matrix.cover(1);
        assert_eq!(matrix.columns().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(matrix.column_rows(3).unwrap().collect::<Vec<_>>(), vec![5]);
        assert_eq!(matrix.column_rows(6).unwrap().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(matrix.column_len(3), Some(1));
        assert_eq!(matrix.column_len(6), Some(2));
        // the covered column keeps its own cells
        assert_eq!(matrix.column_rows(0).unwrap().collect::<Vec<_>>(), vec![1, 3]);
        assert!(matrix.is_consistent());
        assert_eq!(matrix.updates(), 3);
        matrix.uncover(covered);
    }

    #[test]
    fn cover_uncover_restores_every_column() {
        let original = sample();
        for column in 0..7 {
            let mut matrix = original.clone();
            let covered = matrix.cover(column + 1);
            matrix.uncover(covered);
            assert_eq!(snapshot(&matrix), snapshot(&original), "column {}", column);
            assert_eq!(matrix.depth, 0);
        }
    }

    #[test]
    fn nested_cover_uncover_restores() {
        let mut matrix = sample();
        let before = snapshot(&matrix);

        let mut stack = Vec::new();
        let mut states = Vec::new();
        // cover the min column repeatedly until nothing is left
        while let Some(header) = matrix.min_column() {
            states.push(snapshot(&matrix));
            stack.push(matrix.cover(header));
            assert!(matrix.is_consistent());
        }
        assert_eq!(stack.len(), 7);

        while let Some(covered) = stack.pop() {
            matrix.uncover(covered);
            assert_eq!(snapshot(&matrix), states.pop().unwrap());
        }
        assert_eq!(snapshot(&matrix), before);
    }

    #[test]
    fn random_cover_sequences_restore() {
        use crate::Problem;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xd1c);
        for universe_size in 1..12 {
            for n_rows in 0..16 {
                let problem = Problem::generate_random(universe_size, n_rows, &mut rng);
                let mut matrix = problem.matrix().unwrap();
                let before = snapshot(&matrix);

                // random LIFO interleaving of covers and uncovers of live columns
                let mut stack = Vec::new();
                let mut states = Vec::new();
                for _ in 0..3 * universe_size {
                    let live: Vec<usize> = matrix.columns().collect();
                    if !live.is_empty() && (stack.is_empty() || rng.gen_bool(0.6)) {
                        let column = live[rng.gen_range(0..live.len())];
                        states.push(snapshot(&matrix));
                        stack.push(matrix.cover(column + 1));
                    } else if let Some(covered) = stack.pop() {
                        matrix.uncover(covered);
                        assert_eq!(snapshot(&matrix), states.pop().unwrap());
                    }
                    assert!(matrix.is_consistent(), "{}", problem);
                }

                while let Some(covered) = stack.pop() {
                    matrix.uncover(covered);
                    assert_eq!(snapshot(&matrix), states.pop().unwrap());
                }
                assert_eq!(snapshot(&matrix), before);
                assert_eq!(matrix.depth, 0);
            }
        }
    }

    #[test]
    fn min_column_prefers_first_on_ties() {
        let matrix = sample();
        // lens are [2, 2, 2, 3, 2, 2, 3]
        assert_eq!(matrix.min_column(), Some(1));

        let matrix = Matrix::new(3, vec![vec![0, 1, 2], vec![0, 2]]).unwrap();
        assert_eq!(matrix.min_column(), Some(2));

        let matrix = Matrix::new(3, vec![vec![0, 2], vec![0, 2]]).unwrap();
        assert_eq!(matrix.min_column(), Some(2));
        assert_eq!(matrix.len_of(2), 0);
    }
}
