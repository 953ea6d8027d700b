//! Graphviz rendering of a [`Matrix`] for debugging.
use std::fmt;

use crate::matrix::{Matrix, ROOT};

/// A [`Display`](fmt::Display) adapter that writes the matrix as a Graphviz digraph.
///
/// Every node reachable from the root is drawn with its four links:
/// up in green, down in cyan, left in blue and right in red.
/// The root and the live column headers share one rank.
///
/// Created by [`Matrix::dot`]. As the adapter borrows the matrix,
/// it can only be taken before solving, never of a half covered matrix.
pub struct Dot<'a> {
    matrix: &'a Matrix,
}

impl Matrix {
    /// Graphviz rendering of the matrix, see [`Dot`]
    ///
    /// ```
    /// use dancing_links::Matrix;
    ///
    /// let matrix = Matrix::new(2, vec![vec![0, 1]]).unwrap();
    /// let dot = matrix.dot().to_string();
    /// assert!(dot.starts_with("digraph g {"));
    /// ```
    pub fn dot(&self) -> Dot<'_> {
        Dot { matrix: self }
    }
}

impl Dot<'_> {
    fn label(&self, node: usize) -> String {
        let matrix = self.matrix;
        if node == ROOT {
            "root".to_string()
        } else if matrix.is_header(node) {
            format!("column {} | {}", node - 1, matrix.len_of(node))
        } else {
            format!("row {} | column {}", matrix.row_of(node), matrix.header_of(node) - 1)
        }
    }

    fn write_node(&self, f: &mut fmt::Formatter, node: usize) -> fmt::Result {
        let matrix = self.matrix;
        writeln!(f, "\"n{}\" [ label = \"{}\" shape = \"record\" ];", node, self.label(node))?;
        let links = [
            (matrix.up(node), "green"),
            (matrix.down(node), "cyan"),
            (matrix.left(node), "blue"),
            (matrix.right(node), "red"),
        ];
        for &(target, color) in &links {
            writeln!(f, "\"n{}\" -> \"n{}\" [ color = {} ];", node, target, color)?;
        }
        Ok(())
    }
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let matrix = self.matrix;
        writeln!(f, "digraph g {{")?;
        writeln!(f, "graph [ rankdir = \"TB\" ];")?;
        writeln!(f, "node [ fontsize = \"16\" shape = \"record\" ];")?;
        writeln!(f, "edge [ ];")?;

        write!(f, "{{ rank = same; \"n{}\";", ROOT)?;
        for column in matrix.columns() {
            write!(f, " \"n{}\";", column + 1)?;
        }
        writeln!(f, " }}")?;

        self.write_node(f, ROOT)?;
        for column in matrix.columns() {
            let header = column + 1;
            self.write_node(f, header)?;
            let mut cell = matrix.down(header);
            while cell != header {
                self.write_node(f, cell)?;
                cell = matrix.down(cell);
            }
        }

        writeln!(f, "}}")
    }
}
