//! # Boolean matrices
//!
//! [`BoolMatrix`] is a dense, row-major grid of integers that by convention hold
//! `0` or `1`. It is the adjacency representation behind every
//! [`Relation`](crate::relation::Relation) and the engine that computes
//! reflexive and transitive closures.
//!
//! ## Arithmetic versus boolean operations
//!
//! The arithmetic operations ([`add`](BoolMatrix::add),
//! [`mat_mul`](BoolMatrix::mat_mul), [`multiply`](BoolMatrix::multiply)) are
//! ordinary integer operations and do **not** clamp their result: the sum of two
//! boolean matrices may contain `2`. Callers that need a boolean union use
//! [`union`](BoolMatrix::union), or re-clamp with [`to_bool`](BoolMatrix::to_bool).
//!
//! ## Closures
//!
//! - [`reflexive_closure`](BoolMatrix::reflexive_closure) forces the main
//!   diagonal to `1`.
//! - [`transitive_closure`](BoolMatrix::transitive_closure) iterates
//!   `C' = bool(C · M + C)` from `C = M` until a fixed point is reached, or fails
//!   with [`MatrixError::NoConvergence`] once the iteration cap is exhausted.
//!
//! ```rust
//! use relnet::matrix::BoolMatrix;
//!
//! let m = BoolMatrix::new([[1, 0, 1], [0, 0, 1], [0, 1, 0]]).unwrap();
//! let closure = m.transitive_closure().unwrap();
//! assert_eq!(
//!     closure,
//!     BoolMatrix::new([[1, 1, 1], [0, 1, 1], [0, 1, 1]]).unwrap()
//! );
//! ```

use std::{
    fmt::{self, Display},
    io,
    ops::{Index, IndexMut},
};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Iteration cap used by [`BoolMatrix::transitive_closure`].
///
/// This is a guard against non-terminating input, not a bound derived from the
/// matrix size.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("shape mismatch in {op}: {left:?} against {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("ragged input: row {row} has {len} entries, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("pair ({row}, {col}) lies outside a {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// The transitive closure did not reach a fixed point within the cap.
    #[error("transitive closure did not converge within {max_iterations} iterations")]
    NoConvergence { max_iterations: usize },
}

/// Right-hand side of [`BoolMatrix::multiply`].
#[derive(Debug, Clone, Copy)]
pub enum Factor<'a> {
    /// Elementwise (Hadamard) product.
    Matrix(&'a BoolMatrix),
    /// Scalar product.
    Scalar(i64),
}

impl<'a> From<&'a BoolMatrix> for Factor<'a> {
    fn from(m: &'a BoolMatrix) -> Self {
        Factor::Matrix(m)
    }
}

impl From<i64> for Factor<'_> {
    fn from(k: i64) -> Self {
        Factor::Scalar(k)
    }
}

/// A dense `rows × cols` integer grid used as a boolean adjacency matrix.
///
/// Equality is exact and elementwise; matrices of different shapes are never
/// equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl BoolMatrix {
    /// Builds a matrix from rows of `0/1`-like values.
    ///
    /// Any cell type convertible into `i64` is accepted, so `bool`, `u8` and
    /// `i32` grids all work. Rows of unequal length are rejected.
    pub fn new<I, R, T>(rows: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: Into<i64>,
    {
        let mut data = Vec::new();
        let mut n_rows = 0;
        let mut n_cols = None;

        for (row, cells) in rows.into_iter().enumerate() {
            let before = data.len();
            data.extend(cells.into_iter().map(Into::into));
            let len = data.len() - before;
            match n_cols {
                None => n_cols = Some(len),
                Some(expected) if expected != len => {
                    return Err(MatrixError::Ragged { row, len, expected })
                }
                Some(_) => {}
            }
            n_rows += 1;
        }

        Ok(BoolMatrix {
            rows: n_rows,
            cols: n_cols.unwrap_or(0),
            data,
        })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zero(n, None);
        for i in 0..n {
            m[(i, i)] = 1;
        }
        m
    }

    /// A matrix of zeros; square when `cols` is `None`.
    pub fn zero(rows: usize, cols: impl Into<Option<usize>>) -> Self {
        let cols = cols.into().unwrap_or(rows);
        BoolMatrix {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Builds a `rows × cols` matrix with a `1` at every listed `(row, col)`.
    pub fn from_pairs(
        rows: usize,
        cols: usize,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, MatrixError> {
        let mut m = Self::zero(rows, cols);
        m.assign_pairs(pairs)?;
        Ok(m)
    }

    /// Clears the grid and sets a `1` at every listed `(row, col)`.
    ///
    /// The shape is kept. On error the grid is left cleared up to the offending
    /// pair.
    pub fn assign_pairs(
        &mut self,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<&mut Self, MatrixError> {
        self.data.iter_mut().for_each(|c| *c = 0);
        for (row, col) in pairs {
            if row >= self.rows || col >= self.cols {
                return Err(MatrixError::OutOfBounds {
                    row,
                    col,
                    rows: self.rows,
                    cols: self.cols,
                });
            }
            self[(row, col)] = 1;
        }
        Ok(self)
    }

    /// Every `(row, col)` whose cell is exactly `1`, in row-major order.
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .filter(|&(i, j)| self[(i, j)] == 1)
            .collect()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrites a cell, returning the previous value, or `None` when out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(std::mem::replace(&mut self[(row, col)], value))
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[i64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn to_vec(&self) -> Vec<Vec<i64>> {
        self.iter_rows().map(<[i64]>::to_vec).collect()
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zero(self.cols, self.rows);
        for (i, j) in (0..self.rows).cartesian_product(0..self.cols) {
            t[(j, i)] = self[(i, j)];
        }
        t
    }

    fn check_same_shape(&self, other: &Self, op: &'static str) -> Result<(), MatrixError> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Self, f: impl Fn(i64, i64) -> i64) -> Self {
        BoolMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Elementwise arithmetic sum. Entries may exceed `1`.
    pub fn add(&self, other: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(other, "add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Elementwise boolean OR.
    pub fn union(&self, other: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(other, "union")?;
        Ok(self.zip_with(other, |a, b| i64::from(a != 0 || b != 0)))
    }

    /// Ordinary integer matrix product; needs `self.cols() == other.rows()`.
    pub fn mat_mul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::ShapeMismatch {
                op: "mat_mul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Self::zero(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0 {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] += a * other[(k, j)];
                }
            }
        }
        Ok(out)
    }

    pub fn hadamard(&self, other: &Self) -> Result<Self, MatrixError> {
        self.check_same_shape(other, "multiply")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    pub fn scale(&self, k: i64) -> Self {
        BoolMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|a| a * k).collect(),
        }
    }

    /// Hadamard product with a matrix, or product with a scalar.
    ///
    /// ```rust
    /// use relnet::matrix::BoolMatrix;
    ///
    /// let m = BoolMatrix::new([[1, 0], [1, 1]]).unwrap();
    /// assert_eq!(m.multiply(3_i64).unwrap(), m.scale(3));
    /// assert_eq!(m.multiply(&BoolMatrix::identity(2)).unwrap(), BoolMatrix::identity(2));
    /// ```
    pub fn multiply<'a>(&self, rhs: impl Into<Factor<'a>>) -> Result<Self, MatrixError> {
        match rhs.into() {
            Factor::Matrix(other) => self.hadamard(other),
            Factor::Scalar(k) => Ok(self.scale(k)),
        }
    }

    /// Clamps every nonzero cell to `1`.
    pub fn to_bool(&self) -> Self {
        BoolMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&a| i64::from(a != 0)).collect(),
        }
    }

    /// A copy with every cell of the main diagonal set to `1`.
    ///
    /// For rectangular matrices the diagonal has `min(rows, cols)` cells.
    pub fn reflexive_closure(&self) -> Self {
        let mut closure = self.clone();
        for i in 0..self.rows.min(self.cols) {
            closure[(i, i)] = 1;
        }
        closure
    }

    /// Transitive closure with the [`DEFAULT_MAX_ITERATIONS`] cap.
    pub fn transitive_closure(&self) -> Result<Self, MatrixError> {
        self.transitive_closure_with_limit(DEFAULT_MAX_ITERATIONS)
    }

    /// Least boolean-reachability closure by fixed-point iteration.
    ///
    /// Each round extends the current closure by one hop through the input
    /// adjacency, `C' = bool(C · M + C)`, and stops as soon as a round adds
    /// nothing. No partial result is returned when `max_iterations` rounds are
    /// not enough.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::ShapeMismatch`] for a non-square matrix.
    /// - [`MatrixError::NoConvergence`] when no fixed point is reached in time.
    pub fn transitive_closure_with_limit(&self, max_iterations: usize) -> Result<Self, MatrixError> {
        let mut closure = self.clone();
        for iteration in 0..max_iterations {
            let next = closure.mat_mul(self)?.add(&closure)?.to_bool();
            trace!(iteration, "transitive closure round");
            if next == closure {
                debug!(
                    iterations = iteration + 1,
                    size = self.rows,
                    "transitive closure converged"
                );
                return Ok(next);
            }
            closure = next;
        }
        warn!(max_iterations, "transitive closure did not converge");
        Err(MatrixError::NoConvergence { max_iterations })
    }

    /// `true` when the matrix equals its transpose. Non-square matrices never are.
    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows)
                .cartesian_product(0..self.cols)
                .all(|(i, j)| self[(i, j)] == self[(j, i)])
    }

    /// `true` when every cell of the main diagonal is `1`.
    pub fn is_reflexive(&self) -> bool {
        (0..self.rows.min(self.cols)).all(|i| self[(i, i)] == 1)
    }

    /// Writes the grid as CSV: one line per row, integer cells separated by commas.
    pub fn write_csv<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in self.iter_rows() {
            writeln!(writer, "{}", row.iter().join(","))?;
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for BoolMatrix {
    type Output = i64;
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for BoolMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.cols + col]
    }
}

impl Display for BoolMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.iter_rows().enumerate() {
            if i != 0 {
                write!(f, "\n ")?;
            }
            write!(f, "[{}]", row.iter().join(" "))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod test;
