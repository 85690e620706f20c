//! # Finite binary relations
//!
//! A [`Relation`] is a pair set `R ⊆ A × A` over an explicitly declared domain
//! `A`, kept in lock-step with its [`BoolMatrix`] representation:
//!
//! ```text
//! (a, b) ∈ R  ⇔  matrix[index(a)][index(b)] == 1
//! ```
//!
//! Every mutating operation ([`add_pair`](Relation::add_pair),
//! [`reflexive_closure`](Relation::reflexive_closure),
//! [`transitive_closure`](Relation::transitive_closure)) preserves this.
//!
//! The domain is stored as an [`IndexSet`], which doubles as the index
//! bijection between elements and matrix rows/columns. Declaring an element
//! twice keeps its first position.
//!
//! ```rust
//! use relnet::relation::Relation;
//!
//! let mut rel = Relation::with_pairs(["a", "b"], [("a", "b")]).unwrap();
//! assert!(!rel.is_reflexive());
//! rel.reflexive_closure();
//! assert!(rel.is_reflexive());
//! ```

use std::fmt::{self, Display};

use indexmap::IndexSet;
use thiserror::Error;

use crate::{
    matrix::{BoolMatrix, MatrixError, DEFAULT_MAX_ITERATIONS},
    Element,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    /// An element outside the declared domain was referenced.
    #[error("element {0} is not in the relation's domain")]
    UnknownElement(String),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl RelationError {
    fn unknown<T: Element>(element: &T) -> Self {
        RelationError::UnknownElement(format!("{element:?}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation<T: Element> {
    domain: IndexSet<T>,
    pairs: IndexSet<(T, T)>,
    matrix: BoolMatrix,
}

impl<T: Element> Relation<T> {
    /// An empty relation over `elements`.
    pub fn new(elements: impl IntoIterator<Item = T>) -> Self {
        let domain: IndexSet<T> = elements.into_iter().collect();
        let matrix = BoolMatrix::zero(domain.len(), None);
        Relation {
            domain,
            pairs: IndexSet::new(),
            matrix,
        }
    }

    /// A relation over `elements` holding the given initial pairs.
    pub fn with_pairs(
        elements: impl IntoIterator<Item = T>,
        pairs: impl IntoIterator<Item = (T, T)>,
    ) -> Result<Self, RelationError> {
        let mut rel = Self::new(elements);
        rel.add_pairs(pairs)?;
        Ok(rel)
    }

    /// Reads a relation off an `|A| × |A|` matrix: every nonzero cell is a pair.
    pub fn from_matrix(
        elements: impl IntoIterator<Item = T>,
        matrix: &BoolMatrix,
    ) -> Result<Self, RelationError> {
        let mut rel = Self::new(elements);
        let n = rel.domain.len();
        if matrix.shape() != (n, n) {
            return Err(MatrixError::ShapeMismatch {
                op: "from_matrix",
                left: (n, n),
                right: matrix.shape(),
            }
            .into());
        }
        rel.matrix = matrix.to_bool();
        rel.rebuild_pairs();
        Ok(rel)
    }

    /// The declared domain, in declaration order.
    pub fn domain(&self) -> &IndexSet<T> {
        &self.domain
    }

    pub fn matrix(&self) -> &BoolMatrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> BoolMatrix {
        self.matrix
    }

    /// Number of pairs in the relation.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.domain.get_index_of(element)
    }

    pub fn element(&self, index: usize) -> Option<&T> {
        self.domain.get_index(index)
    }

    fn lookup(&self, element: &T) -> Result<usize, RelationError> {
        self.index_of(element)
            .ok_or_else(|| RelationError::unknown(element))
    }

    /// Adds `(a, b)`; both must belong to the domain.
    ///
    /// # Errors
    ///
    /// [`RelationError::UnknownElement`] when either side is outside the
    /// domain. The relation is left untouched in that case.
    pub fn add_pair(&mut self, a: T, b: T) -> Result<&mut Self, RelationError> {
        let i = self.lookup(&a)?;
        let j = self.lookup(&b)?;
        self.matrix[(i, j)] = 1;
        self.pairs.insert((a, b));
        Ok(self)
    }

    /// Adds the pair at matrix position `(i, j)`; both must be in range.
    pub(crate) fn insert_indices(&mut self, i: usize, j: usize) {
        self.matrix[(i, j)] = 1;
        self.pairs
            .insert((self.domain[i].clone(), self.domain[j].clone()));
    }

    /// Adds every pair in turn, stopping at the first one that fails.
    pub fn add_pairs(
        &mut self,
        pairs: impl IntoIterator<Item = (T, T)>,
    ) -> Result<&mut Self, RelationError> {
        for (a, b) in pairs {
            self.add_pair(a, b)?;
        }
        Ok(self)
    }

    pub fn contains(&self, a: &T, b: &T) -> bool {
        // tuple lookup needs owned keys
        self.pairs.contains(&(a.clone(), b.clone()))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &(T, T)> + '_ {
        self.pairs.iter()
    }

    /// Snapshot of the pair set.
    pub fn to_pairs(&self) -> Vec<(T, T)> {
        self.pairs.iter().cloned().collect()
    }

    /// Adds `(a, a)` for every element of the domain. Idempotent.
    pub fn reflexive_closure(&mut self) {
        self.matrix = self.matrix.reflexive_closure();
        for e in &self.domain {
            self.pairs.insert((e.clone(), e.clone()));
        }
    }

    /// Closes the relation under `(a, b), (b, c) ⇒ (a, c)` with the default
    /// iteration cap.
    pub fn transitive_closure(&mut self) -> Result<(), RelationError> {
        self.transitive_closure_with_limit(DEFAULT_MAX_ITERATIONS)
    }

    /// Replaces the matrix by its transitive closure and rebuilds the pair set
    /// from it. On error nothing changes.
    pub fn transitive_closure_with_limit(
        &mut self,
        max_iterations: usize,
    ) -> Result<(), RelationError> {
        self.matrix = self.matrix.transitive_closure_with_limit(max_iterations)?;
        self.rebuild_pairs();
        Ok(())
    }

    fn rebuild_pairs(&mut self) {
        let n = self.domain.len();
        let mut pairs = IndexSet::new();
        for i in 0..n {
            for j in self.follower_indices(i) {
                pairs.insert((self.domain[i].clone(), self.domain[j].clone()));
            }
        }
        self.pairs = pairs;
    }

    /// Column indices of the nonzero cells in row `index`.
    pub fn follower_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.matrix
            .row(index)
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(|(j, _)| j)
    }

    /// Row indices of the nonzero cells in column `index`.
    pub fn parent_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.domain.len()).filter(move |&i| self.matrix[(i, index)] != 0)
    }

    pub fn is_reflexive(&self) -> bool {
        self.domain.iter().all(|a| self.contains(a, a))
    }

    pub fn is_symmetric(&self) -> bool {
        self.pairs.iter().all(|(a, b)| self.contains(b, a))
    }

    /// Checks `(a, b), (b, c) ∈ R ⇒ (a, c) ∈ R` by scanning `R × R` directly,
    /// without consulting the matrix.
    pub fn is_transitive(&self) -> bool {
        self.pairs.iter().all(|(a, b)| {
            self.pairs
                .iter()
                .filter(|(c, _)| b == c)
                .all(|(_, d)| self.contains(a, d))
        })
    }

    /// `true` when every element relates to at most one value.
    pub fn is_function(&self) -> bool {
        let mut seen = ahash::AHashMap::new();
        for (a, b) in &self.pairs {
            if let Some(prev) = seen.insert(a, b) {
                if prev != b {
                    return false;
                }
            }
        }
        true
    }

    /// `{b : (a, b) ∈ R}`; empty for elements outside the domain.
    pub fn followers(&self, a: &T) -> IndexSet<T> {
        self.pairs
            .iter()
            .filter(|(x, _)| x == a)
            .map(|(_, b)| b.clone())
            .collect()
    }

    /// `{a : (a, b) ∈ R}`.
    pub fn parents(&self, b: &T) -> IndexSet<T> {
        self.pairs
            .iter()
            .filter(|(_, y)| y == b)
            .map(|(a, _)| a.clone())
            .collect()
    }

    /// Everything sharing at least one parent with `a`, excluding `a`.
    pub fn siblings(&self, a: &T) -> IndexSet<T> {
        let mut siblings: IndexSet<T> = self
            .parents(a)
            .iter()
            .flat_map(|p| self.followers(p))
            .collect();
        siblings.shift_remove(a);
        siblings
    }

    /// `true` when `a` and `b` share a follower other than themselves.
    pub fn are_parents(&self, a: &T, b: &T) -> bool {
        let of_b = self.followers(b);
        self.followers(a)
            .iter()
            .any(|x| x != a && x != b && of_b.contains(x))
    }

    /// `true` when `a` and `b` share a parent other than themselves.
    pub fn are_siblings(&self, a: &T, b: &T) -> bool {
        let of_b = self.parents(b);
        self.parents(a)
            .iter()
            .any(|x| x != a && x != b && of_b.contains(x))
    }
}

impl<T: Element + Display> Display for Relation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix:")?;
        writeln!(f, "{}", self.matrix)?;
        write!(f, "Relations:")?;
        for (a, b) in &self.pairs {
            write!(f, "\n{a} -> {b}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test;
