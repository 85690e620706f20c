//! # Graphs over relations
//!
//! [`Graph`] stores a node set and an ordered list of [`Edge`]s (source,
//! target, optional label). An undirected graph stores every edge twice, once
//! per direction, and the degree and cycle analyses read that mirrored list.
//!
//! ## Relation cache
//!
//! Neighbor and reachability queries go through a [`Relation`] over the node
//! set, materialized on first use and cached. The cache is tagged with the
//! revision of the graph it was built from; every mutation bumps the revision,
//! and the next query rebuilds. Queries therefore take `&self`.
//!
//! ## Algorithms
//!
//! The traversal and Eulerian analyses live in [`algorithms`]. Conversions to
//! and from [`Relation`] and [`BoolMatrix`] live here, DOT input and output in
//! [`dot`].
//!
//! ```rust
//! use relnet::graph::Graph;
//!
//! let mut g: Graph<&str> = Graph::directed();
//! g.add_edge("A", "B");
//! g.add_edge("B", "C");
//! assert_eq!(g.find_path(&"A", &"C"), Some(vec!["A", "B", "C"]));
//! ```

use std::{
    cell::{Ref, RefCell},
    fmt::{self, Display},
};

use ahash::AHashSet;
use indexmap::IndexSet;
use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::{
    matrix::{BoolMatrix, MatrixError, DEFAULT_MAX_ITERATIONS},
    relation::{Relation, RelationError},
    Element,
};

pub mod algorithms;
pub mod dot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error(transparent)]
    Relation(#[from] RelationError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("{labels} labels cannot name the nodes of a {rows}x{cols} matrix")]
    LabelCount {
        labels: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid DOT input: {0}")]
    Dot(String),
}

/// A stored edge. Undirected graphs hold one of these per direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<N, L> {
    pub source: N,
    pub target: N,
    pub label: Option<L>,
}

impl<N: PartialEq, L> Edge<N, L> {
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Structural classification returned by [`Graph::graph_type`].
///
/// Displays as `"Directed"` or `"Undirected"`, followed by `", Multigraph"`
/// when an ordered pair is stored more than once and `", Pseudograph"` when a
/// self-loop exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphType {
    pub directed: bool,
    pub multigraph: bool,
    pub pseudograph: bool,
}

impl Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.directed {
            "Directed"
        } else {
            "Undirected"
        })?;
        if self.multigraph {
            f.write_str(", Multigraph")?;
        }
        if self.pseudograph {
            f.write_str(", Pseudograph")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RelationCache<N: Element> {
    /// Graph revision the relation was built from, `None` before the first build.
    revision: Option<u64>,
    relation: Relation<N>,
}

#[derive(Debug, Clone)]
pub struct Graph<N: Element, L = String> {
    nodes: IndexSet<N>,
    edges: Vec<Edge<N, L>>,
    directed: bool,
    closure_limit: usize,
    revision: u64,
    cache: RefCell<RelationCache<N>>,
}

impl<N: Element, L> Default for Graph<N, L> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<N: Element, L> Graph<N, L> {
    pub fn new(directed: bool) -> Self {
        Graph {
            nodes: IndexSet::new(),
            edges: Vec::new(),
            directed,
            closure_limit: DEFAULT_MAX_ITERATIONS,
            revision: 0,
            cache: RefCell::new(RelationCache {
                revision: None,
                relation: Relation::new([]),
            }),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Sets the iteration cap of the transitive closures run by
    /// [`is_connected`](Graph::is_connected) and the analyses built on it.
    pub fn with_closure_limit(mut self, limit: usize) -> Self {
        self.closure_limit = limit;
        self
    }

    pub fn set_closure_limit(&mut self, limit: usize) {
        self.closure_limit = limit;
    }

    pub fn closure_limit(&self) -> usize {
        self.closure_limit
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &IndexSet<N> {
        &self.nodes
    }

    /// Stored edges in insertion order, mirrored entries included.
    pub fn edges(&self) -> &[Edge<N, L>] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Registers a node. Returns `false` if it was already present.
    pub fn add_node(&mut self, node: N) -> bool {
        let inserted = self.nodes.insert(node);
        if inserted {
            self.touch();
        }
        inserted
    }

    pub(crate) fn push_edge(&mut self, a: N, b: N, label: Option<L>)
    where
        L: Clone,
    {
        self.nodes.insert(a.clone());
        self.nodes.insert(b.clone());
        self.edges.push(Edge {
            source: a.clone(),
            target: b.clone(),
            label: label.clone(),
        });
        if !self.directed {
            self.edges.push(Edge {
                source: b,
                target: a,
                label,
            });
        }
        self.touch();
    }

    /// Adds an unlabeled edge, registering both endpoints.
    ///
    /// Undirected graphs store `(a, b)` followed by `(b, a)`.
    pub fn add_edge(&mut self, a: N, b: N)
    where
        L: Clone,
    {
        self.push_edge(a, b, None);
    }

    pub fn add_labeled_edge(&mut self, a: N, b: N, label: L)
    where
        L: Clone,
    {
        self.push_edge(a, b, Some(label));
    }

    fn fresh_relation(&self) -> Relation<N> {
        let mut relation = Relation::new(self.nodes.iter().cloned());
        for e in &self.edges {
            // endpoints are registered by push_edge
            if let (Some(i), Some(j)) = (
                self.nodes.get_index_of(&e.source),
                self.nodes.get_index_of(&e.target),
            ) {
                relation.insert_indices(i, j);
            }
        }
        relation
    }

    /// Rebuilds the cached relation from the current nodes and unlabeled edges.
    ///
    /// # Panics
    ///
    /// If a [`Ref`] previously returned by [`relation`](Graph::relation) is
    /// still alive.
    pub fn build_relation(&self) -> Ref<'_, Relation<N>> {
        let relation = self.fresh_relation();
        debug!(
            revision = self.revision,
            nodes = self.nodes.len(),
            pairs = relation.len(),
            "rebuilt relation cache"
        );
        {
            let mut cache = self.cache.borrow_mut();
            cache.revision = Some(self.revision);
            cache.relation = relation;
        }
        Ref::map(self.cache.borrow(), |c| &c.relation)
    }

    /// The cached relation, rebuilt first if the graph changed since it was built.
    pub fn relation(&self) -> Ref<'_, Relation<N>> {
        if self.cache.borrow().revision != Some(self.revision) {
            return self.build_relation();
        }
        Ref::map(self.cache.borrow(), |c| &c.relation)
    }

    /// Direct successors of `node`; empty for unknown nodes.
    pub fn neighbors(&self, node: &N) -> IndexSet<N> {
        self.relation().followers(node)
    }

    /// Whether the graph is directed, has parallel stored edges, or self-loops.
    pub fn graph_type(&self) -> GraphType {
        let mut seen = AHashSet::new();
        let mut multigraph = false;
        let mut pseudograph = false;
        for e in &self.edges {
            if !seen.insert((&e.source, &e.target)) {
                multigraph = true;
            }
            if e.is_loop() {
                pseudograph = true;
            }
        }
        GraphType {
            directed: self.directed,
            multigraph,
            pseudograph,
        }
    }

    /// One unlabeled edge per pair of `relation`; the relation seeds the cache.
    pub fn from_relation(relation: Relation<N>, directed: bool) -> Self {
        let mut graph = Self::new(directed);
        graph.nodes = relation.domain().clone();
        graph.edges = relation
            .pairs()
            .map(|(a, b)| Edge {
                source: a.clone(),
                target: b.clone(),
                label: None,
            })
            .collect();
        graph.cache = RefCell::new(RelationCache {
            revision: Some(graph.revision),
            relation,
        });
        graph
    }

    /// A copy of the relation induced by the edges.
    pub fn to_relation(&self) -> Relation<N> {
        self.relation().clone()
    }

    /// One unlabeled edge per nonzero cell, `labels` naming rows and columns.
    ///
    /// # Errors
    ///
    /// [`GraphError::LabelCount`] unless the matrix is `labels × labels`.
    pub fn from_matrix(
        matrix: &BoolMatrix,
        labels: impl IntoIterator<Item = N>,
        directed: bool,
    ) -> Result<Self, GraphError> {
        let labels: Vec<N> = labels.into_iter().collect();
        let (rows, cols) = matrix.shape();
        if labels.len() != rows || labels.len() != cols {
            return Err(GraphError::LabelCount {
                labels: labels.len(),
                rows,
                cols,
            });
        }

        let mut graph = Self::new(directed);
        graph.nodes = labels.iter().cloned().collect();
        for (i, j) in (0..rows).cartesian_product(0..cols) {
            if matrix[(i, j)] != 0 {
                graph.edges.push(Edge {
                    source: labels[i].clone(),
                    target: labels[j].clone(),
                    label: None,
                });
            }
        }
        Ok(graph)
    }

    /// Adjacency matrix in node order.
    pub fn to_matrix(&self) -> BoolMatrix {
        self.relation().matrix().clone()
    }
}

impl<N: Element + Display, L: Display> Display for Graph<N, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes: [{}]", self.nodes.iter().join(", "))?;
        writeln!(f, "Edges:")?;
        for e in &self.edges {
            write!(f, "  {} -> {}", e.source, e.target)?;
            if let Some(label) = &e.label {
                write!(f, " [label: {label}]")?;
            }
            writeln!(f)?;
        }
        write!(f, "Graph type: {}", self.graph_type())
    }
}
