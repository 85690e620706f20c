//! # Eulerian walks
//!
//! Degree bookkeeping runs over the stored edge list, so an undirected edge,
//! being stored once per direction, contributes to both the in- and the
//! out-degree of each endpoint.
//!
//! [`find_eulerian_path`](Graph::find_eulerian_path) is Hierholzer's algorithm:
//! follow unused edges from the start node, pushing each target on a stack, and
//! when the top of the stack has no unused edge left, move it to the output.
//! The output, reversed, is the walk.

use tracing::{debug, trace};

use crate::{
    graph::{Graph, GraphError},
    Element,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Degree {
    pub incoming: usize,
    pub outgoing: usize,
}

impl Degree {
    /// `|in - out|`.
    pub fn imbalance(&self) -> usize {
        self.incoming.abs_diff(self.outgoing)
    }

    /// Both endpoints of every stored edge, a self-loop counting twice.
    pub fn total(&self) -> usize {
        self.incoming + self.outgoing
    }
}

impl<N: Element, L> Graph<N, L> {
    /// In- and out-degree of every node, in node order.
    pub fn degrees(&self) -> Vec<Degree> {
        let mut degrees = vec![Degree::default(); self.nodes.len()];
        for e in &self.edges {
            if let Some(i) = self.nodes.get_index_of(&e.source) {
                degrees[i].outgoing += 1;
            }
            if let Some(j) = self.nodes.get_index_of(&e.target) {
                degrees[j].incoming += 1;
            }
        }
        degrees
    }

    pub fn degree(&self, node: &N) -> Option<Degree> {
        let i = self.nodes.get_index_of(node)?;
        self.degrees().get(i).copied()
    }

    /// The two ends of an open Eulerian path, if exactly two nodes have an
    /// in/out imbalance of one.
    ///
    /// The node with the surplus of outgoing edges, if any, comes first.
    pub fn endpoints(&self) -> Option<(N, N)> {
        let degrees = self.degrees();
        let unbalanced: Vec<usize> = (0..degrees.len())
            .filter(|&i| degrees[i].imbalance() == 1)
            .collect();
        let &[a, b] = unbalanced.as_slice() else {
            return None;
        };

        let leaves = |i: usize| degrees[i].outgoing > degrees[i].incoming;
        let (start, end) = if leaves(b) && !leaves(a) {
            (b, a)
        } else {
            (a, b)
        };
        Some((self.nodes[start].clone(), self.nodes[end].clone()))
    }

    /// Connected, and every node balanced: equal in- and out-degree for directed
    /// graphs, an even total degree for undirected ones.
    pub fn is_eulerian_cycle(&self) -> Result<bool, GraphError> {
        if !self.is_connected()? {
            return Ok(false);
        }
        let degrees = self.degrees();
        Ok(if self.directed {
            degrees.iter().all(|d| d.incoming == d.outgoing)
        } else {
            degrees.iter().all(|d| d.total() % 2 == 0)
        })
    }

    /// A walk using every stored edge exactly once, or `None` if there is none.
    ///
    /// An Eulerian cycle starts and ends at the first node; otherwise the walk
    /// runs between the [`endpoints`](Graph::endpoints), which must be one node
    /// with an outgoing surplus of one and one with an incoming surplus of one,
    /// every other node being balanced.
    /// A walk that leaves edges unused is rejected.
    pub fn find_eulerian_path(&self) -> Result<Option<Vec<N>>, GraphError> {
        let start = if self.is_eulerian_cycle()? {
            if self.nodes.is_empty() {
                return Ok(None);
            }
            0
        } else {
            let Some((start, end)) = self.endpoints() else {
                return Ok(None);
            };
            let (Some(s), Some(e)) = (
                self.nodes.get_index_of(&start),
                self.nodes.get_index_of(&end),
            ) else {
                return Ok(None);
            };
            // start +1 out, end +1 in, everything else balanced
            let bounded = self.degrees().iter().enumerate().all(|(i, d)| {
                if i == s {
                    d.outgoing == d.incoming + 1
                } else if i == e {
                    d.incoming == d.outgoing + 1
                } else {
                    d.incoming == d.outgoing
                }
            });
            if !bounded {
                debug!(?start, ?end, "endpoints do not bound an open walk");
                return Ok(None);
            }
            s
        };
        debug!(start = ?self.nodes[start], edges = self.edges.len(), "searching Eulerian walk");

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            if let (Some(a), Some(b)) = (
                self.nodes.get_index_of(&e.source),
                self.nodes.get_index_of(&e.target),
            ) {
                adjacency[a].push(b);
            }
        }

        let mut walk = Vec::with_capacity(self.edges.len() + 1);
        let mut stack = vec![start];
        while let Some(&v) = stack.last() {
            if let Some(u) = adjacency[v].pop() {
                trace!(from = v, to = u, "consume edge");
                stack.push(u);
            } else {
                walk.push(v);
                stack.pop();
            }
        }
        walk.reverse();

        if walk.len() != self.edges.len() + 1 {
            debug!(
                used = walk.len().saturating_sub(1),
                edges = self.edges.len(),
                "walk does not cover every edge"
            );
            return Ok(None);
        }
        Ok(Some(
            walk.into_iter().map(|i| self.nodes[i].clone()).collect(),
        ))
    }
}
