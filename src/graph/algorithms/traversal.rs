//! # Connectivity, cycles and paths
//!
//! Every search here runs over the node indices of the cached
//! [`Relation`](crate::relation::Relation), with an explicit frame stack instead
//! of recursion and `bitvec` sets for the visited marks. Successors are visited
//! in node order, so results are deterministic.

use std::vec::IntoIter;

use ahash::AHashMap;
use bitvec::prelude::*;
use indexmap::IndexSet;

use crate::{
    graph::{Graph, GraphError},
    relation::Relation,
    union_find::UnionFind,
    Element,
};

/// A suspended DFS call: the node and the successors it has yet to try.
type Frame = (usize, IntoIter<usize>);

fn frame<T: Element>(relation: &Relation<T>, node: usize) -> Frame {
    (node, relation.follower_indices(node).collect::<Vec<_>>().into_iter())
}

fn path_of<T: Element>(relation: &Relation<T>, stack: &[Frame], last: usize) -> Vec<T> {
    stack
        .iter()
        .map(|(v, _)| v)
        .chain([&last])
        .map(|&v| relation.domain()[v].clone())
        .collect()
}

impl<N: Element, L> Graph<N, L> {
    /// Strong connectivity: every node reaches every node, itself included.
    ///
    /// Computed on a copy of the cached relation, closed transitively with the
    /// graph's closure limit. A single node without a self-loop is therefore
    /// not connected, while the empty graph is.
    pub fn is_connected(&self) -> Result<bool, GraphError> {
        let mut closure = self.relation().clone();
        closure.transitive_closure_with_limit(self.closure_limit)?;
        let total = closure
            .matrix()
            .iter_rows()
            .all(|row| row.iter().all(|&c| c != 0));
        Ok(total)
    }

    /// Weak connectivity: all nodes fall into one set once edge directions are
    /// ignored.
    pub fn is_weakly_connected(&self) -> bool {
        let mut uf = UnionFind::new(self.nodes.len());
        for e in &self.edges {
            if let (Some(a), Some(b)) = (
                self.nodes.get_index_of(&e.source),
                self.nodes.get_index_of(&e.target),
            ) {
                uf.union(a, b);
            }
        }
        uf.n_sets() <= 1
    }

    /// Whether the graph contains a cycle.
    ///
    /// Directed graphs run a depth-first search from every unvisited node and
    /// report a cycle on any edge back into the current search path, self-loops
    /// included.
    ///
    /// Undirected graphs first fold the mirrored storage back into logical
    /// edges; a self-loop, two parallel logical edges, or an edge between nodes
    /// that are already connected closes a cycle. A single edge `a - b` is not a
    /// cycle.
    pub fn has_cycle(&self) -> bool {
        if self.directed {
            self.has_directed_cycle()
        } else {
            self.has_undirected_cycle()
        }
    }

    fn has_directed_cycle(&self) -> bool {
        let relation = self.relation();
        let n = relation.domain().len();
        let mut visited = bitvec![usize, Lsb0; 0; n];
        let mut on_path = bitvec![usize, Lsb0; 0; n];

        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited.set(root, true);
            on_path.set(root, true);
            let mut stack = vec![frame(&relation, root)];

            while let Some((v, next)) = stack.last_mut() {
                match next.next() {
                    Some(u) if on_path[u] => return true,
                    Some(u) if !visited[u] => {
                        visited.set(u, true);
                        on_path.set(u, true);
                        stack.push(frame(&relation, u));
                    }
                    Some(_) => {}
                    None => {
                        on_path.set(*v, false);
                        stack.pop();
                    }
                }
            }
        }
        false
    }

    fn has_undirected_cycle(&self) -> bool {
        // stored entries per unordered index pair
        let mut entries: AHashMap<(usize, usize), usize> = AHashMap::new();
        for e in &self.edges {
            if let (Some(a), Some(b)) = (
                self.nodes.get_index_of(&e.source),
                self.nodes.get_index_of(&e.target),
            ) {
                *entries.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        let mut uf = UnionFind::new(self.nodes.len());
        for (&(a, b), &count) in &entries {
            let logical = count.div_ceil(2);
            if a == b || logical > 1 || !uf.union(a, b) {
                return true;
            }
        }
        false
    }

    /// Depth-first path from `start` to `end`.
    ///
    /// One visited set is shared by the whole search: a node reached on any
    /// branch is never entered again. The result witnesses reachability and
    /// carries no optimality guarantee. `start == end` yields `[start]`.
    pub fn find_path(&self, start: &N, end: &N) -> Option<Vec<N>> {
        if start == end {
            return Some(vec![start.clone()]);
        }
        let relation = self.relation();
        let s = relation.index_of(start)?;
        let e = relation.index_of(end)?;

        let mut visited = bitvec![usize, Lsb0; 0; relation.domain().len()];
        visited.set(s, true);
        let mut stack = vec![frame(&relation, s)];

        while let Some((_, next)) = stack.last_mut() {
            match next.find(|&u| !visited[u]) {
                Some(u) if u == e => return Some(path_of(&relation, &stack, u)),
                Some(u) => {
                    visited.set(u, true);
                    stack.push(frame(&relation, u));
                }
                None => {
                    stack.pop();
                }
            }
        }
        None
    }

    /// Backtracking search for a simple path from `start` to `end`.
    ///
    /// Only the nodes on the path under construction are excluded, so every
    /// simple path is eventually tried (exponential in the worst case).
    pub fn find_simple_path(&self, start: &N, end: &N) -> Option<Vec<N>> {
        if start == end {
            return Some(vec![start.clone()]);
        }
        let relation = self.relation();
        let s = relation.index_of(start)?;
        let e = relation.index_of(end)?;

        let mut on_path = bitvec![usize, Lsb0; 0; relation.domain().len()];
        on_path.set(s, true);
        let mut stack = vec![frame(&relation, s)];

        while let Some((v, next)) = stack.last_mut() {
            match next.find(|&u| !on_path[u]) {
                Some(u) if u == e => return Some(path_of(&relation, &stack, u)),
                Some(u) => {
                    on_path.set(u, true);
                    stack.push(frame(&relation, u));
                }
                None => {
                    on_path.set(*v, false);
                    stack.pop();
                }
            }
        }
        None
    }

    /// The strongly connected components, each listed in node order.
    ///
    /// Two nodes share a group exactly when each reaches the other. For
    /// undirected graphs these are the connected components. A node on its own
    /// forms a group of one whether or not it has a self-loop.
    pub fn components(&self) -> Vec<IndexSet<N>> {
        let relation = self.relation();
        let n = relation.domain().len();

        // finishing order of a forward search
        let mut visited = bitvec![usize, Lsb0; 0; n];
        let mut finished = Vec::with_capacity(n);
        for root in 0..n {
            if visited[root] {
                continue;
            }
            visited.set(root, true);
            let mut stack = vec![frame(&relation, root)];
            while let Some((v, next)) = stack.last_mut() {
                match next.find(|&u| !visited[u]) {
                    Some(u) => {
                        visited.set(u, true);
                        stack.push(frame(&relation, u));
                    }
                    None => {
                        finished.push(*v);
                        stack.pop();
                    }
                }
            }
        }

        // collect groups against the edge direction, latest finisher first
        let mut assigned = bitvec![usize, Lsb0; 0; n];
        let mut groups = Vec::new();
        for &root in finished.iter().rev() {
            if assigned[root] {
                continue;
            }
            assigned.set(root, true);
            let mut members = vec![root];
            let mut todo = vec![root];
            while let Some(v) = todo.pop() {
                for u in relation.parent_indices(v) {
                    if !assigned[u] {
                        assigned.set(u, true);
                        members.push(u);
                        todo.push(u);
                    }
                }
            }
            members.sort_unstable();
            groups.push(
                members
                    .into_iter()
                    .map(|i| relation.domain()[i].clone())
                    .collect(),
            );
        }
        groups
    }
}
