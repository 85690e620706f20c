use std::cell::Cell;

/// A node of the parent-pointer forest.
///
/// - `Root { rank }` is the representative of its set.
/// - `Child(parent)` points one step closer to the root.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UFNode {
    Root { rank: usize },
    Child(usize),
}

/// Disjoint sets over the indices `0..n`, with union by rank and path compression.
///
/// The forest is stored as `Vec<Cell<UFNode>>` so that [`find`](UnionFind::find)
/// can compress paths through a shared reference.
#[derive(Debug, Clone)]
pub struct UnionFind {
    nodes: Vec<Cell<UFNode>>,
    n_sets: usize,
}

impl UnionFind {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        UnionFind {
            nodes: (0..n).map(|_| Cell::new(UFNode::Root { rank: 0 })).collect(),
            n_sets: n,
        }
    }

    /// Number of disjoint sets.
    pub fn n_sets(&self) -> usize {
        self.n_sets
    }

    /// The representative of the set containing `x`.
    ///
    /// Walks up to the root, then points every node on the way directly at it.
    pub fn find(&self, x: usize) -> usize {
        let mut root = x;
        while let UFNode::Child(parent) = self.nodes[root].get() {
            root = parent;
        }

        let mut current = x;
        while let UFNode::Child(parent) = self.nodes[current].get() {
            self.nodes[current].set(UFNode::Child(root));
            current = parent;
        }
        root
    }

    fn rank(&self, root: usize) -> usize {
        match self.nodes[root].get() {
            UFNode::Root { rank } => rank,
            UFNode::Child(_) => 0,
        }
    }

    /// Merges the sets of `x` and `y`. Returns `false` when they were already one set.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        let (rank_x, rank_y) = (self.rank(root_x), self.rank(root_y));
        let (winner, loser) = if rank_x < rank_y {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };
        if rank_x == rank_y {
            self.nodes[winner].set(UFNode::Root { rank: rank_x + 1 });
        }
        self.nodes[loser].set(UFNode::Child(winner));
        self.n_sets -= 1;
        true
    }
}
