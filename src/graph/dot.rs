//! # DOT input and output
//!
//! Graphs are read from and written to the Graphviz DOT language. Parsing goes
//! through `dot_parser`: the AST is canonicalized, every node statement and
//! every edge becomes part of a `Graph<String, String>`, and an edge's `label`
//! attribute becomes its label. `digraph` yields a directed graph, `graph` an
//! undirected one.
//!
//! ```rust
//! use relnet::dot;
//!
//! let g = dot!(digraph { a -> b; b -> c [label = "x"]; }).unwrap();
//! assert_eq!(g.edge_count(), 2);
//! assert_eq!(g.edges()[1].label.as_deref(), Some("x"));
//! ```

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use ahash::AHashMap;

use crate::{
    graph::{Graph, GraphError},
    Element,
};

/// Parses a DOT graph from its tokens.
#[macro_export]
macro_rules! dot {
    ($($t:tt)*) => {
        $crate::graph::Graph::<::std::string::String, ::std::string::String>::from_dot(stringify!($($t)*))
    };
}

impl Graph<String, String> {
    /// Reads a single DOT graph.
    ///
    /// Nodes declared by statements come first, in id order, followed by nodes
    /// only mentioned by edges. Edges keep their order in the source.
    pub fn from_dot(source: impl AsRef<str>) -> Result<Self, GraphError> {
        let ast = dot_parser::ast::Graph::try_from(source.as_ref())
            .map_err(|e| GraphError::Dot(e.to_string()))?;
        let canonical = dot_parser::canonical::Graph::from(
            ast.filter_map(&|a| Some((a.0.to_string(), a.1.to_string()))),
        );

        let mut graph = Graph::new(canonical.is_digraph);
        let nodes = BTreeMap::from_iter(canonical.nodes.set);
        for id in nodes.into_keys() {
            graph.add_node(id);
        }
        for edge in canonical.edges.set {
            let label = edge
                .attr
                .into_iter()
                .find(|(key, _)| key == "label")
                .map(|(_, value)| value.trim_matches('"').to_string());
            graph.push_edge(edge.from, edge.to, label);
        }
        Ok(graph)
    }
}

fn quoted(s: impl Display) -> String {
    format!("{:?}", s.to_string())
}

impl<N: Element + Display, L: Display> Graph<N, L> {
    /// Writes the graph in DOT.
    ///
    /// Undirected graphs are written as `graph` with one `--` statement per
    /// logical edge: the mirror entry stored after each edge is skipped.
    pub fn write_dot<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        let (kind, arrow) = if self.directed {
            ("digraph", "->")
        } else {
            ("graph", "--")
        };
        writeln!(writer, "{kind} {{")?;
        for n in &self.nodes {
            writeln!(writer, "  {};", quoted(n))?;
        }

        // mirrors still owed, per ordered pair
        let mut pending: AHashMap<(&N, &N), usize> = AHashMap::new();
        for e in &self.edges {
            if !self.directed {
                if let Some(owed) = pending.get_mut(&(&e.target, &e.source)) {
                    if *owed > 0 {
                        *owed -= 1;
                        continue;
                    }
                }
                *pending.entry((&e.source, &e.target)).or_default() += 1;
            }
            write!(
                writer,
                "  {} {arrow} {}",
                quoted(&e.source),
                quoted(&e.target)
            )?;
            if let Some(label) = &e.label {
                write!(writer, " [label={}]", quoted(label))?;
            }
            writeln!(writer, ";")?;
        }
        write!(writer, "}}")
    }

    pub fn dot(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_dot(&mut out);
        out
    }
}
