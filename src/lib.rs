//! # Relnet
//!
//! Relnet is a Rust library for finite binary relations and the graphs built
//! on them. It is organized in three layers:
//!
//! - [`matrix`]: boolean matrices with arithmetic, reflexive and transitive
//!   closures.
//! - [`relation`]: a pair set over a declared domain, kept synchronized with
//!   its matrix, with the classical property checks and family queries.
//! - [`graph`]: directed and undirected graphs with connectivity, cycle, path,
//!   component and Eulerian analyses, plus conversions from and to the two
//!   layers below.
//!
//! Everything is exact and computed eagerly; the only lazily built state is
//! the relation a [`graph::Graph`] caches for its neighbor queries.

use std::{fmt::Debug, hash::Hash};

pub mod graph;
pub mod matrix;
pub mod relation;
pub mod union_find;

/// What a relation member or graph node must support.
///
/// Elements are set members and map keys throughout, so they need value
/// equality and hashing. `Debug` renders them in error messages.
pub trait Element: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Element for T {}
