//! Graph analyses, implemented as inherent methods on [`Graph`](super::Graph).
//!
//! - [`traversal`]: connectivity, cycle detection, path search, components.
//! - [`eulerian`]: degree tests and Hierholzer's construction.

pub mod eulerian;
pub mod traversal;
