//! Call graph construction and export
//!
//! A call graph is only ever derived from a [`CheckedScript`](crate::frontend::CheckedScript):
//! every callee it mentions is a declared procedure.

mod builder;
mod digraph;
mod dot;

use std::fmt;
use thiserror::Error;

pub use builder::build_call_graph;
pub use digraph::Digraph;
pub use dot::to_dot;

/// A procedure vertex, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcNode {
    pub name: String,
}

impl ProcNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for ProcNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(..)", self.name)
    }
}

/// Directed call graph over procedure vertices
pub type CallGraph = Digraph<ProcNode>;

/// Graph query errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex '{vertex}' is not in the graph")]
    MissingVertex { vertex: String },
}

impl GraphError {
    pub fn missing_vertex(vertex: impl fmt::Display) -> Self {
        Self::MissingVertex {
            vertex: vertex.to_string(),
        }
    }
}
