//! Generic directed multigraph
//!
//! Adjacency lists are kept in an [`IndexMap`], so vertices iterate in the
//! order they were first added and each list keeps its edges in insertion
//! order. Parallel edges are allowed.

use std::fmt;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use super::GraphError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digraph<V: Hash + Eq> {
    adjacency: IndexMap<V, Vec<V>>,
}

impl<V: Clone + Hash + Eq + fmt::Display> Digraph<V> {
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }

    /// Add `vertex`; does nothing if it is already present
    pub fn add_vertex(&mut self, vertex: V) {
        self.adjacency.entry(vertex).or_default();
    }

    /// Add an edge, adding either endpoint that is missing
    pub fn add_edge(&mut self, from: V, to: V) {
        self.add_vertex(to.clone());
        self.adjacency.entry(from).or_default().push(to);
    }

    /// Remove one `from -> to` edge; returns false if there was none
    pub fn remove_edge(&mut self, from: &V, to: &V) -> bool {
        let Some(targets) = self.adjacency.get_mut(from) else {
            return false;
        };
        match targets.iter().position(|t| t == to) {
            Some(index) => {
                targets.remove(index);
                true
            }
            None => false,
        }
    }

    /// Out-neighbors of `vertex`, one entry per edge
    pub fn neighbors(&self, vertex: &V) -> Result<&[V], GraphError> {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .ok_or_else(|| GraphError::missing_vertex(vertex))
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Every edge, parallel edges included, in insertion order per source
    pub fn edges(&self) -> Vec<(V, V)> {
        self.adjacency
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from.clone(), to.clone())))
            .collect()
    }

    /// Distinct edges
    pub fn edge_set(&self) -> IndexSet<(V, V)> {
        self.edges().into_iter().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn out_degree(&self, vertex: &V) -> Result<usize, GraphError> {
        self.neighbors(vertex).map(<[V]>::len)
    }

    /// Number of edges ending at `vertex`; 0 for unknown vertices
    pub fn in_degree(&self, vertex: &V) -> usize {
        self.adjacency
            .values()
            .flat_map(|targets| targets.iter())
            .filter(|to| *to == vertex)
            .count()
    }
}

impl<V: Clone + Hash + Eq + fmt::Display> Default for Digraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Hash + Eq + fmt::Display> fmt::Display for Digraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (from, targets) in &self.adjacency {
            write!(f, "{from} ->")?;
            for to in targets {
                write!(f, " {to}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
