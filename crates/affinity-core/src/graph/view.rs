//! Graph capabilities consumed by the affinity core.
//!
//! The core never owns storage. Every traversal, aggregation and write takes
//! one of these traits as an explicit argument, so any store (the bundled
//! [`InMemoryGraph`](super::InMemoryGraph), an embedded database, a remote
//! client) can back it.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::error::Result;

use super::types::{Direction, EdgeId, NodeId, RelType, Relationship};

/// Read-only access to node labels, properties and typed relationships.
///
/// Reads are fallible so that a store can surface transient failures; the
/// error then aborts the current (user, target) pair only.
pub trait GraphView {
    /// Returns the labels of `node`, or `None` if the node does not exist.
    fn labels(&self, node: NodeId) -> Result<Option<BTreeSet<String>>>;

    /// Returns a node property.
    fn node_property(&self, node: NodeId, name: &str) -> Result<Option<Value>>;

    /// Returns an edge property.
    fn edge_property(&self, edge: EdgeId, name: &str) -> Result<Option<Value>>;

    /// Enumerates relationships of `node` in `direction` whose type is in
    /// `types`. An empty `types` slice matches nothing.
    fn relationships(
        &self,
        node: NodeId,
        direction: Direction,
        types: &[RelType],
    ) -> Result<Vec<Relationship>>;

    /// Returns the IDs of all nodes carrying `label`, in ascending order.
    fn nodes_with_label(&self, label: &str) -> Result<Vec<NodeId>>;

    /// Returns true if `node` exists.
    fn contains_node(&self, node: NodeId) -> Result<bool> {
        Ok(self.labels(node)?.is_some())
    }

    /// Returns true if `node` exists and carries `label`.
    fn has_label(&self, node: NodeId, label: &str) -> Result<bool> {
        Ok(self
            .labels(node)?
            .is_some_and(|labels| labels.contains(label)))
    }

    /// Returns the first outgoing relationship of `rel_type` from `from` to `to`.
    fn relationship_between(
        &self,
        from: NodeId,
        to: NodeId,
        rel_type: RelType,
    ) -> Result<Option<Relationship>> {
        Ok(self
            .relationships(from, Direction::Outgoing, &[rel_type])?
            .into_iter()
            .find(|rel| rel.end == to))
    }

    /// Reads a numeric node property as `f64`.
    fn node_f64(&self, node: NodeId, name: &str) -> Result<Option<f64>> {
        Ok(self.node_property(node, name)?.as_ref().and_then(Value::as_f64))
    }
}

/// Write capability used to persist affinity results.
pub trait GraphWrite: GraphView {
    /// Creates a relationship and returns its handle.
    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: RelType,
    ) -> Result<Relationship>;

    /// Sets (or overwrites) an edge property.
    fn set_edge_property(&mut self, edge: EdgeId, name: &str, value: Value) -> Result<()>;

    /// Removes an edge property, returning its previous value.
    fn remove_edge_property(&mut self, edge: EdgeId, name: &str) -> Result<Option<Value>>;

    /// Sets (or overwrites) a node property.
    fn set_node_property(&mut self, node: NodeId, name: &str, value: Value) -> Result<()>;
}
