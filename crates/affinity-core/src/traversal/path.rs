//! Paths produced by the traversal engine.

use smallvec::SmallVec;

use crate::graph::{EdgeId, NodeId, RelType, Relationship};

/// An ordered walk from a fixed start node.
///
/// Length is the number of relationships. Paths never exceed three hops, so
/// nodes and relationships live inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: SmallVec<[NodeId; 4]>,
    relationships: SmallVec<[Relationship; 3]>,
}

impl Path {
    /// Creates a zero-length path at `start`.
    #[must_use]
    pub fn new(start: NodeId) -> Self {
        let mut nodes = SmallVec::new();
        nodes.push(start);
        Self {
            nodes,
            relationships: SmallVec::new(),
        }
    }

    /// Returns the start node.
    #[must_use]
    pub fn start_node(&self) -> NodeId {
        self.nodes[0]
    }

    /// Returns the current end node.
    #[must_use]
    pub fn end_node(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of relationships on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// True for the zero-length path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Nodes from start to end (`len() + 1` entries).
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Relationships in traversal order.
    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// The relationship traversed last, if any.
    #[must_use]
    pub fn last_relationship(&self) -> Option<&Relationship> {
        self.relationships.last()
    }

    /// True if the edge is already on the path.
    #[must_use]
    pub fn contains_relationship(&self, edge: EdgeId) -> bool {
        self.relationships.iter().any(|r| r.id == edge)
    }

    /// True if any relationship on the path has type `rel_type`.
    #[must_use]
    pub fn contains_type(&self, rel_type: RelType) -> bool {
        self.relationships.iter().any(|r| r.rel_type == rel_type)
    }

    /// Extends the path across `rel` from the current end node.
    pub(crate) fn push(&mut self, rel: Relationship) {
        let next = rel.other_node(self.end_node());
        self.relationships.push(rel);
        self.nodes.push(next);
    }

    /// Undoes the last `push`.
    pub(crate) fn pop(&mut self) {
        if self.relationships.pop().is_some() {
            self.nodes.pop();
        }
    }
}
