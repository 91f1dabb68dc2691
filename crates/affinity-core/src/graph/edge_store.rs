//! In-memory graph store implementing [`GraphView`] and [`GraphWrite`].
//!
//! Provides bidirectional indexing for efficient traversal. Used by tests,
//! benches and embedders that already hold the neighbourhood in memory; it
//! is not a persistence layer.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};

use super::types::{Direction, EdgeId, GraphEdge, GraphNode, NodeId, RelType, Relationship};
use super::view::{GraphView, GraphWrite};

/// In-memory storage for graph nodes and edges with bidirectional indexing.
///
/// Provides O(1) access to nodes/edges by ID and O(degree) access to
/// outgoing/incoming edges for any node. Adjacency lists keep insertion
/// order, so traversal order is deterministic.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    /// All nodes indexed by ID.
    nodes: HashMap<NodeId, GraphNode>,
    /// All edges indexed by ID.
    edges: HashMap<EdgeId, GraphEdge>,
    /// Outgoing edges: source_id -> Vec<edge_id>.
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    /// Incoming edges: target_id -> Vec<edge_id>.
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    /// Next ID handed out by `connect` / `create_relationship`.
    next_edge_id: EdgeId,
}

impl InMemoryGraph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Node CRUD ──────────────────────────────────────────────────────

    /// Adds a node to the store.
    ///
    /// # Errors
    ///
    /// Returns `Error::NodeExists` if a node with the same ID already exists.
    pub fn add_node(&mut self, node: GraphNode) -> Result<()> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(Error::NodeExists(id));
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Gets a node by ID.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Returns the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ── Edge CRUD ──────────────────────────────────────────────────────

    /// Adds an edge with a caller-chosen ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::EdgeExists` if the ID is taken and `Error::NodeNotFound`
    /// if either endpoint is missing.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<()> {
        let id = edge.id();
        if self.edges.contains_key(&id) {
            return Err(Error::EdgeExists(id));
        }
        for endpoint in [edge.source(), edge.target()] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(Error::NodeNotFound(endpoint));
            }
        }

        self.outgoing.entry(edge.source()).or_default().push(id);
        self.incoming.entry(edge.target()).or_default().push(id);
        self.next_edge_id = self.next_edge_id.max(id.saturating_add(1));
        self.edges.insert(id, edge);
        Ok(())
    }

    /// Adds an edge with the next free ID and returns that ID.
    pub fn connect(&mut self, from: NodeId, to: NodeId, rel_type: RelType) -> Result<EdgeId> {
        self.connect_with(from, to, rel_type, HashMap::new())
    }

    /// Adds an edge with properties and the next free ID.
    pub fn connect_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: RelType,
        properties: HashMap<String, Value>,
    ) -> Result<EdgeId> {
        let id = self.next_edge_id;
        self.add_edge(GraphEdge::new(id, from, to, rel_type).with_properties(properties))?;
        Ok(id)
    }

    /// Gets an edge by its ID.
    #[must_use]
    pub fn get_edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(&id)
    }

    /// Gets all outgoing edges from a node.
    #[must_use]
    pub fn get_outgoing(&self, node_id: NodeId) -> Vec<&GraphEdge> {
        self.collect_edges(self.outgoing.get(&node_id))
    }

    /// Gets all incoming edges to a node.
    #[must_use]
    pub fn get_incoming(&self, node_id: NodeId) -> Vec<&GraphEdge> {
        self.collect_edges(self.incoming.get(&node_id))
    }

    /// Returns the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of edges of one type.
    #[must_use]
    pub fn edge_count_by_type(&self, rel_type: RelType) -> usize {
        self.edges
            .values()
            .filter(|e| e.rel_type() == rel_type)
            .count()
    }

    /// Removes an edge by ID, cleaning up both adjacency indices.
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Option<GraphEdge> {
        let edge = self.edges.remove(&edge_id)?;
        if let Some(ids) = self.outgoing.get_mut(&edge.source()) {
            ids.retain(|&id| id != edge_id);
        }
        if let Some(ids) = self.incoming.get_mut(&edge.target()) {
            ids.retain(|&id| id != edge_id);
        }
        Some(edge)
    }

    fn collect_edges(&self, ids: Option<&Vec<EdgeId>>) -> Vec<&GraphEdge> {
        ids.map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    fn edge_mut(&mut self, edge: EdgeId) -> Result<&mut GraphEdge> {
        self.edges.get_mut(&edge).ok_or(Error::EdgeNotFound(edge))
    }
}

impl GraphView for InMemoryGraph {
    fn labels(&self, node: NodeId) -> Result<Option<BTreeSet<String>>> {
        Ok(self.nodes.get(&node).map(|n| n.labels().clone()))
    }

    fn node_property(&self, node: NodeId, name: &str) -> Result<Option<Value>> {
        Ok(self
            .nodes
            .get(&node)
            .and_then(|n| n.property(name))
            .cloned())
    }

    fn edge_property(&self, edge: EdgeId, name: &str) -> Result<Option<Value>> {
        Ok(self
            .edges
            .get(&edge)
            .and_then(|e| e.property(name))
            .cloned())
    }

    fn relationships(
        &self,
        node: NodeId,
        direction: Direction,
        types: &[RelType],
    ) -> Result<Vec<Relationship>> {
        let wanted = |e: &&GraphEdge| types.contains(&e.rel_type());
        let mut rels: Vec<Relationship> = Vec::new();

        if matches!(direction, Direction::Outgoing | Direction::Both) {
            rels.extend(
                self.get_outgoing(node)
                    .into_iter()
                    .filter(wanted)
                    .map(|e| e.relationship()),
            );
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            // Self-loops were already reported by the outgoing pass.
            let skip_loops = direction == Direction::Both;
            rels.extend(
                self.get_incoming(node)
                    .into_iter()
                    .filter(wanted)
                    .filter(|e| !(skip_loops && e.source() == e.target()))
                    .map(|e| e.relationship()),
            );
        }

        Ok(rels)
    }

    fn nodes_with_label(&self, label: &str) -> Result<Vec<NodeId>> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.has_label(label))
            .map(GraphNode::id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

impl GraphWrite for InMemoryGraph {
    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: RelType,
    ) -> Result<Relationship> {
        let id = self.connect(from, to, rel_type)?;
        Ok(Relationship {
            id,
            rel_type,
            start: from,
            end: to,
        })
    }

    fn set_edge_property(&mut self, edge: EdgeId, name: &str, value: Value) -> Result<()> {
        self.edge_mut(edge)?.set_property(name, value);
        Ok(())
    }

    fn remove_edge_property(&mut self, edge: EdgeId, name: &str) -> Result<Option<Value>> {
        Ok(self.edge_mut(edge)?.remove_property(name))
    }

    fn set_node_property(&mut self, node: NodeId, name: &str, value: Value) -> Result<()> {
        self.nodes
            .get_mut(&node)
            .ok_or(Error::NodeNotFound(node))?
            .set_property(name, value);
        Ok(())
    }
}
