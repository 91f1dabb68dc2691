//! Graph model and capabilities.
//!
//! Provides the node/edge types of the social/music graph, the
//! [`GraphView`]/[`GraphWrite`] capabilities the affinity core is written
//! against, and an in-memory store implementing both.
//!
//! # Example
//!
//! ```rust
//! use affinity_core::graph::{labels, Direction, GraphNode, GraphView, InMemoryGraph, RelType};
//!
//! let mut graph = InMemoryGraph::new();
//! graph.add_node(GraphNode::new(1, &[labels::USER])).unwrap();
//! graph.add_node(GraphNode::new(2, &[labels::VENUE])).unwrap();
//! graph.connect(1, 2, RelType::Tracks).unwrap();
//!
//! let tracked = graph.relationships(1, Direction::Outgoing, &[RelType::Tracks]).unwrap();
//! assert_eq!(tracked.len(), 1);
//! assert_eq!(tracked[0].end, 2);
//! ```

mod edge_store;
mod types;
mod view;


pub use edge_store::InMemoryGraph;
pub use types::{
    labels, props, Direction, EdgeId, GraphEdge, GraphNode, NodeId, RelType, Relationship,
};
pub use view::{GraphView, GraphWrite};
