//! # Affinity Core
//!
//! Scores how strongly a user is likely to care about a venue, an artist or
//! an upcoming event, from the user's explicit tracking behaviour and the
//! similarity network between entities.
//!
//! ## Features
//!
//! - **Bounded traversal**: at most three hops from the user, driven by a
//!   role-based expansion table and an accept/prune evaluator
//! - **Direct vs proxy evidence**: paths through tracked entities outrank
//!   paths through tracked events (or materialised `PROXY_TRACKS`)
//! - **Score combination**: distance, popularity and similarity folded into
//!   one affinity in `[0, 1]`
//! - **Co-occurrence statistics**: log-likelihood ratio, mutual information
//!   and the NMID weight carried by `SIMILAR_TO`
//!
//! ## Quick Start
//!
//! ```rust
//! use affinity_core::graph::{labels, GraphNode, InMemoryGraph, RelType};
//! use affinity_core::{AffinityCalculator, AffinityConfig};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = InMemoryGraph::new();
//!     graph.add_node(GraphNode::new(1, &[labels::USER]))?;
//!     graph.add_node(GraphNode::new(2, &[labels::ARTIST]))?;
//!     graph.add_node(GraphNode::new(3, &[labels::ARTIST, labels::ACTIVE]))?;
//!     graph.connect(1, 2, RelType::Tracks)?;
//!     let nmid = HashMap::from([("NMID".to_string(), json!(0.5))]);
//!     graph.connect_with(2, 3, RelType::SimilarTo, nmid)?;
//!
//!     let calculator = AffinityCalculator::new(&AffinityConfig::default());
//!     let record = calculator.calculate_artist_affinity(&mut graph, 1, 3, false)?;
//!     assert_eq!(record.and_then(|r| r.affinity), Some(0.25));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::unreadable_literal,
        clippy::manual_assert
    )
)]

pub mod affinity;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod scoring;
pub mod stats;
#[cfg(test)]
mod test_fixtures;
pub mod traversal;

pub use affinity::{AffinityCalculator, AffinityRecord, BatchReport, EventAffinity};
pub use aggregate::{
    classify, traverse_and_classify, traverse_and_classify_with_budget, PathAggregator, PathClass,
    PathStats, PathSummary,
};
pub use config::{AffinityConfig, ConfigError, LoggingConfig, ScoringConfig, TraversalConfig};
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use scoring::{
    combine_artist_affinity, combine_event_affinity, combine_venue_affinity, distance_norm,
    popularity_norm, ScoreCombiner,
};
pub use traversal::{TargetKind, TrackMode, Traversal};
