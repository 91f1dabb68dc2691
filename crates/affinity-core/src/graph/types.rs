//! Graph types for the social/music graph the affinity core reads.
//!
//! Nodes carry a *set* of labels (a venue that is also `Active`, an event
//! that is also `Future`) and a scalar property map. Relationships are
//! directed and typed by the closed [`RelType`] enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Opaque node identity.
pub type NodeId = u64;

/// Opaque edge identity.
pub type EdgeId = u64;

/// Well-known node labels.
pub mod labels {
    /// A person whose affinities are computed.
    pub const USER: &str = "User";
    /// A venue hosting events.
    pub const VENUE: &str = "Venue";
    /// An artist playing events.
    pub const ARTIST: &str = "Artist";
    /// A concert or show.
    pub const EVENT: &str = "Event";
    /// Marks venues/artists eligible for recommendation.
    pub const ACTIVE: &str = "Active";
    /// Marks events that have not happened yet.
    pub const FUTURE: &str = "Future";
}

/// Well-known property names.
pub mod props {
    /// Similarity weight on `SIMILAR_TO`.
    pub const NMID: &str = "NMID";
    /// Lineup slot on `PLAYS`; `0` is the current roster.
    pub const ROSTER: &str = "roster";
    /// Marker on `PROXY_TRACKS`.
    pub const PROXY: &str = "proxy";
    /// Node latitude in degrees.
    pub const LATITUDE: &str = "latitude";
    /// Node longitude in degrees.
    pub const LONGITUDE: &str = "longitude";
    /// Raw popularity: number of users tracking the node.
    pub const TRACKERS: &str = "trackers";
    /// Precomputed near-neutral popularity fallback.
    pub const POPULARITY_NORM: &str = "popularityNorm";
}

/// Relationship types of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelType {
    /// User explicitly tracks a venue, artist or event.
    Tracks,
    /// Materialised stand-in for "tracks an event hosted/played by".
    ProxyTracks,
    /// Co-occurrence similarity between two entities of the same kind.
    SimilarTo,
    /// Venue hosts event.
    Hosts,
    /// Artist plays event.
    Plays,
    /// Computed affinity from a user to an entity.
    HasAffinityFor,
}

impl RelType {
    /// Every relationship type, in declaration order.
    pub const ALL: [RelType; 6] = [
        RelType::Tracks,
        RelType::ProxyTracks,
        RelType::SimilarTo,
        RelType::Hosts,
        RelType::Plays,
        RelType::HasAffinityFor,
    ];

    /// Returns the canonical upper-case name (e.g. `SIMILAR_TO`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RelType::Tracks => "TRACKS",
            RelType::ProxyTracks => "PROXY_TRACKS",
            RelType::SimilarTo => "SIMILAR_TO",
            RelType::Hosts => "HOSTS",
            RelType::Plays => "PLAYS",
            RelType::HasAffinityFor => "HAS_AFFINITY_FOR",
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::Graph(format!("Unknown relationship type: {trimmed}")))
    }
}

/// Direction qualifier for relationship enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Relationships starting at the node.
    Outgoing,
    /// Relationships ending at the node.
    Incoming,
    /// Both, with self-loops reported once.
    Both,
}

/// A node in the graph.
///
/// # Example
///
/// ```rust
/// use affinity_core::graph::{labels, GraphNode};
/// use serde_json::json;
///
/// let venue = GraphNode::new(1, &[labels::VENUE, labels::ACTIVE])
///     .with_property("trackers", json!(500));
///
/// assert!(venue.has_label(labels::VENUE));
/// assert_eq!(venue.property("trackers"), Some(&json!(500)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    id: NodeId,
    labels: BTreeSet<String>,
    properties: HashMap<String, Value>,
}

impl GraphNode {
    /// Creates a node with the given ID and labels.
    #[must_use]
    pub fn new(id: NodeId, labels: &[&str]) -> Self {
        Self {
            id,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            properties: HashMap::new(),
        }
    }

    /// Replaces all properties (builder pattern).
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Adds one property (builder pattern).
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Returns the node ID.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the label set.
    #[must_use]
    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Returns true if the node carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Returns all properties.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    /// Returns a specific property value, if it exists.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Sets a property value.
    pub fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }
}

/// A directed, typed edge with properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    rel_type: RelType,
    properties: HashMap<String, Value>,
}

impl GraphEdge {
    /// Creates an edge with the given ID, endpoints and type.
    #[must_use]
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, rel_type: RelType) -> Self {
        Self {
            id,
            source,
            target,
            rel_type,
            properties: HashMap::new(),
        }
    }

    /// Replaces all properties (builder pattern).
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Adds one property (builder pattern).
    #[must_use]
    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Returns the edge ID.
    #[must_use]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the source node ID.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the target node ID.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the relationship type.
    #[must_use]
    pub fn rel_type(&self) -> RelType {
        self.rel_type
    }

    /// Returns all properties.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    /// Returns a specific property value, if it exists.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Sets a property value.
    pub fn set_property(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }

    /// Removes a property, returning its previous value.
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Returns the lightweight handle used by traversal.
    #[must_use]
    pub fn relationship(&self) -> Relationship {
        Relationship {
            id: self.id,
            rel_type: self.rel_type,
            start: self.source,
            end: self.target,
        }
    }
}

/// Lightweight, copyable handle to an edge as seen from a [`GraphView`].
///
/// [`GraphView`]: super::GraphView
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Edge ID.
    pub id: EdgeId,
    /// Edge type.
    pub rel_type: RelType,
    /// Node the edge starts at.
    pub start: NodeId,
    /// Node the edge ends at.
    pub end: NodeId,
}

impl Relationship {
    /// Returns the endpoint opposite to `node`.
    ///
    /// For a self-loop, or a `node` that is not an endpoint, returns `start`
    /// when `node` is `end` and `end` otherwise.
    #[must_use]
    pub fn other_node(&self, node: NodeId) -> NodeId {
        if node == self.end {
            self.start
        } else {
            self.end
        }
    }
}

