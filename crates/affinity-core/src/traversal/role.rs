//! Node roles, traversal depth and tracking mode.
//!
//! These three tags are the whole input alphabet of the expansion and
//! evaluation tables: a node's labels are resolved into a [`NodeRole`] once
//! per traversal, path length becomes a [`Depth`], and the
//! `use_proxy_tracks` flag becomes a [`TrackMode`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::graph::{labels, RelType};

/// Kind of entity an affinity is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Venues: bridged through `SIMILAR_TO` between venues, detour via `HOSTS`.
    Venue,
    /// Artists: bridged through `SIMILAR_TO` between artists, detour via `PLAYS`.
    Artist,
}

impl TargetKind {
    /// Resolves the kind from a target's labels. `Venue` wins over `Artist`.
    #[must_use]
    pub fn from_labels(node_labels: &BTreeSet<String>) -> Option<Self> {
        if node_labels.contains(labels::VENUE) {
            Some(TargetKind::Venue)
        } else if node_labels.contains(labels::ARTIST) {
            Some(TargetKind::Artist)
        } else {
            None
        }
    }

    /// Label carried by entities of this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TargetKind::Venue => labels::VENUE,
            TargetKind::Artist => labels::ARTIST,
        }
    }

    /// Relationship linking an entity of this kind to an event.
    ///
    /// Followed in reverse from a tracked event to recover the entity.
    #[must_use]
    pub const fn detour(self) -> RelType {
        match self {
            TargetKind::Venue => RelType::Hosts,
            TargetKind::Artist => RelType::Plays,
        }
    }
}

/// Role a node plays in a traversal towards a target of some [`TargetKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The traversal source.
    User,
    /// An entity of the target's kind: can bridge via `SIMILAR_TO`.
    Peer,
    /// An event: can detour to its hosting venue or playing artist.
    Event,
    /// Anything else: a dead end.
    Other,
}

impl NodeRole {
    /// Resolves a role from labels. Precedence is Peer, Event, User, Other.
    #[must_use]
    pub fn resolve(node_labels: &BTreeSet<String>, kind: TargetKind) -> Self {
        if node_labels.contains(kind.label()) {
            NodeRole::Peer
        } else if node_labels.contains(labels::EVENT) {
            NodeRole::Event
        } else if node_labels.contains(labels::USER) {
            NodeRole::User
        } else {
            NodeRole::Other
        }
    }

    /// Resolves the role of a traversal's source node, where a `User` label
    /// takes precedence over every other label.
    #[must_use]
    pub fn resolve_source(node_labels: &BTreeSet<String>, kind: TargetKind) -> Self {
        if node_labels.contains(labels::USER) {
            NodeRole::User
        } else {
            Self::resolve(node_labels, kind)
        }
    }
}

/// Path length as a closed set. Lengths beyond three have no `Depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Depth {
    /// Length 0: only the source node.
    Source,
    /// Length 1: one tracked (or proxy-tracked) entity.
    First,
    /// Length 2.
    Second,
    /// Length 3: the hard bound.
    Third,
}

impl Depth {
    /// Maximum number of relationships on any explored path.
    pub const MAX_LEN: usize = 3;

    /// Maps a path length to a depth; `None` past the bound.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            0 => Some(Depth::Source),
            1 => Some(Depth::First),
            2 => Some(Depth::Second),
            3 => Some(Depth::Third),
            _ => None,
        }
    }

    /// Returns the path length this depth stands for.
    #[must_use]
    pub const fn path_len(self) -> usize {
        match self {
            Depth::Source => 0,
            Depth::First => 1,
            Depth::Second => 2,
            Depth::Third => 3,
        }
    }
}

/// How tracked events contribute to a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackMode {
    /// Walk `TRACKS` only; tracked events detour to their venue/artist.
    #[default]
    Direct,
    /// Walk `TRACKS` and precomputed `PROXY_TRACKS`; no event detour.
    Proxy,
}

impl TrackMode {
    /// Maps the `use_proxy_tracks` flag to a mode.
    #[must_use]
    pub const fn from_flag(use_proxy_tracks: bool) -> Self {
        if use_proxy_tracks {
            TrackMode::Proxy
        } else {
            TrackMode::Direct
        }
    }

    /// Returns true for [`TrackMode::Proxy`].
    #[must_use]
    pub const fn uses_proxy_tracks(self) -> bool {
        matches!(self, TrackMode::Proxy)
    }
}
