//! Path expansion: which relationships a partial path may follow next.
//!
//! Two traversal modes share one table. [`TrackMode::Direct`] walks through
//! the venue hosting (or artist playing) a tracked event as an explicit extra
//! hop; [`TrackMode::Proxy`] relies on precomputed `PROXY_TRACKS` edges for
//! that detour and so needs one fewer special-cased hop.

use serde_json::Value;

use crate::error::Result;
use crate::graph::{props, Direction, GraphView, RelType, Relationship};

use super::path::Path;
use super::role::{Depth, NodeRole, TargetKind, TrackMode};

const TRACKS: &[RelType] = &[RelType::Tracks];
const TRACKS_AND_PROXY: &[RelType] = &[RelType::Tracks, RelType::ProxyTracks];
const SIMILAR: &[RelType] = &[RelType::SimilarTo];
const HOSTS: &[RelType] = &[RelType::Hosts];
const PLAYS: &[RelType] = &[RelType::Plays];

/// One row of the expansion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    /// Relationship types to follow.
    pub types: &'static [RelType],
    /// Direction to follow them in.
    pub direction: Direction,
}

/// Looks up the expansion for a path at `depth` ending at a node with `role`.
///
/// `None` is a dead end. There is no row for lengths past [`Depth::Third`],
/// which makes the three-hop bound structural.
#[must_use]
pub const fn expansion(
    depth: Depth,
    role: NodeRole,
    mode: TrackMode,
    kind: TargetKind,
) -> Option<Expansion> {
    match (depth, role, mode) {
        (Depth::Source, _, TrackMode::Direct) => Some(Expansion {
            types: TRACKS,
            direction: Direction::Outgoing,
        }),
        (Depth::Source, _, TrackMode::Proxy) => Some(Expansion {
            types: TRACKS_AND_PROXY,
            direction: Direction::Outgoing,
        }),
        (Depth::First, NodeRole::Peer, _) | (Depth::Second, NodeRole::Peer, TrackMode::Direct) => {
            Some(Expansion {
                types: SIMILAR,
                direction: Direction::Both,
            })
        }
        (Depth::First, NodeRole::Event, TrackMode::Direct) => Some(Expansion {
            types: match kind {
                TargetKind::Venue => HOSTS,
                TargetKind::Artist => PLAYS,
            },
            direction: Direction::Incoming,
        }),
        _ => None,
    }
}

/// Expands partial paths against a [`GraphView`].
#[derive(Debug, Clone, Copy)]
pub struct PathExpander {
    mode: TrackMode,
    kind: TargetKind,
}

impl PathExpander {
    /// Creates an expander for one traversal.
    #[must_use]
    pub fn new(mode: TrackMode, kind: TargetKind) -> Self {
        Self { mode, kind }
    }

    /// Returns the relationships to follow from the end of `path`, whose end
    /// node has already been resolved to `role`.
    ///
    /// `PLAYS` detours only follow the current roster (`roster = 0`).
    pub fn expand<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        path: &Path,
        role: NodeRole,
    ) -> Result<Vec<Relationship>> {
        let Some(depth) = Depth::from_len(path.len()) else {
            return Ok(Vec::new());
        };
        let Some(rule) = expansion(depth, role, self.mode, self.kind) else {
            return Ok(Vec::new());
        };

        let mut rels = graph.relationships(path.end_node(), rule.direction, rule.types)?;
        if rule.types == PLAYS {
            let mut roster = Vec::with_capacity(rels.len());
            for rel in rels {
                if is_current_roster(graph.edge_property(rel.id, props::ROSTER)?.as_ref()) {
                    roster.push(rel);
                }
            }
            rels = roster;
        }
        Ok(rels)
    }
}

/// True when a `PLAYS.roster` value selects the current lineup.
pub(crate) fn is_current_roster(roster: Option<&Value>) -> bool {
    roster.and_then(Value::as_f64) == Some(0.0)
}
