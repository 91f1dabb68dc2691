//! Single-pair affinity computation written back to the graph.
//!
//! [`AffinityCalculator`] runs the traversal for one (user, target) pair,
//! combines the statistics and stores them on the user's
//! `HAS_AFFINITY_FOR` relationship to the target. Every call is a full
//! recomputation: statistics are overwritten, never accumulated, so
//! rerunning on an unchanged graph writes identical values.

use serde_json::{json, Value};

use crate::aggregate::{traverse_and_classify_with_budget, PathStats, PathSummary};
use crate::config::{AffinityConfig, TraversalConfig};
use crate::error::Result;
use crate::graph::{labels, props, Direction, EdgeId, GraphView, GraphWrite, NodeId, RelType};
use crate::scoring::{node_distance_m, ParetoThresholds, ScoreCombiner};
use crate::traversal::{is_current_roster, TargetKind, TrackMode};

/// Property names written on `HAS_AFFINITY_FOR` relationships.
pub mod keys {
    /// Smallest direct similarity weight.
    pub const MIN: &str = "min";
    /// Mean direct similarity weight.
    pub const AVG: &str = "avg";
    /// Product of direct similarity weights.
    pub const PROD: &str = "prod";
    /// Number of direct similarity weights.
    pub const COUNT: &str = "count";
    /// Smallest proxy similarity weight.
    pub const PROXY_MIN: &str = "proxyMin";
    /// Mean proxy similarity weight.
    pub const PROXY_AVG: &str = "proxyAvg";
    /// Product of proxy similarity weights.
    pub const PROXY_PROD: &str = "proxyProd";
    /// Number of proxy similarity weights.
    pub const PROXY_COUNT: &str = "proxyCount";
    /// Great-circle distance in metres.
    pub const DISTANCE_M: &str = "distanceM";
    /// Distance contribution.
    pub const DISTANCE_NORM: &str = "distanceNorm";
    /// Combined affinity.
    pub const AFFINITY: &str = "affinity";
    /// Artist side of an event affinity.
    pub const ARTIST_AFFINITY: &str = "artistAffinity";
    /// Venue side of an event affinity.
    pub const VENUE_AFFINITY: &str = "venueAffinity";
}

struct ClassKeys {
    min: &'static str,
    avg: &'static str,
    prod: &'static str,
    count: &'static str,
}

const DIRECT_KEYS: ClassKeys = ClassKeys {
    min: keys::MIN,
    avg: keys::AVG,
    prod: keys::PROD,
    count: keys::COUNT,
};

const PROXY_KEYS: ClassKeys = ClassKeys {
    min: keys::PROXY_MIN,
    avg: keys::PROXY_AVG,
    prod: keys::PROXY_PROD,
    count: keys::PROXY_COUNT,
};

/// What a venue or artist computation stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityRecord {
    /// The `HAS_AFFINITY_FOR` relationship written.
    pub edge: EdgeId,
    /// Direct and proxy statistics.
    pub summary: PathSummary,
    /// Distance in metres, venues with coordinates only.
    pub distance_m: Option<f64>,
    /// Distance contribution, venues with coordinates only.
    pub distance_norm: Option<f64>,
    /// Combined affinity, `None` when there was no evidence.
    pub affinity: Option<f64>,
}

/// What an event computation stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventAffinity {
    /// The `HAS_AFFINITY_FOR` relationship written.
    pub edge: EdgeId,
    /// Strongest input over the event's current-roster artists.
    pub artist_affinity: f64,
    /// Strongest input over the event's hosting venues.
    pub venue_affinity: f64,
    /// Noisy-OR of both sides.
    pub affinity: f64,
}

/// Outcome of a batch of single-pair computations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Pairs that wrote a relationship.
    pub written: usize,
    /// Pairs that were a no-op.
    pub skipped: usize,
    /// Pairs that failed; each failure is logged.
    pub failed: usize,
}

/// Computes and stores user affinities.
///
/// # Example
///
/// ```rust
/// use affinity_core::graph::{labels, GraphNode, InMemoryGraph, RelType};
/// use affinity_core::AffinityCalculator;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut graph = InMemoryGraph::new();
/// graph.add_node(GraphNode::new(1, &[labels::USER])).unwrap();
/// graph.add_node(GraphNode::new(2, &[labels::VENUE])).unwrap();
/// graph.add_node(GraphNode::new(3, &[labels::VENUE, labels::ACTIVE])).unwrap();
/// graph.connect(1, 2, RelType::Tracks).unwrap();
/// let nmid = HashMap::from([("NMID".to_string(), json!(0.9))]);
/// graph.connect_with(2, 3, RelType::SimilarTo, nmid).unwrap();
///
/// let calculator = AffinityCalculator::default();
/// let record = calculator
///     .calculate_venue_affinity(&mut graph, 1, 3, false)
///     .unwrap()
///     .unwrap();
/// assert_eq!(record.summary.direct.count, 1);
/// assert_eq!(record.affinity, Some(0.9));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AffinityCalculator {
    combiner: ScoreCombiner,
    traversal: TraversalConfig,
}

impl AffinityCalculator {
    /// Creates a calculator from a loaded configuration.
    #[must_use]
    pub fn new(config: &AffinityConfig) -> Self {
        Self {
            combiner: ScoreCombiner::new(config.scoring.clone()),
            traversal: config.traversal.clone(),
        }
    }

    /// Returns the score combiner.
    #[must_use]
    pub fn combiner(&self) -> &ScoreCombiner {
        &self.combiner
    }

    /// Default for `use_proxy_tracks` taken from the configuration.
    #[must_use]
    pub fn use_proxy_tracks(&self) -> bool {
        self.traversal.use_proxy_tracks
    }

    /// Computes and stores the affinity of `user` for `venue`.
    ///
    /// Returns `Ok(None)` without writing when either node is missing, the
    /// target is not a venue, or there is neither path evidence nor a
    /// distance contribution.
    pub fn calculate_venue_affinity<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
        venue: NodeId,
        use_proxy_tracks: bool,
    ) -> Result<Option<AffinityRecord>> {
        self.calculate_entity_affinity(graph, user, venue, TargetKind::Venue, use_proxy_tracks)
    }

    /// Computes and stores the affinity of `user` for `artist`.
    ///
    /// Returns `Ok(None)` without writing when either node is missing, the
    /// target is not an artist, or there is no path evidence.
    pub fn calculate_artist_affinity<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
        artist: NodeId,
        use_proxy_tracks: bool,
    ) -> Result<Option<AffinityRecord>> {
        self.calculate_entity_affinity(graph, user, artist, TargetKind::Artist, use_proxy_tracks)
    }

    fn calculate_entity_affinity<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
        target: NodeId,
        kind: TargetKind,
        use_proxy_tracks: bool,
    ) -> Result<Option<AffinityRecord>> {
        let _span = tracing::debug_span!("entity_affinity", user, target, ?kind).entered();

        if !graph.contains_node(user)? {
            tracing::debug!("User not found");
            return Ok(None);
        }
        let Some(target_labels) = graph.labels(target)? else {
            tracing::debug!("Target not found");
            return Ok(None);
        };
        if TargetKind::from_labels(&target_labels) != Some(kind) {
            tracing::debug!("Target has the wrong kind");
            return Ok(None);
        }

        let mut edge = graph
            .relationship_between(user, target, RelType::HasAffinityFor)?
            .map(|rel| rel.id);

        let distance_m = match kind {
            TargetKind::Venue => node_distance_m(graph, user, target)?,
            TargetKind::Artist => None,
        };
        let distance_norm = distance_m.map(|d| self.combiner.distance_norm(d));

        let mode = TrackMode::from_flag(use_proxy_tracks);
        let summary = traverse_and_classify_with_budget(
            graph,
            user,
            target,
            mode,
            self.traversal.step_budget,
        )?;

        let affinity = (summary.has_evidence() || distance_m.is_some()).then(|| match kind {
            TargetKind::Venue => self
                .combiner
                .venue_affinity(&summary.direct, &summary.proxy, distance_m),
            TargetKind::Artist => self.combiner.artist_affinity(&summary.direct, &summary.proxy),
        });

        if edge.is_none() && affinity.is_some() {
            edge = Some(
                graph
                    .create_relationship(user, target, RelType::HasAffinityFor)?
                    .id,
            );
        }
        let Some(edge) = edge else {
            return Ok(None);
        };

        set_or_remove(graph, edge, keys::DISTANCE_M, distance_m)?;
        set_or_remove(graph, edge, keys::DISTANCE_NORM, distance_norm)?;
        write_class(graph, edge, &DIRECT_KEYS, &summary.direct)?;
        write_class(graph, edge, &PROXY_KEYS, &summary.proxy)?;
        set_or_remove(graph, edge, keys::AFFINITY, affinity)?;

        tracing::debug!(
            edge,
            direct = summary.direct.count,
            proxy = summary.proxy.count,
            affinity = ?affinity,
            "Affinity written"
        );
        Ok(Some(AffinityRecord {
            edge,
            summary,
            distance_m,
            distance_norm,
            affinity,
        }))
    }

    /// Computes and stores the affinity of `user` for a future `event`.
    ///
    /// Each side takes the strongest input over the event's current-roster
    /// artists and hosting venues; an input is the user's existing affinity
    /// for that entity, else its `popularityNorm`, else a popularity norm
    /// computed from its `trackers`. Returns `Ok(None)` when the event is not
    /// labelled `Future`, the user tracks the event or any of its artists or
    /// venues, or either side has no entity. In those cases an existing
    /// `HAS_AFFINITY_FOR` relationship has its event fields removed.
    pub fn calculate_event_affinity<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
        event: NodeId,
    ) -> Result<Option<EventAffinity>> {
        let _span = tracing::debug_span!("event_affinity", user, event).entered();

        if !graph.contains_node(user)? {
            return Ok(None);
        }
        let existing = graph
            .relationship_between(user, event, RelType::HasAffinityFor)?
            .map(|rel| rel.id);

        let Some((artist_affinity, venue_affinity)) = self.event_inputs(graph, user, event)? else {
            if let Some(edge) = existing {
                for key in [keys::ARTIST_AFFINITY, keys::VENUE_AFFINITY, keys::AFFINITY] {
                    graph.remove_edge_property(edge, key)?;
                }
                tracing::debug!(edge, "Stale event affinity cleared");
            }
            return Ok(None);
        };
        let affinity = self
            .combiner
            .event_affinity(artist_affinity, venue_affinity);

        let edge = match existing {
            Some(edge) => edge,
            None => {
                graph
                    .create_relationship(user, event, RelType::HasAffinityFor)?
                    .id
            }
        };
        graph.set_edge_property(edge, keys::ARTIST_AFFINITY, json!(artist_affinity))?;
        graph.set_edge_property(edge, keys::VENUE_AFFINITY, json!(venue_affinity))?;
        graph.set_edge_property(edge, keys::AFFINITY, json!(affinity))?;

        tracing::debug!(edge, affinity, "Event affinity written");
        Ok(Some(EventAffinity {
            edge,
            artist_affinity,
            venue_affinity,
            affinity,
        }))
    }

    /// Artist and venue sides of an event, `None` when the event does not qualify.
    fn event_inputs<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        user: NodeId,
        event: NodeId,
    ) -> Result<Option<(f64, f64)>> {
        if !graph.has_label(event, labels::FUTURE)? {
            tracing::debug!("Not a future event");
            return Ok(None);
        }
        if tracks(graph, user, event)? {
            tracing::debug!("Event already tracked");
            return Ok(None);
        }

        let artists = current_roster(graph, event)?;
        let venues: Vec<NodeId> = graph
            .relationships(event, Direction::Incoming, &[RelType::Hosts])?
            .into_iter()
            .map(|rel| rel.start)
            .collect();
        if artists.is_empty() || venues.is_empty() {
            tracing::debug!(
                artists = artists.len(),
                venues = venues.len(),
                "Event lacks an artist or a venue"
            );
            return Ok(None);
        }
        for &entity in artists.iter().chain(&venues) {
            if tracks(graph, user, entity)? {
                tracing::debug!(entity, "Artist or venue already tracked");
                return Ok(None);
            }
        }

        let artist_affinity = self.strongest_input(graph, user, &artists, TargetKind::Artist)?;
        let venue_affinity = self.strongest_input(graph, user, &venues, TargetKind::Venue)?;
        Ok(Some((artist_affinity, venue_affinity)))
    }

    fn strongest_input<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        user: NodeId,
        entities: &[NodeId],
        kind: TargetKind,
    ) -> Result<f64> {
        let mut strongest = f64::NEG_INFINITY;
        for &entity in entities {
            strongest = strongest.max(self.entity_input(graph, user, entity, kind)?);
        }
        Ok(strongest)
    }

    fn entity_input<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        user: NodeId,
        entity: NodeId,
        kind: TargetKind,
    ) -> Result<f64> {
        if let Some(rel) = graph.relationship_between(user, entity, RelType::HasAffinityFor)? {
            if let Some(affinity) = graph
                .edge_property(rel.id, keys::AFFINITY)?
                .as_ref()
                .and_then(Value::as_f64)
            {
                return Ok(affinity);
            }
        }
        if let Some(norm) = graph.node_f64(entity, props::POPULARITY_NORM)? {
            return Ok(norm);
        }
        let trackers = graph.node_f64(entity, props::TRACKERS)?.unwrap_or(0.0);
        Ok(self
            .combiner
            .popularity_norm(trackers, self.popularity_thresholds(kind)))
    }

    fn popularity_thresholds(&self, kind: TargetKind) -> &ParetoThresholds {
        match kind {
            TargetKind::Venue => &self.combiner.config().venue_popularity,
            TargetKind::Artist => &self.combiner.config().artist_popularity,
        }
    }

    /// Links `user` to the venues and current-roster artists of the events
    /// it tracks with `PROXY_TRACKS {proxy: true}`.
    ///
    /// Entities the user already tracks or proxy-tracks are skipped, so the
    /// operation is idempotent. Returns the number of relationships created.
    pub fn add_proxy_tracks<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
    ) -> Result<usize> {
        let _span = tracing::debug_span!("add_proxy_tracks", user).entered();
        if !graph.contains_node(user)? {
            return Ok(0);
        }

        let mut created = 0;
        for tracked in graph.relationships(user, Direction::Outgoing, &[RelType::Tracks])? {
            let event = tracked.end;
            if !graph.has_label(event, labels::EVENT)? {
                continue;
            }
            let mut entities: Vec<NodeId> = graph
                .relationships(event, Direction::Incoming, &[RelType::Hosts])?
                .into_iter()
                .map(|rel| rel.start)
                .collect();
            entities.extend(current_roster(graph, event)?);

            for entity in entities {
                if tracks(graph, user, entity)?
                    || graph
                        .relationship_between(user, entity, RelType::ProxyTracks)?
                        .is_some()
                {
                    continue;
                }
                let rel = graph.create_relationship(user, entity, RelType::ProxyTracks)?;
                graph.set_edge_property(rel.id, props::PROXY, json!(true))?;
                created += 1;
            }
        }

        tracing::debug!(created, "Proxy tracks added");
        Ok(created)
    }

    /// Sets `popularityNorm` on every node labelled `label` from its
    /// `trackers` (missing counts as zero). Returns the number of nodes updated.
    pub fn add_popularity_norm<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        label: &str,
        thresholds: &ParetoThresholds,
    ) -> Result<usize> {
        let nodes = graph.nodes_with_label(label)?;
        for &node in &nodes {
            let trackers = graph.node_f64(node, props::TRACKERS)?.unwrap_or(0.0);
            let norm = self.combiner.popularity_norm(trackers, thresholds);
            graph.set_node_property(node, props::POPULARITY_NORM, json!(norm))?;
        }
        tracing::info!(label, updated = nodes.len(), "Popularity norm added");
        Ok(nodes.len())
    }

    /// Runs [`calculate_venue_affinity`](Self::calculate_venue_affinity) for
    /// each venue.
    ///
    /// A failing pair is logged and counted; the remaining pairs still run.
    pub fn calculate_venue_affinities<G: GraphWrite + ?Sized>(
        &self,
        graph: &mut G,
        user: NodeId,
        venues: &[NodeId],
        use_proxy_tracks: bool,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for &venue in venues {
            match self.calculate_venue_affinity(graph, user, venue, use_proxy_tracks) {
                Ok(Some(_)) => report.written += 1,
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(user, venue, error = %e, "Venue affinity failed");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(
            user,
            written = report.written,
            skipped = report.skipped,
            failed = report.failed,
            "Venue affinities calculated"
        );
        report
    }
}

fn tracks<G: GraphView + ?Sized>(graph: &G, user: NodeId, entity: NodeId) -> Result<bool> {
    Ok(graph
        .relationship_between(user, entity, RelType::Tracks)?
        .is_some())
}

/// Artists playing `event` in its current lineup.
fn current_roster<G: GraphView + ?Sized>(graph: &G, event: NodeId) -> Result<Vec<NodeId>> {
    let mut artists = Vec::new();
    for rel in graph.relationships(event, Direction::Incoming, &[RelType::Plays])? {
        if is_current_roster(graph.edge_property(rel.id, props::ROSTER)?.as_ref()) {
            artists.push(rel.start);
        }
    }
    Ok(artists)
}

fn set_or_remove<G: GraphWrite + ?Sized>(
    graph: &mut G,
    edge: EdgeId,
    key: &str,
    value: Option<f64>,
) -> Result<()> {
    match value {
        Some(v) => graph.set_edge_property(edge, key, json!(v)),
        None => graph.remove_edge_property(edge, key).map(|_| ()),
    }
}

/// Overwrites one class's statistics, or clears them when the class is empty.
fn write_class<G: GraphWrite + ?Sized>(
    graph: &mut G,
    edge: EdgeId,
    class: &ClassKeys,
    stats: &PathStats,
) -> Result<()> {
    match stats.average() {
        Some(avg) => {
            graph.set_edge_property(edge, class.min, json!(stats.min))?;
            graph.set_edge_property(edge, class.avg, json!(avg))?;
            graph.set_edge_property(edge, class.prod, json!(stats.product))?;
            graph.set_edge_property(edge, class.count, json!(stats.count))
        }
        None => {
            for key in [class.min, class.avg, class.prod, class.count] {
                graph.remove_edge_property(edge, key)?;
            }
            Ok(())
        }
    }
}
