//! Path classification and similarity statistics.
//!
//! Every accepted path is either *direct* (the user tracks a peer of the
//! target) or *proxy* (the peer was only reached through a tracked event).
//! Each `SIMILAR_TO` edge on a path feeds its `NMID` weight into the
//! statistics of the path's class.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::graph::{props, GraphView, NodeId, RelType};
use crate::traversal::{Path, TargetKind, TrackMode, Traversal};

/// Running count/sum/product/min of similarity weights for one path class.
///
/// An empty accumulator has `product = 1.0` and `min = 1.0`; only `count`
/// tells it apart from one fed a single weight of 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStats {
    /// Number of weights recorded.
    pub count: u64,
    /// Sum of weights.
    pub sum: f64,
    /// Product of weights.
    pub product: f64,
    /// Smallest weight.
    pub min: f64,
}

impl Default for PathStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            product: 1.0,
            min: 1.0,
        }
    }
}

impl PathStats {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one similarity weight.
    pub fn record(&mut self, weight: f64) {
        self.count += 1;
        self.sum += weight;
        self.product *= weight;
        self.min = self.min.min(weight);
    }

    /// Mean weight, `None` when nothing was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Class of an accepted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathClass {
    /// The user tracks a peer of the target.
    Direct,
    /// The peer is linked to the user only through an event.
    Proxy,
}

/// Classifies an accepted path.
///
/// In proxy mode a path is proxy iff it contains a `PROXY_TRACKS` edge. In
/// direct mode it is proxy iff it is longer than two hops (the event detour).
#[must_use]
pub fn classify(path: &Path, mode: TrackMode) -> PathClass {
    let proxy = match mode {
        TrackMode::Proxy => path.contains_type(RelType::ProxyTracks),
        TrackMode::Direct => path.len() > 2,
    };
    if proxy {
        PathClass::Proxy
    } else {
        PathClass::Direct
    }
}

/// Direct and proxy statistics for one (user, target) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    /// Statistics of direct paths.
    pub direct: PathStats,
    /// Statistics of proxy paths.
    pub proxy: PathStats,
}

impl PathSummary {
    /// Returns the statistics of `class`.
    #[must_use]
    pub fn class(&self, class: PathClass) -> &PathStats {
        match class {
            PathClass::Direct => &self.direct,
            PathClass::Proxy => &self.proxy,
        }
    }

    /// True when at least one class recorded a weight.
    #[must_use]
    pub fn has_evidence(&self) -> bool {
        !self.direct.is_empty() || !self.proxy.is_empty()
    }
}

/// Accumulates accepted paths into a [`PathSummary`].
#[derive(Debug, Clone, Copy)]
pub struct PathAggregator {
    mode: TrackMode,
    summary: PathSummary,
}

impl PathAggregator {
    /// Creates an aggregator for paths produced in `mode`.
    #[must_use]
    pub fn new(mode: TrackMode) -> Self {
        Self {
            mode,
            summary: PathSummary::default(),
        }
    }

    /// Adds one accepted path, reading `NMID` from each `SIMILAR_TO` edge.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProperty` when a `SIMILAR_TO` edge has no
    /// numeric `NMID`, and propagates graph read errors.
    pub fn add_path<G: GraphView + ?Sized>(&mut self, graph: &G, path: &Path) -> Result<()> {
        let stats = match classify(path, self.mode) {
            PathClass::Direct => &mut self.summary.direct,
            PathClass::Proxy => &mut self.summary.proxy,
        };
        for rel in path
            .relationships()
            .iter()
            .filter(|r| r.rel_type == RelType::SimilarTo)
        {
            let weight = graph
                .edge_property(rel.id, props::NMID)?
                .as_ref()
                .and_then(Value::as_f64)
                .ok_or_else(|| Error::InvalidProperty {
                    owner: format!("edge {}", rel.id),
                    name: props::NMID.to_string(),
                    reason: "expected a number".to_string(),
                })?;
            stats.record(weight);
        }
        Ok(())
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn finish(self) -> PathSummary {
        self.summary
    }
}

/// Runs the traversal from `source` to `target` and classifies every
/// accepted path.
///
/// The target kind is resolved from the target's labels. A missing node or a
/// target that is neither a venue nor an artist yields an empty summary.
///
/// # Errors
///
/// Propagates graph read errors and `Error::InvalidProperty` for a
/// `SIMILAR_TO` edge without a numeric `NMID`.
pub fn traverse_and_classify<G: GraphView + ?Sized>(
    graph: &G,
    source: NodeId,
    target: NodeId,
    use_proxy_tracks: bool,
) -> Result<PathSummary> {
    traverse_and_classify_with_budget(
        graph,
        source,
        target,
        TrackMode::from_flag(use_proxy_tracks),
        None,
    )
}

/// [`traverse_and_classify`] with an explicit mode and an optional step budget.
///
/// # Errors
///
/// As [`traverse_and_classify`], plus `Error::TraversalBudgetExceeded`.
pub fn traverse_and_classify_with_budget<G: GraphView + ?Sized>(
    graph: &G,
    source: NodeId,
    target: NodeId,
    mode: TrackMode,
    step_budget: Option<usize>,
) -> Result<PathSummary> {
    let Some(target_labels) = graph.labels(target)? else {
        return Ok(PathSummary::default());
    };
    let Some(kind) = TargetKind::from_labels(&target_labels) else {
        tracing::debug!(target, "Target is neither a venue nor an artist");
        return Ok(PathSummary::default());
    };

    let _span =
        tracing::debug_span!("traverse_and_classify", source, target, ?kind, ?mode).entered();
    let mut aggregator = PathAggregator::new(mode);
    Traversal::new(target, kind, mode)
        .with_step_budget(step_budget)
        .for_each_path(graph, source, |path| aggregator.add_path(graph, path))?;

    let summary = aggregator.finish();
    tracing::debug!(
        direct = summary.direct.count,
        proxy = summary.proxy.count,
        "Paths classified"
    );
    Ok(summary)
}
