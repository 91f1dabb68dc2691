//! Depth-first traversal driver.
//!
//! Repeatedly applies the [`ReachedTargetEvaluator`] and [`PathExpander`]
//! from a source node, with relationship-path uniqueness: an edge may not
//! appear twice on one path, but nodes may be revisited through different
//! edges.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::{GraphView, NodeId};

use super::evaluator::{Evaluation, ReachedTargetEvaluator};
use super::expander::PathExpander;
use super::path::Path;
use super::role::{NodeRole, TargetKind, TrackMode};

/// Counters reported by a finished traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Partial paths evaluated.
    pub steps: usize,
    /// Paths accepted as reaching the target.
    pub accepted: usize,
}

/// A configured traversal from some source to one target.
///
/// # Example
///
/// ```rust
/// use affinity_core::graph::{labels, GraphNode, InMemoryGraph, RelType};
/// use affinity_core::traversal::{TargetKind, TrackMode, Traversal};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut graph = InMemoryGraph::new();
/// graph.add_node(GraphNode::new(1, &[labels::USER])).unwrap();
/// graph.add_node(GraphNode::new(2, &[labels::VENUE])).unwrap();
/// graph.add_node(GraphNode::new(3, &[labels::VENUE, labels::ACTIVE])).unwrap();
/// graph.connect(1, 2, RelType::Tracks).unwrap();
/// let nmid = HashMap::from([("NMID".to_string(), json!(0.9))]);
/// graph.connect_with(3, 2, RelType::SimilarTo, nmid).unwrap();
///
/// let paths = Traversal::new(3, TargetKind::Venue, TrackMode::Direct)
///     .paths(&graph, 1)
///     .unwrap();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].nodes(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Traversal {
    evaluator: ReachedTargetEvaluator,
    expander: PathExpander,
    kind: TargetKind,
    step_budget: Option<usize>,
}

impl Traversal {
    /// Creates a traversal towards `target`, an entity of `kind`.
    #[must_use]
    pub fn new(target: NodeId, kind: TargetKind, mode: TrackMode) -> Self {
        Self {
            evaluator: ReachedTargetEvaluator::new(target, mode, kind),
            expander: PathExpander::new(mode, kind),
            kind,
            step_budget: None,
        }
    }

    /// Caps the number of evaluated partial paths (builder pattern).
    #[must_use]
    pub fn with_step_budget(mut self, budget: Option<usize>) -> Self {
        self.step_budget = budget;
        self
    }

    /// Streams every accepted path from `source` into `sink`.
    ///
    /// # Errors
    ///
    /// Propagates graph read errors and errors returned by `sink`, and returns
    /// `Error::TraversalBudgetExceeded` when the step budget runs out.
    pub fn for_each_path<G, F>(&self, graph: &G, source: NodeId, sink: F) -> Result<TraversalStats>
    where
        G: GraphView + ?Sized,
        F: FnMut(&Path) -> Result<()>,
    {
        let mut walker = Walker {
            graph,
            traversal: self,
            roles: FxHashMap::default(),
            stats: TraversalStats::default(),
            sink,
        };
        let mut path = Path::new(source);
        walker.visit(&mut path)?;

        tracing::trace!(
            source,
            target = self.evaluator.target(),
            steps = walker.stats.steps,
            accepted = walker.stats.accepted,
            "Traversal finished"
        );
        Ok(walker.stats)
    }

    /// Collects every accepted path from `source`.
    pub fn paths<G: GraphView + ?Sized>(&self, graph: &G, source: NodeId) -> Result<Vec<Path>> {
        let mut paths = Vec::new();
        self.for_each_path(graph, source, |path| {
            paths.push(path.clone());
            Ok(())
        })?;
        Ok(paths)
    }
}

struct Walker<'a, G: ?Sized, F> {
    graph: &'a G,
    traversal: &'a Traversal,
    /// Roles resolved once per node for this traversal.
    roles: FxHashMap<NodeId, NodeRole>,
    stats: TraversalStats,
    sink: F,
}

impl<G, F> Walker<'_, G, F>
where
    G: GraphView + ?Sized,
    F: FnMut(&Path) -> Result<()>,
{
    fn visit(&mut self, path: &mut Path) -> Result<()> {
        self.stats.steps += 1;
        if let Some(budget) = self.traversal.step_budget {
            if self.stats.steps > budget {
                return Err(Error::TraversalBudgetExceeded(budget));
            }
        }

        let role = if path.is_empty() {
            self.source_role(path.end_node())?
        } else {
            self.role_of(path.end_node())?
        };
        match self.traversal.evaluator.evaluate(path, role) {
            Evaluation::Prune => return Ok(()),
            Evaluation::Accept => {
                self.stats.accepted += 1;
                return (self.sink)(path);
            }
            Evaluation::Continue => {}
        }

        for rel in self.traversal.expander.expand(self.graph, path, role)? {
            if path.contains_relationship(rel.id) {
                continue;
            }
            path.push(rel);
            let outcome = self.visit(path);
            path.pop();
            outcome?;
        }
        Ok(())
    }

    /// The source is resolved apart from the cache: a `User` that also
    /// carries an entity label is a user at length 0 and a peer elsewhere.
    fn source_role(&self, node: NodeId) -> Result<NodeRole> {
        Ok(match self.graph.labels(node)? {
            Some(labels) => NodeRole::resolve_source(&labels, self.traversal.kind),
            None => NodeRole::Other,
        })
    }

    fn role_of(&mut self, node: NodeId) -> Result<NodeRole> {
        if let Some(role) = self.roles.get(&node) {
            return Ok(*role);
        }
        let role = match self.graph.labels(node)? {
            Some(labels) => NodeRole::resolve(&labels, self.traversal.kind),
            None => NodeRole::Other,
        };
        self.roles.insert(node, role);
        Ok(role)
    }
}
