//! Path evaluation: prune, continue, or accept a partial path.

use crate::graph::{NodeId, RelType};

use super::path::Path;
use super::role::{Depth, NodeRole, TargetKind, TrackMode};

/// Outcome of evaluating one partial path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Drop the path and do not expand it.
    Prune,
    /// Keep expanding; the path itself is not a result.
    Continue,
    /// The path reached the target: emit it and stop expanding.
    Accept,
}

/// Everything the transition table needs to know about one partial path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Path length as a depth; `None` past the three-hop bound.
    pub depth: Option<Depth>,
    /// Role of the path's end node.
    pub role: NodeRole,
    /// Type of the last relationship, `None` for the zero-length path.
    pub last: Option<RelType>,
    /// True if the end node is the target.
    pub at_target: bool,
}

/// Transition table of the reached-target state machine.
///
/// * length 0: continue only from a user;
/// * length 1: continue through a non-target peer, or a tracked event in
///   direct mode;
/// * length 2–3: a detour edge (`HOSTS`/`PLAYS`) continues unless it landed
///   on the target itself, which is a tracked event of the target and not a
///   similarity path; any other edge accepts at the target and prunes
///   elsewhere;
/// * past length 3: prune.
#[must_use]
pub fn transition(step: Step, mode: TrackMode, kind: TargetKind) -> Evaluation {
    match step.depth {
        None => Evaluation::Prune,
        Some(Depth::Source) => match step.role {
            NodeRole::User => Evaluation::Continue,
            NodeRole::Peer | NodeRole::Event | NodeRole::Other => Evaluation::Prune,
        },
        Some(Depth::First) => match (step.at_target, step.role, mode) {
            (false, NodeRole::Peer, _) | (false, NodeRole::Event, TrackMode::Direct) => {
                Evaluation::Continue
            }
            _ => Evaluation::Prune,
        },
        Some(Depth::Second | Depth::Third) => {
            let via_detour = step.last == Some(kind.detour());
            match (via_detour, step.at_target) {
                (true, true) | (false, false) => Evaluation::Prune,
                (true, false) => Evaluation::Continue,
                (false, true) => Evaluation::Accept,
            }
        }
    }
}

/// Evaluates partial paths against a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct ReachedTargetEvaluator {
    target: NodeId,
    mode: TrackMode,
    kind: TargetKind,
}

impl ReachedTargetEvaluator {
    /// Creates an evaluator for one traversal.
    #[must_use]
    pub fn new(target: NodeId, mode: TrackMode, kind: TargetKind) -> Self {
        Self { target, mode, kind }
    }

    /// Returns the target node.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Evaluates `path`, whose end node has already been resolved to `role`.
    #[must_use]
    pub fn evaluate(&self, path: &Path, role: NodeRole) -> Evaluation {
        let step = Step {
            depth: Depth::from_len(path.len()),
            role,
            last: path.last_relationship().map(|r| r.rel_type),
            at_target: path.end_node() == self.target,
        };
        transition(step, self.mode, self.kind)
    }
}
