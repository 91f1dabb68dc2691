//! Bounded multi-hop traversal from a user towards one target entity.
//!
//! The traversal discovers the similarity paths that connect a user to a
//! venue (or artist) through the entities the user tracks:
//!
//! ```text
//! User -TRACKS-> Venue -SIMILAR_TO- Target                         (direct)
//! User -TRACKS-> Event <-HOSTS- Venue -SIMILAR_TO- Target          (proxy, 3 hops)
//! User -PROXY_TRACKS-> Venue -SIMILAR_TO- Target                   (proxy)
//! ```
//!
//! It is split into a pure [`expansion`] table, a pure [`transition`] table
//! and a depth-first [`Traversal`] driver. No path ever exceeds
//! [`Depth::MAX_LEN`] relationships.

mod engine;
mod evaluator;
mod expander;
mod path;
mod role;

#[cfg(test)]
mod engine_tests;

pub use engine::{Traversal, TraversalStats};
pub use evaluator::{transition, Evaluation, ReachedTargetEvaluator, Step};
pub use expander::{expansion, Expansion, PathExpander};
pub use path::Path;
pub use role::{Depth, NodeRole, TargetKind, TrackMode};

pub(crate) use expander::is_current_roster;
