//! Error types for affinity-core.

use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::{EdgeId, NodeId};

/// Affinity computation error types.
///
/// Every variant is local to one (user, target) pair: callers processing
/// many pairs log the error and move on to the next pair.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing graph store failed to serve a read or a write.
    #[error("Graph store error: {0}")]
    Graph(String),

    /// A node referenced by a write does not exist.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// An edge referenced by a write does not exist.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// An edge already exists with this ID.
    #[error("Edge already exists: {0}")]
    EdgeExists(EdgeId),

    /// A node already exists with this ID.
    #[error("Node already exists: {0}")]
    NodeExists(NodeId),

    /// A property required by the computation is missing or has the wrong type.
    #[error("Invalid property '{name}' on {owner}: {reason}")]
    InvalidProperty {
        /// Human-readable owner, e.g. `edge 12`.
        owner: String,
        /// Property name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A log-likelihood contingency table had a negative cell.
    #[error("Invalid contingency table: {0}")]
    InvalidContingency(String),

    /// The caller-imposed traversal step budget was exhausted.
    #[error("Traversal budget of {0} steps exceeded")]
    TraversalBudgetExceeded(usize),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for affinity operations.
pub type Result<T> = std::result::Result<T, Error>;
