//! Error types for spatial data loading.
//!
//! Every loader failure is fatal: the sampler is never started on a
//! partially-loaded graph.

use thiserror::Error;

/// Errors raised while loading graph topology and node attributes.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be opened or read.
    #[error("failed to read input file {path}: {source}")]
    Io {
        /// Offending file path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The input file parsed, but its content violates the format.
    #[error("malformed input in {path}: {reason}")]
    Malformed {
        /// Offending file path
        path: String,
        /// Human-readable description of the violation
        reason: String,
    },

    /// A neighbour list references a node id that was never declared.
    #[error("unresolved neighbour reference: {from} -> {to}")]
    UnresolvedNeighbour {
        /// Node whose neighbour list holds the reference
        from: i64,
        /// The undeclared node id
        to: i64,
    },

    /// The same external node id was declared twice.
    #[error("duplicate node id {0}")]
    DuplicateNode(i64),

    /// An edge connects a node to itself.
    #[error("self-loop on node id {0}")]
    SelfLoop(i64),

    /// The loaded graph is not connected.
    #[error("input graph is not connected")]
    Disconnected,
}
