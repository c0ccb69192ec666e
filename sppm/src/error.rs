//! Error types for the SPPM sampler.
//!
//! Every failure aborts the whole run; a Markov chain is not resumable,
//! so there are no retry semantics anywhere.

use thiserror::Error;

/// Errors raised by sampler configuration, sampling, and recording.
#[derive(Debug, Error)]
pub enum SppmError {
    /// A shape/rate/precision hyperparameter is not strictly positive.
    #[error("domain error: {0}")]
    Domain(String),

    /// A recording sink failed to write; the chain cannot continue.
    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        /// Offending output path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A node lacks the attribute the likelihood was configured with.
    #[error("node {node_id} is missing attribute '{attribute}'")]
    MissingAttribute {
        /// External id of the offending node
        node_id: i64,
        /// The configured attribute name
        attribute: String,
    },

    /// The sampler was driven out of its state-machine order.
    #[error("invalid sampler state: {0}")]
    InvalidState(String),
}
