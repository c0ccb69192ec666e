//! Spatial Product Partition Model (SPPM) sampler.
//!
//! Bayesian clustering of spatially linked units: an MCMC sampler over an
//! undirected graph infers a contiguity-constrained partition, per-cluster
//! latent parameters, and a spatial-cohesion hyperparameter. Partitions
//! are explored by pruning and regrowing a random spanning tree; cluster
//! parameters are integrated out of the merge/split decisions via
//! conjugate marginal likelihoods.
//!
//! # Model
//!
//! Two exchangeable likelihood families: Normal with a Normal-Gamma prior,
//! and Poisson rates with exposures under a Gamma prior.
//!
//! # References
//!
//! Teixeira, Assunção & Loschi (2019). "Bayesian space-time partitioning
//! by sampling and pruning spanning trees." JMLR 20(85).

/// Breadth-first connectivity under an edge-enabled filter
pub mod components;

/// Error taxonomy
pub mod error;

/// Capability interface implemented by the likelihood variants
pub mod likelihood;

/// Minimum spanning tree/forest via Kruskal's algorithm
pub mod mst;

/// Normal likelihood with a Normal-Gamma conjugate prior
pub mod normal;

/// Recording sinks for retained samples
pub mod output;

/// Poisson-rate likelihood with a Gamma conjugate prior
pub mod poisson;

/// Beta/Gamma/Normal variate generation
pub mod rand_util;

/// The core partition/rho/tree Markov-chain state machine
pub mod sampler;

pub use error::SppmError;
pub use normal::NormalGamma;
pub use poisson::GammaPoisson;
pub use sampler::{ChainSinks, Sppm, SppmOptions};
