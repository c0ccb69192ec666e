//! Spatial graph data for product partition models.
//!
//! A small data/IO crate: an arena-indexed undirected graph of spatial
//! units with per-node numeric attributes, plus loaders for two on-disk
//! formats (GeoJSON-style feature collections and the plain `.val`/`.adj`
//! sibling-file format). Everything is immutable after load; samplers
//! consume the graph read-only.

/// Gzip-aware buffered file reading
pub mod common_io;

/// Input error taxonomy
pub mod error;

/// GeoJSON-style feature-collection loader
pub mod geojson;

/// Arena-indexed spatial graph and builder
pub mod graph;

/// Plain `.val`/`.adj` sibling-file loader
pub mod simple;

pub use error::InputError;
pub use graph::{GraphBuilder, SpatialGraph};
