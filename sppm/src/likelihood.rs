//! Capability interface implemented by the likelihood variants.
//!
//! The core sampler is agnostic to the observation model; everything
//! touching per-cluster parameters is deferred to this trait and invoked
//! at fixed points of each sweep.

use crate::error::SppmError;
use rand::rngs::SmallRng;
use spatial_data::SpatialGraph;

/// Per-cluster parameter operations deferred by the core sampler.
///
/// `pi` is always a contiguous 1-based labeling (the relabel after each
/// partition sweep guarantees labels `1..=num_groups` with no gaps), so
/// implementations accumulate sufficient statistics into dense per-group
/// arrays.
pub trait ClusterLikelihood {
    /// Draw initial parameters under the all-singleton starting partition.
    fn generate_initial_theta(&mut self, rng: &mut SmallRng) -> anyhow::Result<()>;

    /// Recompute per-cluster sufficient statistics, draw one parameter set
    /// per cluster, and broadcast it to every member node.
    fn sample_theta(
        &mut self,
        pi: &[usize],
        num_groups: usize,
        rng: &mut SmallRng,
    ) -> anyhow::Result<()>;

    /// Marginal-likelihood log ratio of merging the two flagged node sets:
    /// log P(data_u ∪ data_v | one cluster)
    /// − log P(data_u | own cluster) − log P(data_v | own cluster).
    fn log_ratio_predictive(&self, set_u: &[bool], set_v: &[bool]) -> f64;

    /// Write the theta channel header row(s).
    fn write_theta_header(&mut self) -> anyhow::Result<()>;

    /// Append the current theta snapshot to the theta channel(s).
    fn hold_theta(&mut self) -> anyhow::Result<()>;

    /// Flush and close the theta channel(s).
    fn finish_theta(&mut self) -> anyhow::Result<()>;
}

/// Resolve one observation column from the graph, node-enumeration order.
///
/// A node without the attribute is an input-contract failure, raised
/// before any sampling starts.
pub(crate) fn resolve_attribute(graph: &SpatialGraph, attribute: &str) -> anyhow::Result<Vec<f64>> {
    let mut values = Vec::with_capacity(graph.num_nodes());
    for node in 0..graph.num_nodes() {
        match graph.attribute(node, attribute) {
            Some(x) => values.push(x),
            None => {
                return Err(SppmError::MissingAttribute {
                    node_id: graph.node_id(node),
                    attribute: attribute.to_string(),
                }
                .into())
            }
        }
    }
    Ok(values)
}
