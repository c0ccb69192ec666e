//! The core partition/rho/tree Markov-chain state machine.
//!
//! One sweep updates, in this fixed order: the partition (tree-edge
//! surgery with marginal-likelihood ratio tests), the cohesion parameter
//! rho, the per-cluster parameters (delegated to the likelihood variant),
//! and finally the spanning tree (partition-biased reweighting plus a
//! full Kruskal recompute). Retained sweeps are appended to the
//! recording sinks.
//!
//! The within-sweep edge scan is sequential by design: each edge decision
//! observes the toggles made earlier in the same sweep, and the full
//! relabel afterwards is the single source of truth for cluster ids.

use crate::components::{label_components, reachable_from};
use crate::error::SppmError;
use crate::likelihood::ClusterLikelihood;
use crate::mst::kruskal;
use crate::output::SampleSink;
use crate::rand_util::rbeta;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use spatial_data::SpatialGraph;

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct SppmOptions {
    /// Shape alpha of the Beta prior on rho. Default: 2
    pub rho_alpha: f64,
    /// Shape beta of the Beta prior on rho. Default: 5
    pub rho_beta: f64,
    /// Random seed. Default: 42
    pub seed: u64,
}

impl Default for SppmOptions {
    fn default() -> Self {
        SppmOptions {
            rho_alpha: 2.0,
            rho_beta: 5.0,
            seed: 42,
        }
    }
}

/// Recording sinks for the three core channels.
pub struct ChainSinks {
    /// Partition channel: one cluster id per node, node-enumeration order
    pub partition: Box<dyn SampleSink>,
    /// Tree channel: external-id endpoint pairs of every enabled tree edge
    pub tree: Box<dyn SampleSink>,
    /// Rho channel: a single scalar column
    pub rho: Box<dyn SampleSink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Initialized,
    Running,
    Finished,
}

/// Spatial product partition model sampler.
pub struct Sppm<L: ClusterLikelihood> {
    graph: SpatialGraph,
    likelihood: L,
    rho_alpha: f64,
    rho_beta: f64,
    rng: SmallRng,
    phase: Phase,

    // current chain state
    rho: f64,
    pi: Vec<usize>,
    num_groups: usize,
    tree: Vec<bool>,

    // per-sweep scratch
    filter: Vec<bool>,
    weights: Vec<f64>,
    set_u: Vec<bool>,
    set_v: Vec<bool>,

    sinks: ChainSinks,
}

impl<L: ClusterLikelihood> std::fmt::Debug for Sppm<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sppm")
            .field("rho_alpha", &self.rho_alpha)
            .field("rho_beta", &self.rho_beta)
            .field("phase", &self.phase)
            .field("num_groups", &self.num_groups)
            .finish_non_exhaustive()
    }
}

impl<L: ClusterLikelihood> Sppm<L> {
    /// Create a sampler over a loaded graph.
    ///
    /// Fails fast with a domain error if the Beta prior on rho is not
    /// strictly positive.
    pub fn new(
        graph: SpatialGraph,
        likelihood: L,
        options: SppmOptions,
        sinks: ChainSinks,
    ) -> anyhow::Result<Self> {
        if !(options.rho_alpha > 0.0) || !(options.rho_beta > 0.0) {
            return Err(SppmError::Domain(format!(
                "rho ~ Beta(alpha={}, beta={}) requires strictly positive parameters",
                options.rho_alpha, options.rho_beta
            ))
            .into());
        }
        info!(
            "Initializing SPPM: {} nodes, {} edges, rho ~ Beta(alpha={}, beta={})",
            graph.num_nodes(),
            graph.num_edges(),
            options.rho_alpha,
            options.rho_beta
        );

        let n = graph.num_nodes();
        let m = graph.num_edges();
        Ok(Sppm {
            graph,
            likelihood,
            rho_alpha: options.rho_alpha,
            rho_beta: options.rho_beta,
            rng: SmallRng::seed_from_u64(options.seed),
            phase: Phase::Uninitialized,
            rho: 0.0,
            pi: vec![0; n],
            num_groups: 0,
            tree: vec![false; m],
            filter: vec![false; m],
            weights: vec![0.0; m],
            set_u: Vec::new(),
            set_v: Vec::new(),
            sinks,
        })
    }

    /// Run the chain: initialize, sweep `num_iter` times, and record every
    /// `step_size`-th sweep after `burn_in`.
    pub fn run(&mut self, num_iter: usize, burn_in: usize, step_size: usize) -> anyhow::Result<()> {
        if step_size == 0 {
            return Err(SppmError::Domain("step_size must be >= 1".to_string()).into());
        }
        info!(
            "Running SPPM sampler for {} iterations (burn-in {}, thinning {})",
            num_iter, burn_in, step_size
        );

        self.prepare_output()?;
        self.generate_initial_state()?;
        self.hold_sample()?;

        self.phase = Phase::Running;
        let report_every = (num_iter / 10).max(1);
        for iter in 1..=num_iter {
            self.sample_partition()?;
            self.sample_rho()?;
            self.likelihood
                .sample_theta(&self.pi, self.num_groups, &mut self.rng)?;
            self.sample_tree();

            if iter > burn_in && iter % step_size == 0 {
                self.hold_sample()?;
            }
            if iter % report_every == 0 {
                debug!(
                    "iteration {} of {}: {} clusters, rho={:.4}",
                    iter, num_iter, self.num_groups, self.rho
                );
            }
        }

        self.phase = Phase::Finished;
        info!("Finished running SPPM sampler");
        self.finish_output()
    }

    /// Cluster id per node (contiguous 1-based labels).
    pub fn partition(&self) -> &[usize] {
        &self.pi
    }

    /// Current number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.num_groups
    }

    /// Current spatial-cohesion parameter.
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Current spanning-tree membership per edge.
    pub fn spanning_tree(&self) -> &[bool] {
        &self.tree
    }

    fn prepare_output(&mut self) -> anyhow::Result<()> {
        let ids: Vec<String> = self.graph.node_ids().iter().map(|id| id.to_string()).collect();
        self.sinks.partition.write_header(&ids)?;
        self.sinks.rho.write_header(&["rho".to_string()])?;

        let mut columns = Vec::with_capacity(2 * self.graph.num_nodes().saturating_sub(1));
        for k in 1..self.graph.num_nodes() {
            columns.push(format!("U_{}", k));
            columns.push(format!("V_{}", k));
        }
        self.sinks.tree.write_header(&columns)?;
        self.likelihood.write_theta_header()
    }

    fn generate_initial_state(&mut self) -> anyhow::Result<()> {
        info!("Generating initial state");

        // partition: every node its own cluster
        for (node, label) in self.pi.iter_mut().enumerate() {
            *label = node + 1;
        }
        self.num_groups = self.graph.num_nodes();

        self.rho = rbeta(self.rho_alpha, self.rho_beta, &mut self.rng)?;
        self.likelihood.generate_initial_theta(&mut self.rng)?;

        // tree: MST over uniform random weights
        for w in self.weights.iter_mut() {
            *w = self.rng.random();
        }
        kruskal(&self.graph, &self.weights, &mut self.tree);

        self.phase = Phase::Initialized;
        Ok(())
    }

    /// One Gibbs-style pass over the tree edges.
    ///
    /// An edge kept enabled leaves its two endpoint components merged; a
    /// disabled edge splits them. Decisions are sequential: each edge sees
    /// the filter left behind by the edges processed before it.
    fn sample_partition(&mut self) -> anyhow::Result<()> {
        let num_edges = self.graph.num_edges();

        // filter = in tree AND endpoints currently share a cluster
        for e in 0..num_edges {
            let (u, v) = self.graph.edge_endpoints(e);
            self.filter[e] = self.tree[e] && self.pi[u] == self.pi[v];
        }

        for e in 0..num_edges {
            if !self.tree[e] {
                continue;
            }
            let (u, v) = self.graph.edge_endpoints(e);
            let was_enabled = self.filter[e];

            // the merge/split decision looks at the components with e removed
            self.filter[e] = false;
            reachable_from(&self.graph, &self.filter, u, &mut self.set_u);
            reachable_from(&self.graph, &self.filter, v, &mut self.set_v);

            let n_active = self.set_u.iter().filter(|&&x| x).count()
                + self.set_v.iter().filter(|&&x| x).count();
            let c = self.num_groups as f64;
            let log_ratio = self.likelihood.log_ratio_predictive(&self.set_u, &self.set_v)
                + (n_active as f64 + self.rho_beta - c).ln()
                - (c + self.rho_alpha - 2.0).ln();

            let coin: f64 = self.rng.random();
            if log_ratio >= ((1.0 - coin) / coin).ln() {
                // keep the edge: endpoint components stay merged
                self.filter[e] = true;
                if !was_enabled {
                    self.num_groups -= 1;
                }
            } else if was_enabled {
                // edge stays disabled: a cluster was split in two
                self.num_groups += 1;
            }
        }

        // the full relabel is the single source of truth for cluster ids
        self.num_groups = label_components(&self.graph, &self.filter, &mut self.pi);
        debug!("partition updated: {} clusters", self.num_groups);
        Ok(())
    }

    fn sample_rho(&mut self) -> anyhow::Result<()> {
        let n = self.graph.num_nodes() as f64;
        let c = self.num_groups as f64;
        self.rho = rbeta(
            self.rho_alpha + (c - 1.0),
            self.rho_beta + (n - c),
            &mut self.rng,
        )?;
        Ok(())
    }

    fn sample_tree(&mut self) {
        // cheap weights inside clusters, expensive across them, so the new
        // tree spans every cluster before it bridges any two
        for e in 0..self.graph.num_edges() {
            let (u, v) = self.graph.edge_endpoints(e);
            self.weights[e] = if self.pi[u] == self.pi[v] {
                self.rng.random_range(0.0..1.0)
            } else {
                self.rng.random_range(5.0..10.0)
            };
        }
        kruskal(&self.graph, &self.weights, &mut self.tree);
    }

    fn hold_sample(&mut self) -> anyhow::Result<()> {
        if self.phase == Phase::Uninitialized {
            return Err(SppmError::InvalidState(
                "cannot hold a sample before the initial state is generated".to_string(),
            )
            .into());
        }

        let pi_row: Vec<String> = self.pi.iter().map(|label| label.to_string()).collect();
        self.sinks.partition.write_row(&pi_row)?;
        self.sinks.rho.write_row(&[self.rho.to_string()])?;
        self.likelihood.hold_theta()?;

        let mut tree_row = Vec::with_capacity(2 * self.graph.num_nodes().saturating_sub(1));
        for e in 0..self.graph.num_edges() {
            if !self.tree[e] {
                continue;
            }
            let (u, v) = self.graph.edge_endpoints(e);
            tree_row.push(self.graph.node_id(u).to_string());
            tree_row.push(self.graph.node_id(v).to_string());
        }
        self.sinks.tree.write_row(&tree_row)
    }

    fn finish_output(&mut self) -> anyhow::Result<()> {
        self.sinks.partition.finish()?;
        self.sinks.rho.finish()?;
        self.likelihood.finish_theta()?;
        self.sinks.tree.finish()
    }
}
