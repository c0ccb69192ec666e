//! Poisson-rate likelihood with a Gamma conjugate prior.
//!
//! Observations: counts `y_i` with known exposures `e_i`,
//! `y_i | k ~ Poisson(e_i * phi_k)`. Prior: `phi_k ~ Gamma(a, b)`.
//! Conjugacy gives `phi_k | data ~ Gamma(a + ΣY, b + ΣE)` and a
//! closed-form marginal likelihood for the merge/split decisions.

use crate::error::SppmError;
use crate::likelihood::{resolve_attribute, ClusterLikelihood};
use crate::output::SampleSink;
use crate::rand_util::rgamma;
use log::info;
use rand::rngs::SmallRng;
use spatial_data::SpatialGraph;
use special::Gamma as SpecialGamma;

/// Gamma-Poisson likelihood variant.
pub struct GammaPoisson {
    a: f64,
    b: f64,
    node_ids: Vec<i64>,
    y: Vec<f64>,
    exposure: Vec<f64>,
    phi: Vec<f64>,
    phi_sink: Box<dyn SampleSink>,
}

impl std::fmt::Debug for GammaPoisson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaPoisson")
            .field("a", &self.a)
            .field("b", &self.b)
            .finish_non_exhaustive()
    }
}

impl GammaPoisson {
    /// Resolve the count and exposure attributes and validate
    /// hyperparameters (`a`, `b` strictly positive).
    pub fn from_graph(
        graph: &SpatialGraph,
        count_attribute: &str,
        exposure_attribute: &str,
        a: f64,
        b: f64,
        phi_sink: Box<dyn SampleSink>,
    ) -> anyhow::Result<Self> {
        if !(a > 0.0) || !(b > 0.0) {
            return Err(SppmError::Domain(format!(
                "phi ~ Gamma(alpha={}, beta={}) requires strictly positive parameters",
                a, b
            ))
            .into());
        }
        info!("Setting parameters: phi ~ Gamma(alpha={}, beta={})", a, b);

        let n = graph.num_nodes();
        let y = resolve_attribute(graph, count_attribute)?;
        let exposure = resolve_attribute(graph, exposure_attribute)?;

        Ok(GammaPoisson {
            a,
            b,
            node_ids: graph.node_ids().to_vec(),
            y,
            exposure,
            phi: vec![0.0; n],
            phi_sink,
        })
    }

    /// Log marginal likelihood of a cluster with statistics
    /// `(ΣY, ΣE)`, the rate integrated out.
    fn log_predictive(&self, sum_y: f64, sum_e: f64) -> f64 {
        self.a * self.b.ln() + SpecialGamma::ln_gamma(self.a + sum_y).0
            - (self.a + sum_y) * (self.b + sum_e).ln()
            - SpecialGamma::ln_gamma(self.a).0
    }

    fn flagged_stats(&self, flags: &[bool]) -> (f64, f64) {
        let mut sum_y = 0.0;
        let mut sum_e = 0.0;
        for (node, &flagged) in flags.iter().enumerate() {
            if flagged {
                sum_y += self.y[node];
                sum_e += self.exposure[node];
            }
        }
        (sum_y, sum_e)
    }
}

impl ClusterLikelihood for GammaPoisson {
    fn generate_initial_theta(&mut self, rng: &mut SmallRng) -> anyhow::Result<()> {
        info!("Generating initial phi");
        for node in 0..self.phi.len() {
            self.phi[node] = rgamma(self.a, self.b, rng)?;
        }
        Ok(())
    }

    fn sample_theta(
        &mut self,
        pi: &[usize],
        num_groups: usize,
        rng: &mut SmallRng,
    ) -> anyhow::Result<()> {
        let mut sum_y = vec![0.0; num_groups];
        let mut sum_e = vec![0.0; num_groups];
        for (node, &label) in pi.iter().enumerate() {
            sum_y[label - 1] += self.y[node];
            sum_e[label - 1] += self.exposure[node];
        }

        let mut phi_k = vec![0.0; num_groups];
        for g in 0..num_groups {
            phi_k[g] = rgamma(self.a + sum_y[g], self.b + sum_e[g], rng)?;
        }

        for (node, &label) in pi.iter().enumerate() {
            self.phi[node] = phi_k[label - 1];
        }
        Ok(())
    }

    fn log_ratio_predictive(&self, set_u: &[bool], set_v: &[bool]) -> f64 {
        let (sum_y_u, sum_e_u) = self.flagged_stats(set_u);
        let (sum_y_v, sum_e_v) = self.flagged_stats(set_v);

        self.log_predictive(sum_y_u + sum_y_v, sum_e_u + sum_e_v)
            - self.log_predictive(sum_y_u, sum_e_u)
            - self.log_predictive(sum_y_v, sum_e_v)
    }

    fn write_theta_header(&mut self) -> anyhow::Result<()> {
        let ids: Vec<String> = self.node_ids.iter().map(|id| id.to_string()).collect();
        self.phi_sink.write_header(&ids)
    }

    fn hold_theta(&mut self) -> anyhow::Result<()> {
        let row: Vec<String> = self.phi.iter().map(|x| x.to_string()).collect();
        self.phi_sink.write_row(&row)
    }

    fn finish_theta(&mut self) -> anyhow::Result<()> {
        self.phi_sink.finish()
    }
}
