//! Normal likelihood with a Normal-Gamma conjugate prior.
//!
//! Observations: `y_i | k ~ Normal(mu_k, tau_k)` with tau a precision.
//! Prior: `tau_k ~ Gamma(a, b)`, `mu_k | tau_k ~ Normal(m, v * tau_k)`.
//! The merge/split decisions use the marginal likelihood with
//! `(mu_k, tau_k)` integrated out.
//!
//! Initialization draws `tau_k ~ Gamma(a, a)` — shape and rate share the
//! symbol `a` deliberately, matching the published sampler.

use crate::error::SppmError;
use crate::likelihood::{resolve_attribute, ClusterLikelihood};
use crate::output::SampleSink;
use crate::rand_util::{rgamma, rnormal};
use log::info;
use rand::rngs::SmallRng;
use spatial_data::SpatialGraph;
use special::Gamma as SpecialGamma;
use std::f64::consts::PI;

/// Normal-Gamma likelihood variant.
///
/// Holds the observation vector resolved from the graph at construction,
/// the current per-node broadcast of `(mu, tau)`, and the two theta
/// output channels.
pub struct NormalGamma {
    a: f64,
    b: f64,
    m: f64,
    v: f64,
    node_ids: Vec<i64>,
    y: Vec<f64>,
    mu: Vec<f64>,
    tau: Vec<f64>,
    mu_sink: Box<dyn SampleSink>,
    tau_sink: Box<dyn SampleSink>,
}

impl std::fmt::Debug for NormalGamma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalGamma")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("m", &self.m)
            .field("v", &self.v)
            .finish_non_exhaustive()
    }
}

impl NormalGamma {
    /// Resolve the observation attribute and validate hyperparameters.
    ///
    /// `a`, `b`, and `v` must be strictly positive; every node must carry
    /// the attribute (a missing value is an input-contract failure, before
    /// any sampling starts).
    #[allow(clippy::too_many_arguments)]
    pub fn from_graph(
        graph: &SpatialGraph,
        attribute: &str,
        a: f64,
        b: f64,
        m: f64,
        v: f64,
        mu_sink: Box<dyn SampleSink>,
        tau_sink: Box<dyn SampleSink>,
    ) -> anyhow::Result<Self> {
        if !(a > 0.0) || !(b > 0.0) || !(v > 0.0) {
            return Err(SppmError::Domain(format!(
                "mu, tau ~ NG(m={}, v={}, a={}, b={}) requires strictly positive a, b, v",
                m, v, a, b
            ))
            .into());
        }
        info!(
            "Setting parameters: mu, tau ~ NG(m={}, v={}, a={}, b={})",
            m, v, a, b
        );

        let n = graph.num_nodes();
        let y = resolve_attribute(graph, attribute)?;

        Ok(NormalGamma {
            a,
            b,
            m,
            v,
            node_ids: graph.node_ids().to_vec(),
            y,
            mu: vec![0.0; n],
            tau: vec![0.0; n],
            mu_sink,
            tau_sink,
        })
    }

    /// Log marginal likelihood of a cluster with statistics
    /// `(n, S1 = Σy, S2 = Σy²)`, parameters integrated out.
    ///
    /// The empty cluster scores exactly zero.
    fn log_predictive(&self, n: usize, sum_y: f64, sum_sq: f64) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let (a, b, m, v) = (self.a, self.b, self.m, self.v);
        let nf = n as f64;

        let base = b + 0.5 * sum_sq + 0.5 * v * m * m - 0.5 * (sum_y + v * m).powi(2) / (nf + v);

        SpecialGamma::ln_gamma(a + 0.5 * nf).0 - SpecialGamma::ln_gamma(a).0
            - 0.5 * nf * (2.0 * PI).ln()
            + 0.5 * (v.ln() - (nf + v).ln())
            + a * b.ln()
            - (a + 0.5 * nf) * base.ln()
    }

    fn flagged_stats(&self, flags: &[bool]) -> (usize, f64, f64) {
        let mut n = 0;
        let mut sum_y = 0.0;
        let mut sum_sq = 0.0;
        for (node, &flagged) in flags.iter().enumerate() {
            if flagged {
                let y = self.y[node];
                n += 1;
                sum_y += y;
                sum_sq += y * y;
            }
        }
        (n, sum_y, sum_sq)
    }
}

impl ClusterLikelihood for NormalGamma {
    fn generate_initial_theta(&mut self, rng: &mut SmallRng) -> anyhow::Result<()> {
        info!("Generating initial mu and tau");
        for node in 0..self.y.len() {
            self.tau[node] = rgamma(self.a, self.a, rng)?;
            self.mu[node] = rnormal(self.m, self.v * self.tau[node], rng)?;
        }
        Ok(())
    }

    fn sample_theta(
        &mut self,
        pi: &[usize],
        num_groups: usize,
        rng: &mut SmallRng,
    ) -> anyhow::Result<()> {
        let mut count = vec![0usize; num_groups];
        let mut sum_y = vec![0.0; num_groups];
        let mut sum_sq = vec![0.0; num_groups];
        for (node, &label) in pi.iter().enumerate() {
            let g = label - 1;
            let y = self.y[node];
            count[g] += 1;
            sum_y[g] += y;
            sum_sq[g] += y * y;
        }

        let mut mu_k = vec![0.0; num_groups];
        let mut tau_k = vec![0.0; num_groups];
        for g in 0..num_groups {
            let n = count[g] as f64;
            let s1 = sum_y[g];
            let s2 = sum_sq[g];

            let a_post = self.a + 0.5 * n;
            let b_post = self.b
                + 0.5 * (s2 - s1 * s1 / n)
                + 0.5 * (n * self.v) / (n + self.v) * (s1 / n - self.m).powi(2);
            let v_post = self.v + n;
            let m_post = (self.v * self.m + s1) / v_post;

            tau_k[g] = rgamma(a_post, b_post, rng)?;
            mu_k[g] = rnormal(m_post, v_post * tau_k[g], rng)?;
        }

        for (node, &label) in pi.iter().enumerate() {
            self.mu[node] = mu_k[label - 1];
            self.tau[node] = tau_k[label - 1];
        }
        Ok(())
    }

    fn log_ratio_predictive(&self, set_u: &[bool], set_v: &[bool]) -> f64 {
        let (n_u, sum_y_u, sum_sq_u) = self.flagged_stats(set_u);
        let (n_v, sum_y_v, sum_sq_v) = self.flagged_stats(set_v);

        self.log_predictive(n_u + n_v, sum_y_u + sum_y_v, sum_sq_u + sum_sq_v)
            - self.log_predictive(n_u, sum_y_u, sum_sq_u)
            - self.log_predictive(n_v, sum_y_v, sum_sq_v)
    }

    fn write_theta_header(&mut self) -> anyhow::Result<()> {
        let ids: Vec<String> = self.node_ids.iter().map(|id| id.to_string()).collect();
        self.mu_sink.write_header(&ids)?;
        self.tau_sink.write_header(&ids)
    }

    fn hold_theta(&mut self) -> anyhow::Result<()> {
        let mu_row: Vec<String> = self.mu.iter().map(|x| x.to_string()).collect();
        self.mu_sink.write_row(&mu_row)?;
        let tau_row: Vec<String> = self.tau.iter().map(|x| x.to_string()).collect();
        self.tau_sink.write_row(&tau_row)
    }

    fn finish_theta(&mut self) -> anyhow::Result<()> {
        self.mu_sink.finish()?;
        self.tau_sink.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use spatial_data::GraphBuilder;

    fn graph_with_values(values: &[f64]) -> SpatialGraph {
        let mut b = GraphBuilder::new();
        for (i, &y) in values.iter().enumerate() {
            let node = b.add_node(i as i64 + 1).unwrap();
            b.set_attribute(node, "y", y);
        }
        for i in 1..values.len() as i64 {
            b.add_edge_by_id(i, i + 1).unwrap();
        }
        b.build()
    }

    fn variant(values: &[f64], a: f64, b: f64, m: f64, v: f64) -> NormalGamma {
        NormalGamma::from_graph(
            &graph_with_values(values),
            "y",
            a,
            b,
            m,
            v,
            Box::new(MemorySink::new()),
            Box::new(MemorySink::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_cluster_scores_zero() {
        for (a, b, m, v) in [(1.0, 1.0, 0.0, 1.0), (3.5, 0.2, -2.0, 10.0), (0.5, 7.0, 4.0, 0.1)] {
            let lik = variant(&[1.0, 2.0], a, b, m, v);
            assert_eq!(lik.log_predictive(0, 0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn test_log_ratio_is_symmetric() {
        let lik = variant(&[1.0, 2.0, 100.0, 101.0], 1.0, 1.0, 0.0, 1.0);
        let set_u = [true, true, false, false];
        let set_v = [false, false, true, true];
        assert_abs_diff_eq!(
            lik.log_ratio_predictive(&set_u, &set_v),
            lik.log_ratio_predictive(&set_v, &set_u),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_log_ratio_against_empty_set_is_zero() {
        let lik = variant(&[1.0, 2.0, 3.0], 2.0, 1.0, 0.5, 1.0);
        let full = [true, true, true];
        let empty = [false, false, false];
        assert_abs_diff_eq!(lik.log_ratio_predictive(&full, &empty), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_similar_data_favored_for_merging() {
        let lik = variant(&[1.0, 1.1, 100.0, 100.1], 1.0, 1.0, 0.0, 1.0);
        let close = lik.log_ratio_predictive(&[true, false, false, false], &[false, true, false, false]);
        let far = lik.log_ratio_predictive(&[true, false, false, false], &[false, false, true, false]);
        assert!(
            close > far,
            "expected merging similar values to score higher: close={}, far={}",
            close,
            far
        );
    }

    #[test]
    fn test_log_predictive_single_observation() {
        // n=1: base = b + y²/2 + v m²/2 − (y + v m)²/(2(1+v))
        let (a, b, m, v) = (2.0, 3.0, 1.0, 4.0);
        let y = 2.5;
        let lik = variant(&[y], a, b, m, v);

        let base = b + 0.5 * y * y + 0.5 * v * m * m - 0.5 * (y + v * m).powi(2) / (1.0 + v);
        let expected = SpecialGamma::ln_gamma(a + 0.5).0 - SpecialGamma::ln_gamma(a).0
            - 0.5 * (2.0 * PI).ln()
            + 0.5 * (v.ln() - (1.0 + v).ln())
            + a * b.ln()
            - (a + 0.5) * base.ln();
        assert_abs_diff_eq!(lik.log_predictive(1, y, y * y), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_theta_broadcasts_per_cluster() {
        let mut lik = variant(&[1.0, 1.2, 50.0, 51.0], 1.0, 1.0, 0.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(9);
        let pi = [1, 1, 2, 2];
        lik.sample_theta(&pi, 2, &mut rng).unwrap();

        assert_eq!(lik.mu[0], lik.mu[1]);
        assert_eq!(lik.tau[0], lik.tau[1]);
        assert_eq!(lik.mu[2], lik.mu[3]);
        assert_eq!(lik.tau[2], lik.tau[3]);
        assert!(lik.mu[0] != lik.mu[2] || lik.tau[0] != lik.tau[2]);
        for &t in &lik.tau {
            assert!(t > 0.0);
        }
    }

    #[test]
    fn test_non_positive_hyperparameters_rejected() {
        let graph = graph_with_values(&[1.0]);
        for (a, b, v) in [(0.0, 1.0, 1.0), (1.0, -1.0, 1.0), (1.0, 1.0, 0.0)] {
            let err = NormalGamma::from_graph(
                &graph,
                "y",
                a,
                b,
                0.0,
                v,
                Box::new(MemorySink::new()),
                Box::new(MemorySink::new()),
            )
            .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SppmError>(),
                Some(SppmError::Domain(_))
            ));
        }
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let mut b = GraphBuilder::new();
        b.add_node(1).unwrap();
        let graph = b.build();
        let err = NormalGamma::from_graph(
            &graph,
            "y",
            1.0,
            1.0,
            0.0,
            1.0,
            Box::new(MemorySink::new()),
            Box::new(MemorySink::new()),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SppmError>(),
            Some(SppmError::MissingAttribute { node_id: 1, .. })
        ));
    }
}
