//! `sppm poisson` — counts with exposures under a Gamma prior.

use crate::common::*;
use clap::Args;
use log::info;
use sppm::{ChainSinks, GammaPoisson, Sppm, SppmOptions};

/// Arguments for the Gamma-Poisson model
#[derive(Args, Debug)]
pub struct PoissonArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[arg(
        long,
        short = 'y',
        required = true,
        help = "Node attribute holding the observed counts Y_i"
    )]
    pub count_attribute: Box<str>,

    #[arg(
        long,
        short = 'e',
        required = true,
        help = "Node attribute holding the exposures E_i"
    )]
    pub exposure_attribute: Box<str>,

    #[arg(
        long,
        required = true,
        help = "Shape alpha of the Gamma prior on the rate phi"
    )]
    pub a: f64,

    #[arg(
        long,
        required = true,
        help = "Rate beta of the Gamma prior on the rate phi"
    )]
    pub b: f64,
}

pub fn run_poisson(args: &PoissonArgs) -> anyhow::Result<()> {
    if args.chain.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    info!(
        "Using attributes: Yi = {}, Ei = {}",
        args.count_attribute, args.exposure_attribute
    );
    let graph = load_graph(&args.chain)?;

    let out: &str = &args.chain.out;
    let likelihood = GammaPoisson::from_graph(
        &graph,
        &args.count_attribute,
        &args.exposure_attribute,
        args.a,
        args.b,
        csv_sink(out, "phi")?,
    )?;
    let sinks = ChainSinks {
        partition: csv_sink(out, "pi")?,
        tree: csv_sink(out, "tree")?,
        rho: csv_sink(out, "rho")?,
    };
    let options = SppmOptions {
        rho_alpha: args.chain.rho_alpha,
        rho_beta: args.chain.rho_beta,
        seed: args.chain.seed,
    };

    let mut sampler = Sppm::new(graph, likelihood, options, sinks)?;
    sampler.run(args.chain.num_iter, args.chain.burn_in, args.chain.thinning)
}
