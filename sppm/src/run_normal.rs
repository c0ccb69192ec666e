//! `sppm normal` — Gaussian observations with a Normal-Gamma prior.

use crate::common::*;
use clap::Args;
use log::info;
use sppm::{ChainSinks, NormalGamma, Sppm, SppmOptions};

/// Arguments for the Normal-Gamma model
#[derive(Args, Debug)]
pub struct NormalArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    #[arg(
        long,
        short = 'y',
        required = true,
        help = "Node attribute holding the observations y_i"
    )]
    pub attribute: Box<str>,

    #[arg(
        long,
        required = true,
        help = "Shape a of the Gamma prior on the precision tau"
    )]
    pub a: f64,

    #[arg(
        long,
        required = true,
        help = "Rate b of the Gamma prior on the precision tau"
    )]
    pub b: f64,

    #[arg(long, required = true, help = "Prior mean m of mu")]
    pub m: f64,

    #[arg(
        long,
        required = true,
        help = "Prior precision scale v of mu (mu ~ Normal(m, v*tau))"
    )]
    pub v: f64,
}

pub fn run_normal(args: &NormalArgs) -> anyhow::Result<()> {
    if args.chain.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    info!("Using attribute: Yi = {}", args.attribute);
    let graph = load_graph(&args.chain)?;

    let out: &str = &args.chain.out;
    let likelihood = NormalGamma::from_graph(
        &graph,
        &args.attribute,
        args.a,
        args.b,
        args.m,
        args.v,
        csv_sink(out, "mu")?,
        csv_sink(out, "tau")?,
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
