//! Shared CLI plumbing for the sampler subcommands.

use clap::{Args, ValueEnum};
use sppm::output::{CsvSink, SampleSink};
use spatial_data::{geojson, simple, InputError, SpatialGraph};

/// Input file format CLI enum
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
#[clap(rename_all = "lowercase")]
pub enum InputFormat {
    /// GeoJSON-style feature collection with `neighbours` lists
    #[default]
    Geojson,
    /// Sibling `.val`/`.adj` files
    Simple,
}

/// Arguments shared by every chain: input, run length, priors, outputs.
#[derive(Args, Debug)]
pub struct ChainArgs {
    #[arg(
        long,
        short = 'i',
        required = true,
        help = "Input file",
        long_help = "Input file describing the spatial units, their numeric\n\
		     attributes, and the neighbourhood structure.\n\
		     Plain or gzipped."
    )]
    pub input: Box<str>,

    #[arg(long, short = 'f', default_value = "geojson", help = "Input file format")]
    pub format: InputFormat,

    #[arg(long, default_value_t = 1000, help = "Number of iterations to run")]
    pub num_iter: usize,

    #[arg(long, default_value_t = 100, help = "Burn-in period")]
    pub burn_in: usize,

    #[arg(
        long,
        default_value_t = 10,
        help = "Thinning. Keep only each i-th sampled value"
    )]
    pub thinning: usize,

    #[arg(
        long,
        default_value_t = 2.0,
        help = "Shape alpha of the Beta prior on the cohesion parameter rho"
    )]
    pub rho_alpha: f64,

    #[arg(
        long,
        default_value_t = 5.0,
        help = "Shape beta of the Beta prior on the cohesion parameter rho"
    )]
    pub rho_beta: f64,

    #[arg(long, default_value_t = 42, help = "Random seed")]
    pub seed: u64,

    #[arg(
        long,
        short = 'o',
        required = true,
        help = "Output file prefix",
        long_help = "Output file prefix.\n\n\
		     Generates:\n\
		     - {out}.pi.csv: cluster id per node, one row per retained iteration\n\
		     - {out}.tree.csv: spanning-tree edge list as node-id pairs\n\
		     - {out}.rho.csv: cohesion parameter samples\n\
		     - plus the model-specific theta channels"
    )]
    pub out: Box<str>,

    #[arg(long, short = 'v', help = "Verbose output")]
    pub verbose: bool,
}

/// Load the graph and reject disconnected inputs before sampling starts.
pub fn load_graph(args: &ChainArgs) -> anyhow::Result<SpatialGraph> {
    let graph = match args.format {
        InputFormat::Geojson => geojson::load_geojson(&args.input)?,
        InputFormat::Simple => simple::load_simple(&args.input)?,
    };
    if !graph.is_connected() {
        return Err(InputError::Disconnected.into());
    }
    Ok(graph)
}

/// Open a `{prefix}.{channel}.csv` recording sink.
pub fn csv_sink(prefix: &str, channel: &str) -> anyhow::Result<Box<dyn SampleSink>> {
    let sink = CsvSink::create(&format!("{}.{}.csv", prefix, channel))?;
    Ok(Box::new(sink))
}
