mod common;
mod run_normal;
mod run_poisson;

use clap::{Parser, Subcommand};
use log::info;
use run_normal::{run_normal, NormalArgs};
use run_poisson::{run_poisson, PoissonArgs};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "SPPM",
    long_about = "Spatial Product Partition Model sampler.\n\
		  Clusters spatially linked units into contiguous regions by\n\
		  pruning and regrowing random spanning trees of the\n\
		  neighbourhood graph."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Gaussian observations with a Normal-Gamma prior",
        long_about = "Cluster Gaussian observations y_i with a conjugate\n\
		      Normal-Gamma prior on the per-cluster mean and precision."
    )]
    Normal(NormalArgs),

    #[command(
        about = "Counts with exposures under a Gamma-Poisson prior",
        long_about = "Cluster rate data: observed counts Y_i with known\n\
		      exposures E_i, Y_i ~ Poisson(E_i * phi) and a conjugate\n\
		      Gamma prior on the per-cluster rate phi."
    )]
    Poisson(PoissonArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Normal(args) => {
            run_normal(args)?;
        }
        Commands::Poisson(args) => {
            run_poisson(args)?;
        }
    }

    info!("Done");
    Ok(())
}
