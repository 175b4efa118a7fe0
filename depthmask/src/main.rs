use std::path::PathBuf;

use clap::{Parser, Subcommand};
use midas::{Midas, Model};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate inverse depth and write one CSV array per image
    Depth {
        /// Folder of images to process
        #[arg(short, long, value_name = "DIR", required_unless_present = "image")]
        folder: Option<PathBuf>,

        /// Single image to process instead of a folder
        #[arg(short, long, value_name = "FILE", conflicts_with = "folder")]
        image: Option<PathBuf>,

        /// Model variant to use
        #[arg(short, long, value_enum, default_value = "midas-small")]
        model: Model,
    },
    /// Threshold a folder of depth CSVs into 0/1 mask CSVs
    Mask {
        /// Folder of depth arrays, as written by the depth command
        #[arg(short, long, value_name = "DIR")]
        folder: PathBuf,

        /// Fraction of each depth map's peak used as the cutoff
        #[arg(short, long, default_value_t = 0.7)]
        threshold: f32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Depth {
            folder,
            image,
            model,
        } => {
            let mut midas = Midas::new(model)?;
            if let Some(image) = image {
                depthmask::store::depth::run_single(&image, &mut midas)?;
            } else if let Some(folder) = folder {
                depthmask::store::depth::run(&folder, &mut midas)?;
            }
        }
        Command::Mask { folder, threshold } => {
            depthmask::store::mask::run(&folder, threshold)?;
        }
    }

    Ok(())
}
