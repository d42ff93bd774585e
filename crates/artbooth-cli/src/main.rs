use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod bootstrap;
mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "artbooth")]
#[command(about = "ARTBOOTH - AI style transfer booth: photo in, styled image and QR code out", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this config.toml instead of ~/.config/artbooth/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this secret.json instead of ~/.config/artbooth/secret.json
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available styles
    Styles {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Style a photo, publish the result and save it with its QR code
    Run {
        /// Style id (see `artbooth styles`)
        #[arg(short, long)]
        style: String,
        /// Photo to transform
        #[arg(short, long)]
        image: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "styled_images")]
        out: PathBuf,
    },
    /// Publish an existing image and save its QR code next to it
    Publish {
        /// Image to publish
        #[arg(short, long)]
        file: PathBuf,
        /// Label used in the published file name
        #[arg(short, long, default_value = "image")]
        label: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let paths = bootstrap::Paths {
        config: cli.config,
        secrets: cli.secrets,
    };

    match cli.command {
        Commands::Styles { json } => commands::styles::run(&paths, json)?,
        Commands::Run { style, image, out } => {
            commands::run::run(&paths, commands::run::RunArgs { style, image, out }).await?
        }
        Commands::Publish { file, label } => {
            commands::publish::run(&paths, commands::publish::PublishArgs { file, label }).await?
        }
    }

    Ok(())
}
