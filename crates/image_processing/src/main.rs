// CLI for image processing crate that uses another_resize

use another_resize::{Interpolation, ResizeConfig};
use clap::{Args, Parser, Subcommand};
use image_processing::ImageProcessor;

// setup command line args

#[derive(Parser)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(long, required = true)]
    path: String,
}

#[derive(Subcommand)]
pub enum Command {
    Resize(ResizeArgs),
}

#[derive(Debug, Args)]
pub struct ResizeArgs {
    /// target width, 0 to keep the aspect ratio
    #[clap(required = true)]
    new_width: usize,
    /// target height, 0 to keep the aspect ratio
    #[clap(required = true)]
    new_height: usize,
    #[clap(long, default_value = "lanczos3")]
    filter: Interpolation,
    /// kernel support multiplier, above 1 softens
    #[clap(long, default_value_t = 1.0)]
    blur: f64,
    /// worker threads, defaults to the number of cpus
    #[clap(long)]
    workers: Option<usize>,
    #[clap(long, default_value = "resized.png")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let path = &args.path;

    match args.command {
        Command::Resize(args) => {
            let image_proc = ImageProcessor::from_file(path, &args.output)?;
            let config = ResizeConfig {
                blur: args.blur,
                workers: args.workers,
            };
            image_processing::basic_ops::save_resize(
                image_proc,
                args.new_width,
                args.new_height,
                args.filter,
                config,
            )?
        }
    }

    Ok(())
}
