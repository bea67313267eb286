use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image::Rgb;

use maskdiff::{
    color::parse_color,
    compare::{CompareOptions, Palette, compare_all},
    mask::{Threshold, color::DEFAULT_TOLERANCE},
    recolor::{RecolorOptions, recolor_all},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of worker threads (defaults to one per core)
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare same-named masks from two sources and write agreement maps.
    Compare {
        /// The directory containing Source-A's masks.
        a_root: PathBuf,

        /// The directory containing Source-B's masks.
        b_root: PathBuf,

        /// The directory to write the agreement maps to.
        out_root: PathBuf,

        /// The color Source-A's masks are painted with, as `R,G,B` or a name.
        #[arg(long, default_value = "cyan", value_parser = parse_color)]
        color_a: Rgb<u8>,

        /// The color Source-B's masks are painted with, as `R,G,B` or a name.
        #[arg(long, default_value = "magenta", value_parser = parse_color)]
        color_b: Rgb<u8>,

        /// Maximum per-channel difference still counted as a match.
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: u8,
    },

    /// Threshold grayscale images into black and white masks.
    Binarize {
        input_root: PathBuf,

        out_root: PathBuf,

        /// Pixels brighter than this become white.
        #[arg(short, long, default_value_t = 127)]
        threshold: u8,
    },

    /// Replace one color (white by default) in every image with another.
    Recolor {
        input_root: PathBuf,

        out_root: PathBuf,

        /// The color to paint with.
        #[arg(short, long, default_value = "cyan", value_parser = parse_color)]
        color: Rgb<u8>,

        /// The color to replace.
        #[arg(long, default_value = "white", value_parser = parse_color)]
        target: Rgb<u8>,

        #[arg(long, default_value_t = 0)]
        tolerance: u8,

        /// Keep only the last N components of each input path under the output directory.
        #[arg(long, value_name = "N")]
        tail: Option<usize>,
    },
}

fn run(args: Args) -> maskdiff::Result<()> {
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
        log::debug!("Using {} worker threads", jobs);
    }

    match args.command {
        Command::Compare {
            a_root,
            b_root,
            out_root,
            color_a,
            color_b,
            tolerance,
        } => {
            let options = CompareOptions {
                palette: Palette {
                    source_a: color_a,
                    source_b: color_b,
                },
                tolerance,
            };
            compare_all(&a_root, &b_root, &out_root, &options)?;
        }
        Command::Binarize {
            input_root,
            out_root,
            threshold,
        } => {
            maskdiff::binarize::binarize_all(&input_root, &out_root, &Threshold { threshold })?;
        }
        Command::Recolor {
            input_root,
            out_root,
            color,
            target,
            tolerance,
            tail,
        } => {
            let options = RecolorOptions {
                target,
                replacement: color,
                tolerance,
                tail,
            };
            recolor_all(&input_root, &out_root, &options)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
