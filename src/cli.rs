use crate::config::{default_concurrency, ConversionConfig};
use crate::error::Result;
use crate::formats::FormatOverride;
use crate::logger::Verbosity;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "squeezr",
    about = "Mirror a folder of images into a compressed copy",
    long_about = "squeezr walks a source folder for PNG, JPEG and WebP images and re-encodes each one \
                  into a target folder with the same directory layout. The target subtree is wiped \
                  before every run, and a size report is printed at the end.",
    version,
    after_help = "EXAMPLES:\n  \
    squeezr\n  \
    squeezr --src-folder ./assets --target-folder ./dist/assets\n  \
    squeezr --active-path icons --format webp -j 2"
)]
pub struct Args {
    #[arg(
        short = 's',
        long,
        visible_alias = "srcFolder",
        help = "Source folder (default: ./input)"
    )]
    pub src_folder: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        visible_alias = "targetFolder",
        help = "Target folder (default: ./output)",
        long_help = "Target folder. The active part of it is deleted and recreated on every run, \
                     and a .gitignore covering everything is written at its root."
    )]
    pub target_folder: Option<PathBuf>,

    #[arg(
        short = 'a',
        long,
        visible_alias = "activePath",
        help = "Only process this subfolder of the source",
        long_help = "Relative subfolder to restrict the run to. Only the matching subfolder of the \
                     target is reset, so outputs elsewhere in the target are kept."
    )]
    pub active_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        help = "Output format (png, jpg, jpeg, webp, avif)",
        long_help = "Convert every image to this format. When omitted, each file keeps the \
                     format of its source extension."
    )]
    pub format: Option<FormatOverride>,

    #[arg(long, visible_alias = "isOptimum", help = "Request optimum compression")]
    pub is_optimum: bool,

    #[arg(
        short = 'j',
        long,
        help = "Maximum concurrent encodes (default: min(4, CPU cores))"
    )]
    pub jobs: Option<usize>,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print warnings and errors")]
    pub quiet: bool,

    #[arg(short, long, help = "Print stage transitions and per-file detail")]
    pub verbose: bool,
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Fills unset folders from the working directory defaults.
    pub fn to_config(&self) -> Result<ConversionConfig> {
        let mut config = ConversionConfig::from_current_dir()?;
        if let Some(src) = &self.src_folder {
            config.src_folder = src.clone();
        }
        if let Some(target) = &self.target_folder {
            config.target_folder = target.clone();
        }
        if let Some(active) = &self.active_path {
            config = config.with_active_path(active.clone());
        }

        Ok(config
            .with_format(self.format)
            .with_optimum(self.is_optimum)
            .with_max_concurrency(self.jobs.unwrap_or_else(default_concurrency)))
    }
}
