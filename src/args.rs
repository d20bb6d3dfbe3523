use clap::Parser;
use std::path::PathBuf;

/// A thin CLI front end for the HFE/sector-image codec: convert in either
/// direction, inspect an HFE image's header, or dump its raw decoded bit
/// stream.
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(group(clap::ArgGroup::new("operation").args(["filename", "to_hfe", "from_hfe", "hfe_info", "dump"]).multiple(false)))]
pub struct Args {
    /// HFE image filename; filesystem-level sector operations on it are
    /// delegated to an external sector-image tool not included here
    pub filename: Option<PathBuf>,

    /// Convert a sector image to an HFE image
    #[arg(short = 'T', long = "to-hfe", value_name = "file")]
    pub to_hfe: Option<PathBuf>,

    /// Convert an HFE image to a sector image
    #[arg(short = 'F', long = "from-hfe", value_name = "file")]
    pub from_hfe: Option<PathBuf>,

    /// Show basic information about an HFE image
    #[arg(short = 'I', long = "hfe-info", value_name = "file")]
    pub hfe_info: Option<PathBuf>,

    /// Dump the raw decoded bit stream of an HFE image
    #[arg(long = "dump", value_name = "file")]
    pub dump: Option<PathBuf>,

    /// Set output filename
    #[arg(short = 'o', long = "output", value_name = "file")]
    pub output: Option<PathBuf>,

    /// Ignore sector-count mismatches against the target geometry
    #[arg(short = 'p', long = "ignore-errors", action)]
    pub ignore_errors: bool,

    /// Override the track count read from the sector image's volume record
    #[arg(long = "tracks")]
    pub tracks: Option<u8>,

    /// Override the side count read from the sector image's volume record
    #[arg(long = "sides")]
    pub sides: Option<u8>,

    /// Override the density ("sd" or "dd") read from the sector image's
    /// volume record
    #[arg(long = "density")]
    pub density: Option<String>,
}
