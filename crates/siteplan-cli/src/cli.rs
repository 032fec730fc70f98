use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Siteplan - building selection and planning assistant
#[derive(Parser, Debug)]
#[command(name = "siteplan")]
#[command(about = "Select building footprints by drawn shape and chat about the site", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Footprint file (.shp, .geojson or .json), overrides configuration
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the footprint layer: size, CRS, columns and map centre
    Inspect,

    /// Select the buildings touched by a shape
    Select(SelectArgs),

    /// Talk to the planning assistant
    Chat(ChatArgs),

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// GeoJSON file holding the shape (Geometry, Feature, or FeatureCollection
    /// whose last feature is used), in EPSG:4326
    #[arg(long, value_name = "FILE", conflicts_with = "bbox")]
    pub shape: Option<PathBuf>,

    /// Rectangle as min_lon,min_lat,max_lon,max_lat
    #[arg(long, value_name = "BBOX", allow_hyphen_values = true)]
    pub bbox: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Send a single message and exit instead of starting a conversation
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Completion model, overrides configuration
    #[arg(long)]
    pub model: Option<String>,
}
