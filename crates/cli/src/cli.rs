//! CLI argument definitions for labport

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labport")]
#[command(about = "Port planner mod data into local datasets", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "LABPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List mods available in the data snapshot
    #[command(visible_alias = "ls")]
    Mods,

    /// Record the data module commit the snapshot was exported from
    Stamp {
        /// Commit hash of the data module
        #[arg(long)]
        commit: Option<String>,
    },

    /// List local datasets and the mod each one maps to
    Datasets,

    /// Rank science packs by how many other packs unlocking them implies
    #[command(visible_alias = "p")]
    Packs {
        /// Mod id or name (defaults to `default_mod` from the config)
        #[arg(value_name = "MOD")]
        target: Option<String>,

        /// Also print consumer and reachable technology counts per pack
        #[arg(long)]
        reach: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Migrate mapped mods into <output_dir>/<mod>.json and <mod>.webp
    #[command(visible_alias = "m")]
    Migrate {
        /// Only migrate these mod ids (defaults to every mapped mod)
        #[arg(value_name = "MOD_ID")]
        mods: Vec<String>,
    },
}
