//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::automaton::regex::DEFAULT_NODE_LIMIT;
use crate::schemes::Preset;

/// Command-line arguments
#[derive(Parser)]
#[command(name = "checksum-automata")]
#[command(about = "Synthesize automata for checksum-validated digit strings")]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the checksum scheme comes from.
#[derive(Args, Debug, Clone)]
pub struct SchemeArgs {
    /// Built-in scheme
    #[arg(short, long, value_enum, default_value_t = Preset::Mastercard)]
    pub preset: Preset,

    /// JSON scheme description (overrides --preset)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the transition table of the synthesized automaton
    Table {
        #[command(flatten)]
        scheme: SchemeArgs,

        /// Minimize before printing
        #[arg(short, long)]
        minimize: bool,

        /// Print only state and transition counts
        #[arg(long)]
        stats: bool,
    },

    /// Test numbers for acceptance
    Check {
        /// Numbers to test
        numbers: Vec<String>,

        #[command(flatten)]
        scheme: SchemeArgs,

        /// Load a previously exported automaton instead of synthesizing one
        #[arg(short, long)]
        automaton: Option<PathBuf>,

        /// Format of --automaton (auto-detected if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,

        /// Read additional numbers from a file, one per line
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Derive an equivalent regular expression
    Regex {
        #[command(flatten)]
        scheme: SchemeArgs,

        /// Give up once the expression grows past this many nodes
        #[arg(short, long, default_value_t = DEFAULT_NODE_LIMIT)]
        limit: usize,
    },

    /// Write the synthesized automaton to a file
    Export {
        /// Output file
        output: PathBuf,

        #[command(flatten)]
        scheme: SchemeArgs,

        /// Output format (derived from the file extension if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,

        /// Minimize before writing
        #[arg(short, long)]
        minimize: bool,
    },
}

/// On-disk automaton formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum SerializationFormat {
    /// Plain text edge list
    Text,
    /// Bincode binary format
    Bincode,
    /// JSON format
    Json,
}

impl SerializationFormat {
    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Bincode => "bin",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Bincode => write!(f, "bincode"),
            Self::Json => write!(f, "json"),
        }
    }
}
