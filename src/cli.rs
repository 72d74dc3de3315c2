use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::mapping::MappingStrategy;

#[derive(Parser)]
#[command(name = "bookpages")]
#[command(about = "Extract or split PDF pages by book page number")]
#[command(version)]
pub struct Cli {
    /// Runs the interactive prompt when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for files and pages until told to quit (default)
    Interactive,

    /// Extract book pages into a single PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Book pages (e.g., "1,3,5-7")
        pages: String,

        /// Output file [default: <input dir>/<stem>_extracted.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Print a JSON report instead of progress messages
        #[arg(long)]
        json: bool,
    },

    /// Write each book page to its own PDF
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Book pages (e.g., "1,3,5-7"); all pages when omitted
        pages: Option<String>,

        /// Output directory [default: <input dir>/extracted_pages]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Print a JSON report instead of progress messages
        #[arg(long)]
        json: bool,
    },

    /// Show page label mapping (logical vs physical page numbers)
    Labels {
        /// PDF file to inspect
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct MappingArgs {
    /// PDF page on which book page 1 starts
    #[arg(long, value_name = "PAGE", allow_hyphen_values = true, conflicts_with = "labels")]
    pub offset: Option<i64>,

    /// Number book pages by the document's own page labels
    #[arg(long)]
    pub labels: bool,
}

impl MappingArgs {
    pub fn strategy(&self) -> MappingStrategy {
        match (self.offset, self.labels) {
            (Some(start_page), _) => MappingStrategy::Offset { start_page },
            (None, true) => MappingStrategy::Labels,
            (None, false) => MappingStrategy::Identity,
        }
    }
}
