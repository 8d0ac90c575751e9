//! Command-line arguments.
//!
//! Every catalog option can also be set through an environment variable so a
//! shell profile can pin the dataset location once.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shelf::{
    CsvLayout, SessionConfig, SortMode, SourceFilter, StatusFilter, DEFAULT_PAGE_SIZE,
};

/// Shelf - browse a static book catalog
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one query and print the result
    Query {
        /// Query tokens, e.g. `rating:>=9 title:red`
        text: Vec<String>,

        /// Number of pages to reveal
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Read queries and commands from stdin
    Repl,

    /// Convert CSV exports into a dataset document
    ///
    /// With --input, writes a single-source document from one Douban export.
    /// With --douban and --goodreads, writes a two-source document.
    Convert {
        /// Douban CSV export to read (single-source mode)
        #[arg(long, default_value = "books.csv")]
        input: PathBuf,

        /// Dataset document to write
        #[arg(long, default_value = "books.json")]
        output: PathBuf,

        /// Column layout (detected from the header when omitted)
        #[arg(long, value_enum, conflicts_with = "douban")]
        layout: Option<LayoutArg>,

        /// Douban CSV export (two-source mode)
        #[arg(long, requires = "goodreads", conflicts_with = "input")]
        douban: Option<PathBuf>,

        /// Goodreads CSV export (two-source mode)
        #[arg(long, requires = "douban")]
        goodreads: Option<PathBuf>,

        /// Read-state document used to drop unread editions of read titles
        #[arg(long, requires = "douban")]
        read: Option<PathBuf>,
    },
}

/// Options shared by the browsing commands.
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Dataset document to load
    #[arg(long, global = true, env = "SHELF_DATA", default_value = "books.json")]
    pub data: String,

    /// Read-state document (array of `{id}` entries)
    #[arg(long, global = true, env = "SHELF_READ_STATE")]
    pub read_state: Option<String>,

    /// Results revealed per page
    #[arg(long, global = true, env = "SHELF_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Enable the read/unread status filter and read badges
    #[arg(long, global = true, env = "SHELF_TRACK_READS")]
    pub track_reads: bool,

    /// Output format
    #[arg(long, global = true, env = "SHELF_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Custom MiniJinja template for text output
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Sort mode: rating, count or none
    #[arg(long, global = true, default_value = "rating")]
    pub sort: SortMode,

    /// Source filter: all, db or gr
    #[arg(long, global = true, default_value = "all")]
    pub source: SourceFilter,

    /// Status filter: all, read or unread (needs --track-reads)
    #[arg(long, global = true, default_value = "all")]
    pub status: StatusFilter,
}

impl CatalogArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            page_size: self.page_size,
            sort: self.sort,
            track_reads: self.track_reads,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// ID,Rating,Votes,Title
    Compact,
    /// ID,Score,Rating,Votes,Date,Title
    Extended,
}

impl From<LayoutArg> for CsvLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Compact => CsvLayout::Compact,
            LayoutArg::Extended => CsvLayout::Extended,
        }
    }
}
