use anispace_reader::config::DEFAULT_BASE_URL;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Browse and read manga from the Anispace catalog
#[derive(Parser)]
#[command(name = "anispace", version)]
#[command(about = "Search, browse and read manga from the Anispace catalog", long_about = None)]
pub struct Cli {
    /// Base URL of the catalog API
    #[arg(long, env = "ANISPACE_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "ANISPACE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for manga
    Search {
        /// Query to search for
        query: String,
        /// Result page
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a series
    Series {
        /// Series id
        id: String,
        /// Tab to show
        #[arg(short, long, value_enum, default_value_t = Tab::Chapters)]
        tab: Tab,
        /// Chapter list page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// List chapters oldest first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Read a chapter
    Read {
        /// Series id
        id: String,
        /// Chapter number
        chapter: String,
        /// Page to start on
        #[arg(short, long)]
        page: Option<usize>,
        /// Step through pages and chapters interactively
        #[arg(short, long)]
        interactive: bool,
    },
    /// Open a front-end route such as /manga/{id}/{chapter}
    Open {
        /// Route path, optionally with query string
        route: String,
    },
    /// List genres
    Genres,
    /// List popular manga
    Popular {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

/// Tabs of the series page
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    About,
    Chapters,
    Connections,
}
