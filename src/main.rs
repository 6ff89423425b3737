mod cli;
mod terminal;

use anispace_reader::catalog::AnispaceProvider;
use anispace_reader::config::ClientConfig;
use anispace_reader::routes::Route;
use clap::Parser;
use cli::{Cli, Commands};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. RUST_LOG overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,anispace_reader={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match ClientConfig::with_base_url(&cli.api_url) {
        Ok(config) => config.timeout(Duration::from_secs(cli.timeout)),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let provider = match AnispaceProvider::with_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Search { query, page } => Ok(terminal::show_search(&provider, &query, page)),
        Commands::Series {
            id,
            tab,
            page,
            oldest_first,
        } => Ok(terminal::show_series(&provider, &id, tab, page, oldest_first)),
        Commands::Read {
            id,
            chapter,
            page,
            interactive,
        } => terminal::run_reader(&provider, &id, &chapter, page, interactive),
        Commands::Open { route } => match route.parse::<Route>() {
            Ok(route) => terminal::open_route(&provider, &route),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Commands::Genres => Ok(terminal::show_genres(&provider)),
        Commands::Popular { limit } => Ok(terminal::show_popular(&provider, limit)),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("\nError: {}", e);
            process::exit(1);
        }
    }
}
