//! tsdlink CLI - Query time-series SQL endpoints from the terminal.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::ConnectionArgs;
use display::Format;

#[derive(Parser)]
#[command(name = "tsdlink")]
#[command(about = "Query time-series SQL endpoints with schema discovery", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and warnings)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover the result columns of a query without fetching rows
    Schema {
        /// SQL query text
        query: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Run a query and print its rows
    Query {
        /// SQL query text
        query: String,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Store strategy for the fetched content (memory, file, none)
        #[arg(long, default_value = "memory")]
        strategy: String,

        /// Maximum number of rows to print (0 for all)
        #[arg(long, default_value = "0")]
        max_rows: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Show server build and license information
    Info {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Schema { query, connection } => {
            commands::schema::show_schema(&query, &connection, cli.quiet).await
        }
        Commands::Query {
            query,
            connection,
            strategy,
            max_rows,
            format,
        } => {
            commands::query::run_query(&query, &connection, &strategy, max_rows, format, cli.quiet)
                .await
        }
        Commands::Info { connection } => commands::info::show_info(&connection).await,
    }
}
