mod ask;
mod scrape;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "outletdb-cli")]
#[command(about = "outletdb command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the outlet-locator page and upsert outlets into Postgres.
    Scrape {
        /// Override the locator page URL from config.
        #[arg(long)]
        url: Option<String>,
        /// Parse and report without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve a free-text question against the outlet directory.
    Ask {
        /// The question, e.g. "what time does the outlet in Bangsar close?".
        query: String,
        /// User identifier for the disambiguation flow.
        #[arg(long, default_value = "cli")]
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { url, dry_run } => scrape::run(url, dry_run).await,
        Commands::Ask { query, user_id } => ask::run(&query, &user_id).await,
    }
}
