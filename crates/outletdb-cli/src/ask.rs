//! One-shot query resolution from the terminal.
//!
//! Selection state lives in process memory, so when a question is ambiguous
//! the command prompts for a number on stdin instead of asking the user to
//! run a second invocation.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use outletdb_core::engine::{InMemorySelectionStore, QueryResolver, SubstringMatcher};
use outletdb_core::QueryReply;
use outletdb_db::PgOutletDirectory;

pub async fn run(query: &str, user_id: &str) -> anyhow::Result<()> {
    let config = outletdb_core::load_app_config_from_env()?;
    let pool = outletdb_db::connect_pool(
        &config.database_url,
        outletdb_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("connecting to Postgres")?;

    let resolver = QueryResolver::new(
        PgOutletDirectory::new(pool),
        SubstringMatcher,
        InMemorySelectionStore::default(),
    );

    let mut reply = resolver.resolve_query(query, user_id).await?;

    if let QueryReply::Multiple { ref message, .. } = reply {
        println!("{message}");
        print!("choice> ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let choice: i64 = line.trim().parse().context("choice must be a number")?;

        reply = resolver.resolve_selection(user_id, choice).await?;
    }

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
