//! The scrape pipeline: fetch locator page → parse → upsert.

use anyhow::Context;
use outletdb_db::NewOutlet;
use outletdb_scraper::{parse_outlets, LocatorClient, ScrapedOutlet, ScraperError};

pub async fn run(url_override: Option<String>, dry_run: bool) -> anyhow::Result<()> {
    let config = outletdb_core::load_app_config_from_env()?;
    let url = url_override.unwrap_or_else(|| config.locator_url.clone());

    let client = LocatorClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;

    tracing::info!(url, "fetching outlet locator page");
    let body = client.fetch_locator_page(&url).await?;

    let scraped = parse_outlets(&body);
    if scraped.is_empty() {
        return Err(ScraperError::NoOutletsFound { url }.into());
    }
    tracing::info!(count = scraped.len(), "parsed outlet entries");

    if dry_run {
        for outlet in &scraped {
            tracing::info!(
                name = %outlet.name,
                address = %outlet.address,
                hours = outlet.operating_hours.as_deref().unwrap_or("-"),
                "dry run: would upsert"
            );
        }
        return Ok(());
    }

    let pool = outletdb_db::connect_pool(
        &config.database_url,
        outletdb_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("connecting to Postgres")?;
    outletdb_db::run_migrations(&pool).await?;

    let records: Vec<NewOutlet> = scraped.into_iter().map(to_new_outlet).collect();
    let (new_count, updated_count) = outletdb_db::upsert_outlets(&pool, &records).await?;
    tracing::info!(new_count, updated_count, "scrape complete");

    Ok(())
}

fn to_new_outlet(scraped: ScrapedOutlet) -> NewOutlet {
    NewOutlet {
        name: scraped.name,
        address: scraped.address,
        operating_hours: scraped.operating_hours,
        latitude: scraped.latitude,
        longitude: scraped.longitude,
        waze_link: scraped.waze_link,
    }
}
