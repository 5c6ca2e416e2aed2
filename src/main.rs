mod config;
mod models;
mod scrapers;
mod summary;

use clap::Parser;
use config::Config;
use scrapers::{ChromeRenderer, FindhelpScraper, SearchParams};
use summary::{OpenAiClient, SummaryFetcher};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Find social-service listings on findhelp.org and summarize each organization
#[derive(Parser)]
#[command(name = "resource-scout")]
struct Cli {
    /// Search term, e.g. "food" or "shelter"
    category: Option<String>,

    /// City or postal code
    city: Option<String>,
}

impl Cli {
    /// Both positionals or neither; a lone category falls back to the default search
    fn search_params(self) -> SearchParams {
        match (self.category, self.city) {
            (Some(category), Some(city)) => SearchParams::new(category, city),
            (Some(category), None) => {
                warn!("No city given, ignoring category '{}' and using defaults", category);
                SearchParams::default()
            }
            _ => SearchParams::default(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = Cli::parse().search_params();
    let config = Config::from_env()?;

    info!("🔎 Resource Scout - findhelp.org scraper");
    info!("Category: {}, city/zipcode: {}", params.category, params.city);

    let model = OpenAiClient::new(&config.openai_api_key)
        .with_base_url(&config.openai_base_url)
        .with_model(&config.openai_model);
    info!("Summaries via {}", model.model());

    let summarizer = SummaryFetcher::new(model, config.fetch_timeout)?;
    let renderer = ChromeRenderer::new(
        config.settle_delay,
        config.chrome_sandbox,
        config.diagnostics.clone(),
    );
    let scraper = FindhelpScraper::new(renderer, summarizer, &config.output_path)?
        .with_search_url(&config.search_url);

    let resources = scraper.scrape(&params).await;

    info!("✅ Total results: {}", resources.len());

    for (i, resource) in resources.iter().take(3).enumerate() {
        println!("{}. {}", i + 1, resource.name);
        println!("   Address: {}", resource.address);
        println!("   Website: {}", resource.website);
        println!("   Phone: {}", resource.phone);
        println!("   Description: {}", resource.descriptions);
        println!();
    }

    Ok(())
}
