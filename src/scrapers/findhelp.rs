use crate::models::{ListingFields, ServiceRecord};
use crate::scrapers::listings::ListingParser;
use crate::scrapers::traits::PageRenderer;
use crate::scrapers::types::{SearchParams, DEFAULT_SEARCH_URL};
use crate::summary::Summarizer;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// findhelp.org scraper: render, parse, dedup, summarize, persist
pub struct FindhelpScraper<R, S> {
    renderer: Arc<R>,
    summarizer: S,
    parser: ListingParser,
    search_url: String,
    output_path: PathBuf,
}

impl<R: PageRenderer + 'static, S: Summarizer> FindhelpScraper<R, S> {
    pub fn new(renderer: R, summarizer: S, output_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            renderer: Arc::new(renderer),
            summarizer,
            parser: ListingParser::new()?,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            output_path: output_path.into(),
        })
    }

    /// Use a different search endpoint
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Run one scrape.
    ///
    /// Any failure while rendering, parsing or saving throws away the whole run
    /// and returns no records; failures for a single listing only cost that
    /// listing its summary.
    pub async fn scrape(&self, params: &SearchParams) -> Vec<ServiceRecord> {
        match self.try_scrape(params).await {
            Ok(records) => records,
            Err(e) => {
                error!("Scrape for '{}' in '{}' failed: {:#}", params.category, params.city, e);
                Vec::new()
            }
        }
    }

    async fn try_scrape(&self, params: &SearchParams) -> Result<Vec<ServiceRecord>> {
        info!(
            category = %params.category,
            city = %params.city,
            "Searching findhelp.org"
        );

        let url = params.search_url(&self.search_url);
        info!("Rendering {} with {}", url, self.renderer.backend_name());
        // Rendering sleeps and blocks on the browser; keep it off the async workers
        let renderer = Arc::clone(&self.renderer);
        let html = tokio::task::spawn_blocking(move || renderer.render(&url))
            .await
            .context("Render task panicked")?
            .context("Failed to render search results")?;

        info!("Parsing results...");
        let parsed = self.parser.parse(&html);
        info!(
            "Found {} listings (tier: {:?})",
            parsed.listings.len(),
            parsed.tier
        );

        let records = self.build_records(params, parsed.listings).await;

        save_records(&self.output_path, &records).await?;
        info!(
            "💾 Saved {} resources to {}",
            records.len(),
            self.output_path.display()
        );

        Ok(records)
    }

    async fn build_records(
        &self,
        params: &SearchParams,
        listings: Vec<ListingFields>,
    ) -> Vec<ServiceRecord> {
        let mut visited = HashSet::new();
        let mut records = Vec::new();

        for fields in listings {
            if fields.name.is_empty() {
                debug!("Skipping listing with an empty name element");
                continue;
            }
            if !visited.insert(fields.name.clone()) {
                debug!("Skipping duplicate listing: {}", fields.name);
                continue;
            }

            let descriptions = if fields.website.is_empty() {
                String::new()
            } else {
                info!("Extracting summary for {} from {}", fields.name, fields.website);
                self.summarizer
                    .summarize(&fields.name, &fields.website)
                    .await
                    .unwrap_or_default()
            };

            let record = ServiceRecord::new(&params.category, &params.city, fields, descriptions);
            info!("Added resource: {}", record.name);
            records.push(record);
        }

        records
    }
}

/// Write the full record set, replacing whatever a previous run left behind
pub async fn save_records(path: &Path, records: &[ServiceRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Readers never see a partially written file
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("Failed to move results into {}", path.display()));
    }

    Ok(())
}
