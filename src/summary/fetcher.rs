use crate::summary::openai::CompletionModel;
use crate::summary::text::visible_text;
use crate::summary::Summarizer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hard cutoff on how much page text goes into the prompt
pub const MAX_PROMPT_CHARS: usize = 4000;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn system_prompt(name: &str) -> String {
    format!(
        "Write a maximum of two sentences summarizing the overview and mission of the organization called {name}, based on web searched information. For example, '{name} primarily offers [main service] and serves [main target].' If no relevant information is found, return N/A."
    )
}

fn user_prompt(name: &str, content: &str) -> String {
    format!("Give me an overview of {name} based on this website content: {content}")
}

/// Summarizes an organization from the text of its own website
pub struct SummaryFetcher<M> {
    http_client: Client,
    model: M,
}

impl<M: CompletionModel> SummaryFetcher<M> {
    pub fn new(model: M, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client, model })
    }

    async fn fetch_page(&self, url: &str) -> reqwest::Result<String> {
        self.http_client.get(url).send().await?.text().await
    }
}

#[async_trait]
impl<M: CompletionModel> Summarizer for SummaryFetcher<M> {
    async fn summarize(&self, name: &str, website: &str) -> Option<String> {
        info!("Fetching website content from: {}", website);

        let html = match self.fetch_page(website).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%website, "Could not fetch website: {}", e);
                return None;
            }
        };
        debug!("Received {} bytes of HTML", html.len());

        let text = visible_text(&html);
        if text.is_empty() {
            info!("No visible text content found on {}", website);
            return None;
        }

        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        debug!("Sending {} characters to the model", excerpt.chars().count());

        match self
            .model
            .complete(&system_prompt(name), &user_prompt(name, &excerpt))
            .await
        {
            Ok(completion) => {
                let summary = completion.trim().to_string();
                info!(%name, "Generated summary: {}", summary);
                (!summary.is_empty()).then_some(summary)
            }
            Err(e) => {
                warn!(%name, "Summary request failed: {}", e);
                None
            }
        }
    }
}
