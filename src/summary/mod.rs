pub mod fetcher;
pub mod openai;
pub mod text;

#[cfg(test)]
pub(crate) mod test_server;

pub use fetcher::SummaryFetcher;
pub use openai::OpenAiClient;

use async_trait::async_trait;

/// Produces a short description of an organization from its website.
///
/// `None` means no summary could be made; callers decide what to store instead.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, name: &str, website: &str) -> Option<String>;
}
