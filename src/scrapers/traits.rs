use anyhow::Result;

/// Something that can turn a URL into fully rendered markup.
/// Headless Chrome in production, canned HTML in tests.
pub trait PageRenderer: Send + Sync {
    /// Navigate to `url`, let client-side rendering settle and return the page HTML
    fn render(&self, url: &str) -> Result<String>;

    /// Get the name of the rendering backend
    fn backend_name(&self) -> &'static str;
}
