/// Default findhelp.org search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://www.findhelp.org/search";

/// Search parameters for a directory scrape
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Free-form search term, e.g. "food" or "shelter"
    pub category: String,
    /// City name or postal code
    pub city: String,
}

impl SearchParams {
    pub fn new(category: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            city: city.into(),
        }
    }

    /// Build the results URL for this search.
    ///
    /// Inputs are interpolated as-is; the browser's navigation handles any encoding.
    pub fn search_url(&self, base_url: &str) -> String {
        format!("{}?terms={}&postal={}", base_url, self.category, self.city)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new("food", "94103")
    }
}
