pub mod browser;
pub mod findhelp;
pub mod listings;
pub mod traits;
pub mod types;

pub use browser::ChromeRenderer;
pub use findhelp::FindhelpScraper;
pub use types::SearchParams;
