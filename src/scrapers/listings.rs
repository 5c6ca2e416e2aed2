use crate::models::ListingFields;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// Upper bound on listing blocks processed per page
pub const MAX_CANDIDATES: usize = 10;

const PRIMARY_CARDS: &str = ".resource-card, .program-card, .listing-card";
const DATA_TEST_CARDS: &str = "div[data-test='program-card'], div[data-test='resource-card']";
const GENERIC_CONTAINERS: &str =
    "div.MuiPaper-root, div.MuiCard-root, article, .program, .service, .agency, .listing";

const NAME_FIELD: &str = "h2, h3, h4, .organization-name, .program-name, .title";
const ADDRESS_FIELD: &str = ".address, .location, [itemprop='address']";
const WEBSITE_FIELD: &str = "a[href^='http']";
const PHONE_FIELD: &str = ".phone, .contact-phone, [itemprop='telephone']";
const HEADINGS: &str = "h1, h2, h3";

/// Which selector strategy located the listing blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateTier {
    /// Known listing-card class names
    Primary,
    /// `data-test` card markers
    DataAttribute,
    /// Broad container guess; may pick up blocks that aren't listings
    Generic,
}

struct TierStrategy {
    tier: CandidateTier,
    selector: Selector,
}

/// Output of one parse: the tier that matched (if any) and the listings found.
#[derive(Debug, Clone, Default)]
pub struct ParsedListings {
    pub tier: Option<CandidateTier>,
    pub listings: Vec<ListingFields>,
}

/// Parses a rendered findhelp.org results page into listing fields.
///
/// Candidate blocks come from the first selector tier with any matches. Fields
/// are looked up independently inside each block, so a block missing an address
/// or phone still produces a listing.
pub struct ListingParser {
    tiers: Vec<TierStrategy>,
    name: Selector,
    address: Selector,
    website: Selector,
    phone: Selector,
    headings: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tiers: vec![
                TierStrategy {
                    tier: CandidateTier::Primary,
                    selector: parse_selector(PRIMARY_CARDS)?,
                },
                TierStrategy {
                    tier: CandidateTier::DataAttribute,
                    selector: parse_selector(DATA_TEST_CARDS)?,
                },
                TierStrategy {
                    tier: CandidateTier::Generic,
                    selector: parse_selector(GENERIC_CONTAINERS)?,
                },
            ],
            name: parse_selector(NAME_FIELD)?,
            address: parse_selector(ADDRESS_FIELD)?,
            website: parse_selector(WEBSITE_FIELD)?,
            phone: parse_selector(PHONE_FIELD)?,
            headings: parse_selector(HEADINGS)?,
        })
    }

    /// Parse listing fields out of a full results page
    pub fn parse(&self, html: &str) -> ParsedListings {
        let document = Html::parse_document(html);

        for (i, heading) in document.select(&self.headings).take(10).enumerate() {
            debug!(
                "Heading {}: {} - {}",
                i + 1,
                heading.value().name(),
                element_text(heading)
            );
        }

        let Some((tier, candidates)) = self.find_candidates(&document) else {
            info!("No listing blocks matched any selector tier");
            return ParsedListings::default();
        };

        for (i, candidate) in candidates.iter().take(3).enumerate() {
            let classes: Vec<&str> = candidate.value().classes().collect();
            let snippet: String = candidate.html().chars().take(200).collect();
            debug!("Candidate {} classes={:?}: {}...", i + 1, classes, snippet);
        }

        let listings = candidates
            .into_iter()
            .take(MAX_CANDIDATES)
            .enumerate()
            .map(|(idx, candidate)| self.extract_fields(candidate, idx + 1))
            .collect();

        ParsedListings {
            tier: Some(tier),
            listings,
        }
    }

    /// Run the tiers in order, stopping at the first one with matches
    fn find_candidates<'a>(
        &self,
        document: &'a Html,
    ) -> Option<(CandidateTier, Vec<ElementRef<'a>>)> {
        self.tiers.iter().find_map(|strategy| {
            let found: Vec<_> = document.select(&strategy.selector).collect();
            info!("Found {} candidates with {:?} selectors", found.len(), strategy.tier);
            (!found.is_empty()).then_some((strategy.tier, found))
        })
    }

    fn extract_fields(&self, candidate: ElementRef<'_>, index: usize) -> ListingFields {
        let name = first_text(candidate, &self.name);
        let address = first_text(candidate, &self.address);
        let website = candidate
            .select(&self.website)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);
        let phone = first_text(candidate, &self.phone);

        if name.is_none() {
            debug!("Resource {}: no name element, using placeholder", index);
        }

        let fields = ListingFields {
            name: name.unwrap_or_else(|| format!("Resource {}", index)),
            address: address.unwrap_or_default(),
            website: website.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
        };

        debug!(
            index,
            name = %fields.name,
            address = %fields.address,
            website = %fields.website,
            phone = %fields.phone,
            "Extracted listing fields"
        );

        fields
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(candidate: ElementRef<'_>, selector: &Selector) -> Option<String> {
    candidate.select(selector).next().map(element_text)
}
