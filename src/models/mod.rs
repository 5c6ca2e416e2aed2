use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields pulled out of one listing block on the search results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFields {
    pub name: String,
    pub address: String,
    pub website: String,
    pub phone: String,
}

/// Core service record, one per unique listing name in a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRecord {
    pub id: String,
    pub city: String,
    pub category: String,
    pub name: String,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub descriptions: String,
}

impl ServiceRecord {
    /// Build a record with a freshly generated id.
    ///
    /// `descriptions` is forced empty when the listing has no website.
    pub fn new(category: &str, city: &str, fields: ListingFields, descriptions: String) -> Self {
        let descriptions = if fields.website.is_empty() {
            String::new()
        } else {
            descriptions
        };

        Self {
            id: Uuid::new_v4().to_string(),
            city: city.to_string(),
            category: category.to_string(),
            name: fields.name,
            address: fields.address,
            website: fields.website,
            phone: fields.phone,
            descriptions,
        }
    }
}
