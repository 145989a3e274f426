use serde::{Deserialize, Serialize};

/// A link to an external rating page together with the score shown for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingLink {
    pub url: String,
    pub score: f64,
}

impl RatingLink {
    /// True if no rating was found for this source
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Structured data extracted from one movie page
///
/// Field names are kept as-is in the serialized JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    pub name: Vec<String>,
    pub year: u16,
    pub category: Vec<String>,
    pub director: Vec<String>,
    pub character: Vec<String>,
    pub district: Vec<String>,
    pub release_date: String,
    pub length: String,
    pub alias: Vec<String>,
    pub douban: RatingLink,
    pub imdb: RatingLink,
}

impl Record {
    /// Returns the first name, which identifies the record in storage
    pub fn primary_name(&self) -> Option<&str> {
        self.name.first().map(String::as_str)
    }

    /// Only records with at least one non-blank name may be persisted
    pub fn is_valid(&self) -> bool {
        self.primary_name().is_some_and(|n| !n.trim().is_empty())
    }
}
