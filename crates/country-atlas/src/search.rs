//! Case-insensitive name search

use crate::atlas::CountryAtlas;
use crate::index::normalize_key;
use crate::model::Country;
use tracing::debug;

/// `needle` must already be trimmed and lower-cased
pub(crate) fn name_contains(country: &Country, needle: &str) -> bool {
    country.name.to_lowercase().contains(needle)
        || country.official_name.to_lowercase().contains(needle)
}

impl CountryAtlas {
    /// Substring match against the common or official name, in dataset
    /// order. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Country> {
        let needle = normalize_key(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let results: Vec<&Country> = self
            .countries()
            .iter()
            .filter(|c| name_contains(c, &needle))
            .collect();
        debug!("search {:?}: {} match(es)", needle, results.len());
        results
    }
}
