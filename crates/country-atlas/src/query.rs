//! Set queries over the atlas

use crate::atlas::CountryAtlas;
use crate::index::normalize_key;
use crate::model::{Continent, Country};
use serde::{Deserialize, Serialize};

/// Multi-criteria filter. Unset criteria match everything; set criteria
/// combine with AND.
///
/// ```
/// use country_atlas::{Continent, CountryFilter};
///
/// let filter = CountryFilter::new()
///     .continent(Continent::Europe)
///     .currency("EUR")
///     .landlocked(true);
/// assert_eq!(filter.currency.as_deref(), Some("EUR"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<Continent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub un_member: Option<bool>,
    /// Substring of the common or official name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CountryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continent(mut self, continent: Continent) -> Self {
        self.continent = Some(continent);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn landlocked(mut self, landlocked: bool) -> Self {
        self.landlocked = Some(landlocked);
        self
    }

    pub fn un_member(mut self, un_member: bool) -> Self {
        self.un_member = Some(un_member);
        self
    }

    pub fn name(mut self, fragment: impl Into<String>) -> Self {
        self.name = Some(fragment.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, country: &Country) -> bool {
        if let Some(continent) = self.continent {
            if country.geo.continent != continent {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if normalize_key(&country.geo.region) != normalize_key(region) {
                return false;
            }
        }
        if let Some(code) = &self.currency {
            if !country.uses_currency(code) {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if !country.speaks(language) {
                return false;
            }
        }
        if let Some(landlocked) = self.landlocked {
            if country.geo.landlocked != landlocked {
                return false;
            }
        }
        if let Some(un_member) = self.un_member {
            if country.un_member != un_member {
                return false;
            }
        }
        if let Some(fragment) = &self.name {
            if !crate::search::name_contains(country, &normalize_key(fragment)) {
                return false;
            }
        }
        true
    }
}

impl CountryAtlas {
    /// Countries whose continent equals `name`, ignoring case. Unknown
    /// names give an empty list.
    pub fn by_continent(&self, name: &str) -> Vec<&Country> {
        let wanted = name.trim();
        self.countries()
            .iter()
            .filter(|c| c.geo.continent.as_str().eq_ignore_ascii_case(wanted))
            .collect()
    }

    pub fn in_continent(&self, continent: Continent) -> Vec<&Country> {
        self.dataset().partition(continent)
    }

    pub fn by_currency(&self, code: &str) -> Vec<&Country> {
        self.collect(self.index().by_currency.get(&normalize_key(code)))
    }

    pub fn by_language(&self, name: &str) -> Vec<&Country> {
        self.collect(self.index().by_language.get(&normalize_key(name)))
    }

    pub fn filter(&self, filter: &CountryFilter) -> Vec<&Country> {
        self.countries()
            .iter()
            .filter(|c| filter.matches(c))
            .collect()
    }

    /// Resolve a country by code or name, then its bordering countries.
    /// Border codes without a record are skipped.
    pub fn border_neighbors(&self, code_or_name: &str) -> Vec<&Country> {
        let Some(subject) = self.find(code_or_name) else {
            return Vec::new();
        };
        subject
            .geo
            .borders
            .iter()
            .filter_map(|code| self.by_iso3(code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> &'static CountryAtlas {
        CountryAtlas::global().unwrap()
    }

    fn alpha2s(countries: &[&Country]) -> Vec<String> {
        countries.iter().map(|c| c.iso.alpha2.clone()).collect()
    }

    #[test]
    fn test_by_continent() {
        let atlas = atlas();
        let asia = atlas.by_continent("asia");
        assert!(!asia.is_empty());
        assert!(asia.iter().all(|c| c.geo.continent == Continent::Asia));
        assert_eq!(asia, atlas.in_continent(Continent::Asia));
        assert_eq!(
            atlas.by_continent(" EUROPE ").len(),
            atlas.in_continent(Continent::Europe).len()
        );
        assert!(atlas.by_continent("Atlantis").is_empty());
    }

    #[test]
    fn test_by_currency() {
        let atlas = atlas();
        let euro = atlas.by_currency("eur");
        assert!(euro.len() > 10);
        assert!(euro.iter().all(|c| c.uses_currency("EUR")));
        assert!(euro.iter().any(|c| c.iso.alpha2 == "FR"));
        assert!(atlas.by_currency("XYZ").is_empty());
    }

    #[test]
    fn test_by_language() {
        let atlas = atlas();
        let hindi = atlas.by_language("hindi");
        assert_eq!(alpha2s(&hindi), vec!["IN"]);
        let spanish = atlas.by_language("Spanish");
        assert!(spanish.iter().any(|c| c.iso.alpha2 == "ES"));
        assert!(spanish.iter().any(|c| c.iso.alpha2 == "MX"));
        assert!(atlas.by_language("Klingon").is_empty());
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let atlas = atlas();
        let all = atlas.filter(&CountryFilter::default());
        assert_eq!(all.len(), atlas.len());
        assert!(CountryFilter::default().is_empty());
    }

    #[test]
    fn test_filter_combines_with_and() {
        let atlas = atlas();
        let filter = CountryFilter::new()
            .continent(Continent::Europe)
            .currency("eur")
            .landlocked(true);
        let result = atlas.filter(&filter);
        assert!(!result.is_empty());
        for country in &result {
            assert_eq!(country.geo.continent, Continent::Europe);
            assert!(country.uses_currency("EUR"));
            assert!(country.geo.landlocked);
        }
        assert!(result.iter().any(|c| c.iso.alpha2 == "AT"));
        assert!(!result.iter().any(|c| c.iso.alpha2 == "CH"));
    }

    #[test]
    fn test_filter_name_and_membership() {
        let atlas = atlas();
        let result = atlas.filter(&CountryFilter::new().name("korea"));
        assert_eq!(alpha2s(&result), vec!["KR", "KP"]);

        let non_members = atlas.filter(&CountryFilter::new().un_member(false));
        assert!(non_members.iter().any(|c| c.iso.alpha2 == "XK"));
        assert!(non_members.iter().all(|c| !c.un_member));

        let region = atlas.filter(&CountryFilter::new().region("southern asia"));
        assert!(region.iter().any(|c| c.iso.alpha2 == "IN"));
    }

    #[test]
    fn test_filter_deserialize() {
        let filter: CountryFilter =
            serde_json::from_str(r#"{"continent": "Americas", "unMember": true}"#).unwrap();
        assert_eq!(filter, CountryFilter::new().continent(Continent::Americas).un_member(true));
    }

    #[test]
    fn test_border_neighbors() {
        let atlas = atlas();
        let mut neighbours = alpha2s(&atlas.border_neighbors("India"));
        neighbours.sort();
        assert_eq!(neighbours, vec!["BD", "BT", "CN", "MM", "NP", "PK"]);

        assert!(atlas.border_neighbors("Japan").is_empty());
        assert!(atlas.border_neighbors("Narnia").is_empty());

        let china = atlas.border_neighbors("cn");
        assert_eq!(china.len(), atlas.by_iso2("CN").unwrap().geo.borders.len());
        assert!(china.iter().any(|c| c.iso.alpha2 == "HK"));
        assert!(china
            .iter()
            .all(|c| c.geo.borders.iter().any(|b| b == "CHN")));
    }

    #[test]
    fn test_border_neighbors_skip_unknown_codes() {
        use crate::dataset::Dataset;
        use crate::model::fixtures::country;

        let mut alpha = country("AA", "AAA", "Alpha", Continent::Asia);
        alpha.geo.borders = vec!["BBB".to_string(), "ZZZ".to_string()];
        let mut beta = country("BB", "BBB", "Beta", Continent::Asia);
        beta.geo.borders = vec!["AAA".to_string()];

        let atlas = CountryAtlas::new(Dataset::from_countries(vec![alpha, beta]).unwrap());
        assert_eq!(alpha2s(&atlas.border_neighbors("alpha")), vec!["BB"]);
    }
}
