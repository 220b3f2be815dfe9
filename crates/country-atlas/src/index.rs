//! Secondary lookup maps
//!
//! Built once from a validated record slice. Values are positions into that
//! slice, so the index never owns or copies records.

use crate::model::Country;
use std::collections::HashMap;
use tracing::debug;

/// Trim and lower-case a lookup key
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Digits of a calling code after trimming and dropping one leading `+`.
///
/// Anything else left over (separators, letters, a second `+`) makes the
/// code malformed and yields `None`.
pub fn normalize_calling_code(code: &str) -> Option<String> {
    let code = code.trim();
    let digits = code.strip_prefix('+').unwrap_or(code);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.to_string())
}

/// Parse an ISO numeric code so that "064" and "64" share a key
pub fn parse_numeric(code: &str) -> Option<u16> {
    let code = code.trim();
    if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    code.parse().ok()
}

#[derive(Debug, Default)]
pub struct CountryIndex {
    pub(crate) by_alpha2: HashMap<String, usize>,
    pub(crate) by_alpha3: HashMap<String, usize>,
    pub(crate) by_numeric: HashMap<u16, usize>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) by_calling_code: HashMap<String, Vec<usize>>,
    pub(crate) by_currency: HashMap<String, Vec<usize>>,
    pub(crate) by_language: HashMap<String, Vec<usize>>,
}

impl CountryIndex {
    pub fn build(countries: &[Country]) -> Self {
        let mut index = Self::default();

        for (pos, country) in countries.iter().enumerate() {
            index.by_alpha2.insert(normalize_key(&country.iso.alpha2), pos);
            index.by_alpha3.insert(normalize_key(&country.iso.alpha3), pos);
            if let Some(numeric) = country.iso.numeric.as_deref().and_then(parse_numeric) {
                index.by_numeric.insert(numeric, pos);
            }

            for key in name_keys(country) {
                // First record in dataset order keeps a contested name
                index.by_name.entry(key).or_insert(pos);
            }

            if let Some(digits) = country.calling_code.as_deref().and_then(normalize_calling_code) {
                index.by_calling_code.entry(digits).or_default().push(pos);
            }

            if let Some(currency) = &country.currency {
                index
                    .by_currency
                    .entry(normalize_key(&currency.code))
                    .or_default()
                    .push(pos);
            }

            for language in &country.languages {
                let entry = index.by_language.entry(normalize_key(language)).or_default();
                if entry.last() != Some(&pos) {
                    entry.push(pos);
                }
            }
        }

        debug!(
            "Indexed {} countries: {} names, {} calling codes, {} currencies, {} languages",
            countries.len(),
            index.by_name.len(),
            index.by_calling_code.len(),
            index.by_currency.len(),
            index.by_language.len()
        );

        index
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }
}

fn name_keys(country: &Country) -> Vec<String> {
    let mut keys = vec![
        normalize_key(&country.name),
        normalize_key(&country.official_name),
        normalize_key(&country.iso.alpha2),
        normalize_key(&country.iso.alpha3),
    ];
    for native in country.native_names.values() {
        keys.push(normalize_key(&native.common));
        keys.push(normalize_key(&native.official));
    }
    keys.retain(|k| !k.is_empty());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::country;
    use crate::model::{Continent, Currency, NativeName};

    #[test]
    fn test_normalize_calling_code() {
        assert_eq!(normalize_calling_code("+91").as_deref(), Some("91"));
        assert_eq!(normalize_calling_code(" +1876 ").as_deref(), Some("1876"));
        assert_eq!(normalize_calling_code("44").as_deref(), Some("44"));
        assert_eq!(normalize_calling_code("+"), None);
        assert_eq!(normalize_calling_code(""), None);
    }

    #[test]
    fn test_normalize_calling_code_rejects_malformed() {
        for code in [
            "9x1", "abc91", "(9)1", "+9-1", "91+", "1+876", "++91", "+1 876", " +1-876 ", "tel:91",
        ] {
            assert_eq!(normalize_calling_code(code), None, "{:?} should be rejected", code);
        }
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("064"), Some(64));
        assert_eq!(parse_numeric("64"), Some(64));
        assert_eq!(parse_numeric(" 356 "), Some(356));
        assert_eq!(parse_numeric("1234"), None);
        assert_eq!(parse_numeric("x1"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_name_first_record_wins() {
        let mut a = country("AA", "AAA", "Shared", Continent::Asia);
        a.official_name = "Alpha".to_string();
        let mut b = country("BB", "BBB", "Beta", Continent::Asia);
        b.native_names.insert(
            "xxx".to_string(),
            NativeName {
                official: "Shared".to_string(),
                common: "Beta Native".to_string(),
            },
        );

        let index = CountryIndex::build(&[a, b]);
        assert_eq!(index.by_name.get("shared"), Some(&0));
        assert_eq!(index.by_name.get("beta native"), Some(&1));
        assert_eq!(index.by_name.get("bbb"), Some(&1));
    }

    #[test]
    fn test_multi_valued_maps_keep_order() {
        let mut a = country("AA", "AAA", "Alpha", Continent::Europe);
        a.calling_code = Some("+7".to_string());
        a.currency = Some(Currency {
            code: "EUR".to_string(),
            name: "Euro".to_string(),
            symbol: "€".to_string(),
        });
        let mut b = a.clone();
        b.iso.alpha2 = "BB".to_string();
        b.iso.alpha3 = "BBB".to_string();
        b.calling_code = Some("7".to_string());

        let index = CountryIndex::build(&[a, b]);
        assert_eq!(index.by_calling_code.get("7"), Some(&vec![0, 1]));
        assert_eq!(index.by_currency.get("eur"), Some(&vec![0, 1]));
    }

    #[test]
    fn test_empty_calling_code_not_indexed() {
        let mut a = country("AA", "AAA", "Alpha", Continent::Antarctic);
        a.calling_code = Some("+".to_string());
        let mut b = country("BB", "BBB", "Beta", Continent::Antarctic);
        b.calling_code = Some("+4-4".to_string());
        let index = CountryIndex::build(&[a, b]);
        assert!(index.by_calling_code.is_empty());
    }
}
