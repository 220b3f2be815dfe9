//! Country record types

use crate::index::normalize_calling_code;
use crate::AtlasError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Continent partition of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    Asia,
    Europe,
    Africa,
    Americas,
    Oceania,
    Antarctic,
}

impl Continent {
    /// Every continent, in flattened dataset order
    pub const ALL: [Continent; 6] = [
        Continent::Asia,
        Continent::Europe,
        Continent::Africa,
        Continent::Americas,
        Continent::Oceania,
        Continent::Antarctic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Africa => "Africa",
            Self::Americas => "Americas",
            Self::Oceania => "Oceania",
            Self::Antarctic => "Antarctic",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AtlasError::invalid_input(
                    "continent",
                    s,
                    "expected one of Asia, Europe, Africa, Americas, Oceania, Antarctic",
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoCodes {
    pub alpha2: String,
    pub alpha3: String,
    /// ISO 3166-1 numeric code as written in the source ("064")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub region: String,
    pub continent: Continent,
    #[serde(default)]
    pub landlocked: bool,
    #[serde(default)]
    pub area_km2: f64,
    /// ISO alpha-3 codes of bordering countries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub borders: Vec<String>,
    /// Map marker position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<GeoPointer>,
    /// Bounding box around the territory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GeoBounds>,
    /// Identifier of the territory in an external places service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPointer {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Whether the point lies inside the box, edges included
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude)
            && (self.west..=self.east).contains(&longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub emoji: String,
    pub svg: String,
}

/// A time zone the territory observes, e.g. `UTC+05:30`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timezone {
    pub name: String,
    /// Signed `±HH:MM` offset from UTC
    pub utc_offset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_min: Option<i32>,
}

impl Timezone {
    /// Offset in minutes, from `utcOffsetMin` or parsed from `utcOffset`
    pub fn offset_minutes(&self) -> Option<i32> {
        if self.utc_offset_min.is_some() {
            return self.utc_offset_min;
        }
        let offset = self.utc_offset.trim();
        if offset.is_empty() {
            return Some(0);
        }
        let (sign, rest) = match offset.as_bytes()[0] {
            b'+' => (1, &offset[1..]),
            b'-' => (-1, &offset[1..]),
            _ => return None,
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        Some(sign * (hours * 60 + minutes))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domains {
    /// Primary internet top-level domain, e.g. `.in`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internet_tld: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Postal {
    /// `#` stands for a digit and `@` for a letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formats {
    /// Local date pattern such as `DD/MM/YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<Weekday>,
}

/// A single country record. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub official_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capital: Vec<String>,
    pub iso: IsoCodes,
    pub geo: Geo,
    /// Native names keyed by ISO 639-3 language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub native_names: BTreeMap<String, NativeName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// E.164 country calling code, usually with a leading `+`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calling_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Domains>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timezones: Vec<Timezone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal: Option<Postal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Formats>,
    pub flag: Flag,
    #[serde(default)]
    pub un_member: bool,
}

impl Country {
    pub fn has_calling_code(&self) -> bool {
        self.calling_code
            .as_deref()
            .and_then(normalize_calling_code)
            .is_some()
    }

    pub fn has_currency(&self) -> bool {
        self.currency.is_some()
    }

    pub fn has_capital(&self) -> bool {
        self.capital.iter().any(|c| !c.trim().is_empty())
    }

    pub fn is_landlocked(&self) -> bool {
        self.geo.landlocked
    }

    pub fn is_un_member(&self) -> bool {
        self.un_member
    }

    /// Primary top-level domain, falling back to the first listed one
    pub fn top_level_domain(&self) -> Option<&str> {
        let domains = self.domains.as_ref()?;
        domains
            .top_level_domain
            .as_deref()
            .or_else(|| domains.internet_tld.first().map(String::as_str))
    }

    /// First listed capital, if any
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    pub fn continent(&self) -> Continent {
        self.geo.continent
    }

    pub fn speaks(&self, language: &str) -> bool {
        let wanted = language.trim().to_lowercase();
        self.languages.iter().any(|l| l.to_lowercase() == wanted)
    }

    pub fn uses_currency(&self, code: &str) -> bool {
        self.currency
            .as_ref()
            .is_some_and(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal record for unit tests that don't need the embedded data
    pub fn country(alpha2: &str, alpha3: &str, name: &str, continent: Continent) -> Country {
        Country {
            name: name.to_string(),
            official_name: format!("Republic of {}", name),
            capital: Vec::new(),
            iso: IsoCodes {
                alpha2: alpha2.to_string(),
                alpha3: alpha3.to_string(),
                numeric: None,
            },
            geo: Geo {
                latitude: 0.0,
                longitude: 0.0,
                region: String::new(),
                continent,
                landlocked: false,
                area_km2: 0.0,
                borders: Vec::new(),
                pointer: None,
                bounds: None,
                place_id: None,
            },
            native_names: BTreeMap::new(),
            languages: Vec::new(),
            currency: None,
            calling_code: None,
            domains: None,
            timezones: Vec::new(),
            postal: None,
            formats: None,
            flag: Flag {
                emoji: String::new(),
                svg: String::new(),
            },
            un_member: true,
        }
    }
}
