//! Country data loading and validation
//!
//! The built-in dataset ships as one JSON document per continent, embedded
//! at compile time. External datasets are a single JSON array of records.
//! Every load path runs [`audit`] and refuses data with any issue.

use crate::model::{Continent, Country};
use crate::{AtlasError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const EMBEDDED: [(Continent, &str); 6] = [
    (Continent::Asia, include_str!("../data/asia.json")),
    (Continent::Europe, include_str!("../data/europe.json")),
    (Continent::Africa, include_str!("../data/africa.json")),
    (Continent::Americas, include_str!("../data/americas.json")),
    (Continent::Oceania, include_str!("../data/oceania.json")),
    (Continent::Antarctic, include_str!("../data/antarctic.json")),
];

/// A problem found while auditing a collection of records.
///
/// `position` is the zero-based index of the record in the flattened
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum DatasetIssue {
    MissingName {
        position: usize,
    },
    MissingOfficialName {
        position: usize,
        alpha2: String,
    },
    MalformedAlpha2 {
        position: usize,
        value: String,
    },
    MalformedAlpha3 {
        position: usize,
        value: String,
    },
    MalformedNumeric {
        position: usize,
        alpha2: String,
        value: String,
    },
    DuplicateAlpha2 {
        value: String,
        first: usize,
        second: usize,
    },
    DuplicateAlpha3 {
        value: String,
        first: usize,
        second: usize,
    },
    CoordinatesOutOfRange {
        position: usize,
        alpha2: String,
        latitude: f64,
        longitude: f64,
    },
    ContinentMismatch {
        alpha2: String,
        expected: Continent,
        found: Continent,
    },
}

impl fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName { position } => write!(f, "record #{}: missing name", position),
            Self::MissingOfficialName { position, alpha2 } => {
                write!(f, "record #{} ({}): missing official name", position, alpha2)
            }
            Self::MalformedAlpha2 { position, value } => {
                write!(f, "record #{}: alpha2 '{}' is not 2 letters", position, value)
            }
            Self::MalformedAlpha3 { position, value } => {
                write!(f, "record #{}: alpha3 '{}' is not 3 letters", position, value)
            }
            Self::MalformedNumeric {
                position,
                alpha2,
                value,
            } => write!(
                f,
                "record #{} ({}): numeric code '{}' is not 1-3 digits",
                position, alpha2, value
            ),
            Self::DuplicateAlpha2 {
                value,
                first,
                second,
            } => write!(
                f,
                "alpha2 '{}' used by records #{} and #{}",
                value, first, second
            ),
            Self::DuplicateAlpha3 {
                value,
                first,
                second,
            } => write!(
                f,
                "alpha3 '{}' used by records #{} and #{}",
                value, first, second
            ),
            Self::CoordinatesOutOfRange {
                position,
                alpha2,
                latitude,
                longitude,
            } => write!(
                f,
                "record #{} ({}): coordinates ({}, {}) out of range",
                position, alpha2, latitude, longitude
            ),
            Self::ContinentMismatch {
                alpha2,
                expected,
                found,
            } => write!(
                f,
                "{}: listed under {} but declares continent {}",
                alpha2, expected, found
            ),
        }
    }
}

fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

fn is_letters(code: &str, len: usize) -> bool {
    code.len() == len && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_numeric_code(code: &str) -> bool {
    (1..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit())
}

/// List every problem in a collection of records. An empty result means
/// the collection is safe to index.
pub fn audit(countries: &[Country]) -> Vec<DatasetIssue> {
    let mut issues = Vec::new();
    let mut seen_alpha2: HashMap<String, usize> = HashMap::new();
    let mut seen_alpha3: HashMap<String, usize> = HashMap::new();

    for (position, country) in countries.iter().enumerate() {
        let alpha2 = country.iso.alpha2.clone();

        if country.name.trim().is_empty() {
            issues.push(DatasetIssue::MissingName { position });
        }
        if country.official_name.trim().is_empty() {
            issues.push(DatasetIssue::MissingOfficialName {
                position,
                alpha2: alpha2.clone(),
            });
        }

        if !is_letters(&country.iso.alpha2, 2) {
            issues.push(DatasetIssue::MalformedAlpha2 {
                position,
                value: alpha2.clone(),
            });
        } else if let Some(&first) = seen_alpha2.get(&alpha2.to_uppercase()) {
            issues.push(DatasetIssue::DuplicateAlpha2 {
                value: alpha2.clone(),
                first,
                second: position,
            });
        } else {
            seen_alpha2.insert(alpha2.to_uppercase(), position);
        }

        let alpha3 = &country.iso.alpha3;
        if !is_letters(alpha3, 3) {
            issues.push(DatasetIssue::MalformedAlpha3 {
                position,
                value: alpha3.clone(),
            });
        } else if let Some(&first) = seen_alpha3.get(&alpha3.to_uppercase()) {
            issues.push(DatasetIssue::DuplicateAlpha3 {
                value: alpha3.clone(),
                first,
                second: position,
            });
        } else {
            seen_alpha3.insert(alpha3.to_uppercase(), position);
        }

        if let Some(numeric) = &country.iso.numeric {
            if !is_numeric_code(numeric) {
                issues.push(DatasetIssue::MalformedNumeric {
                    position,
                    alpha2: alpha2.clone(),
                    value: numeric.clone(),
                });
            }
        }

        if !is_valid_latitude(country.geo.latitude) || !is_valid_longitude(country.geo.longitude)
        {
            issues.push(DatasetIssue::CoordinatesOutOfRange {
                position,
                alpha2,
                latitude: country.geo.latitude,
                longitude: country.geo.longitude,
            });
        }
    }

    issues
}

/// The immutable record collection behind a [`crate::CountryAtlas`]
#[derive(Debug, Clone)]
pub struct Dataset {
    countries: Vec<Country>,
}

impl Dataset {
    /// Parse the built-in per-continent documents and flatten them in
    /// [`Continent::ALL`] order.
    pub fn embedded() -> Result<Self> {
        let mut countries = Vec::new();
        let mut issues = Vec::new();

        for (continent, raw) in EMBEDDED {
            let partition: Vec<Country> = serde_json::from_str(raw)?;
            debug!("Parsed {} embedded records for {}", partition.len(), continent);

            for country in &partition {
                if country.geo.continent != continent {
                    issues.push(DatasetIssue::ContinentMismatch {
                        alpha2: country.iso.alpha2.clone(),
                        expected: continent,
                        found: country.geo.continent,
                    });
                }
            }
            countries.extend(partition);
        }

        Self::checked(countries, issues)
    }

    /// Load a JSON array of records from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let countries: Vec<Country> = serde_json::from_reader(reader)?;
        Self::from_countries(countries)
    }

    /// Load a JSON array of records from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading countries from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    pub fn from_countries(countries: Vec<Country>) -> Result<Self> {
        Self::checked(countries, Vec::new())
    }

    fn checked(countries: Vec<Country>, mut issues: Vec<DatasetIssue>) -> Result<Self> {
        issues.extend(audit(&countries));
        if !issues.is_empty() {
            warn!("Rejecting dataset: {} issue(s)", issues.len());
            for issue in &issues {
                debug!("  {}", issue);
            }
            return Err(AtlasError::InvalidDataset { issues });
        }

        info!("Loaded {} countries", countries.len());
        Ok(Self { countries })
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Records of one continent, in dataset order
    pub fn partition(&self, continent: Continent) -> Vec<&Country> {
        self.countries
            .iter()
            .filter(|c| c.geo.continent == continent)
            .collect()
    }

    /// Every continent with its records, in [`Continent::ALL`] order
    pub fn partitions(&self) -> Vec<(Continent, Vec<&Country>)> {
        Continent::ALL
            .iter()
            .map(|&continent| (continent, self.partition(continent)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Country;
    type IntoIter = std::slice::Iter<'a, Country>;

    fn into_iter(self) -> Self::IntoIter {
        self.countries.iter()
    }
}
