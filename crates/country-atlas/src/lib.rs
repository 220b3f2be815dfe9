//! Country Atlas
//!
//! A read-only reference dataset of world countries (ISO codes, geography,
//! currency, calling codes, languages, flags) with an eagerly built index
//! for point lookups, set queries, substring search and field projection.
//!
//! # Layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | Record types and the [`Continent`] enumeration |
//! | [`dataset`] | Embedded per-continent data, loaders, audit |
//! | [`index`] | Secondary maps built once per [`CountryAtlas`] |
//! | [`atlas`] | Point lookups, calling-code resolution, strict variants |
//! | [`query`] | Continent/currency/language sets, [`CountryFilter`], borders |
//! | [`search`] | Case-insensitive name search |
//! | [`selector`] | [`Field`] projection of a record |
//! | [`validators`] | Code format predicates |
//!
//! ```no_run
//! use country_atlas::{CountryAtlas, Field};
//!
//! let atlas = CountryAtlas::global()?;
//! let india = atlas.require_iso2("in")?;
//! assert_eq!(india.iso.alpha3, "IND");
//!
//! let partial = atlas.select("jp", &[Field::Name, Field::Currency]);
//! assert!(partial.is_some());
//! # Ok::<(), country_atlas::AtlasError>(())
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod atlas;
pub mod dataset;
pub mod index;
pub mod model;
pub mod query;
pub mod search;
pub mod selector;
pub mod validators;

pub use atlas::{CallingCodeMatch, CountryAtlas};
pub use dataset::{audit, Dataset, DatasetIssue};
pub use model::{
    Continent, Country, Currency, Domains, Flag, Formats, Geo, GeoBounds, GeoPointer, IsoCodes,
    NativeName, Postal, Timezone, Weekday,
};
pub use query::CountryFilter;
pub use selector::{project, Field, PartialCountry, Selection};

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Country not found with {kind}: {query}")]
    NotFound { query: String, kind: LookupKind },
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid dataset: {count} issue(s) found", count = .issues.len())]
    InvalidDataset { issues: Vec<DatasetIssue> },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

impl AtlasError {
    pub(crate) fn invalid_input(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Which key a strict lookup was performed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupKind {
    Iso2,
    Iso3,
    Name,
    CallingCode,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso2 => "iso2",
            Self::Iso3 => "iso3",
            Self::Name => "name",
            Self::CallingCode => "callingCode",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
