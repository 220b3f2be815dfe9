//! Indexed country registry and point lookups

use crate::dataset::Dataset;
use crate::index::{normalize_calling_code, normalize_key, parse_numeric, CountryIndex};
use crate::model::Country;
use crate::selector::{project, Field, Selection};
use crate::{AtlasError, LookupKind, Result};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use tracing::info;

static GLOBAL: OnceCell<CountryAtlas> = OnceCell::new();

/// Outcome of resolving a calling code that several countries may share
#[derive(Debug, Clone, PartialEq)]
pub enum CallingCodeMatch<'a> {
    Unknown,
    Unique(&'a Country),
    /// All holders of the code, in dataset order
    Shared(Vec<&'a Country>),
}

impl<'a> CallingCodeMatch<'a> {
    /// First holder in dataset order
    pub fn first(&self) -> Option<&'a Country> {
        match self {
            Self::Unknown => None,
            Self::Unique(country) => Some(country),
            Self::Shared(countries) => countries.first().copied(),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    pub fn into_vec(self) -> Vec<&'a Country> {
        match self {
            Self::Unknown => Vec::new(),
            Self::Unique(country) => vec![country],
            Self::Shared(countries) => countries,
        }
    }
}

/// Read-only country collection with its secondary index.
///
/// The index is built in [`CountryAtlas::new`] and never changes, so an
/// atlas can be shared freely between threads.
#[derive(Debug)]
pub struct CountryAtlas {
    dataset: Dataset,
    index: CountryIndex,
}

impl CountryAtlas {
    pub fn new(dataset: Dataset) -> Self {
        let index = CountryIndex::build(dataset.countries());
        info!(
            "Country atlas ready: {} countries, {} name keys",
            dataset.len(),
            index.name_count()
        );
        Self { dataset, index }
    }

    /// Atlas over the built-in dataset
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(Dataset::embedded()?))
    }

    /// Process-wide atlas over the built-in dataset, built on first use
    pub fn global() -> Result<&'static CountryAtlas> {
        GLOBAL.get_or_try_init(Self::embedded)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn countries(&self) -> &[Country] {
        self.dataset.countries()
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub(crate) fn index(&self) -> &CountryIndex {
        &self.index
    }

    pub(crate) fn at(&self, pos: usize) -> Option<&Country> {
        self.dataset.countries().get(pos)
    }

    pub(crate) fn collect(&self, positions: Option<&Vec<usize>>) -> Vec<&Country> {
        positions
            .map(|p| p.iter().filter_map(|&pos| self.at(pos)).collect())
            .unwrap_or_default()
    }

    pub fn by_iso2(&self, code: &str) -> Option<&Country> {
        let pos = *self.index.by_alpha2.get(&normalize_key(code))?;
        self.at(pos)
    }

    pub fn by_iso3(&self, code: &str) -> Option<&Country> {
        let pos = *self.index.by_alpha3.get(&normalize_key(code))?;
        self.at(pos)
    }

    /// Lookup by ISO numeric code; leading zeros are not significant
    pub fn by_numeric(&self, code: &str) -> Option<&Country> {
        let numeric = parse_numeric(code)?;
        let pos = *self.index.by_numeric.get(&numeric)?;
        self.at(pos)
    }

    /// Exact, case-insensitive match on common, official, ISO or native names
    pub fn by_name(&self, query: &str) -> Option<&Country> {
        let pos = *self.index.by_name.get(&normalize_key(query))?;
        self.at(pos)
    }

    /// ISO2, then ISO3, then any indexed name
    pub fn find(&self, query: &str) -> Option<&Country> {
        self.by_iso2(query)
            .or_else(|| self.by_iso3(query))
            .or_else(|| self.by_name(query))
    }

    /// First country in dataset order holding the calling code.
    ///
    /// Shared codes ("+1", "+7") resolve to a single country here; use
    /// [`Self::resolve_calling_code`] when the ambiguity matters.
    pub fn by_calling_code(&self, code: &str) -> Option<&Country> {
        self.all_by_calling_code(code).into_iter().next()
    }

    /// Every holder of the code in dataset order. Malformed codes match nothing.
    pub fn all_by_calling_code(&self, code: &str) -> Vec<&Country> {
        match normalize_calling_code(code) {
            Some(digits) => self.collect(self.index.by_calling_code.get(&digits)),
            None => Vec::new(),
        }
    }

    pub fn resolve_calling_code(&self, code: &str) -> CallingCodeMatch<'_> {
        let mut all = self.all_by_calling_code(code);
        match all.len() {
            0 => CallingCodeMatch::Unknown,
            1 => CallingCodeMatch::Unique(all.remove(0)),
            _ => CallingCodeMatch::Shared(all),
        }
    }

    pub fn require_iso2(&self, code: &str) -> Result<&Country> {
        self.by_iso2(code)
            .ok_or_else(|| not_found(code, LookupKind::Iso2))
    }

    pub fn require_iso3(&self, code: &str) -> Result<&Country> {
        self.by_iso3(code)
            .ok_or_else(|| not_found(code, LookupKind::Iso3))
    }

    pub fn require_name(&self, query: &str) -> Result<&Country> {
        self.by_name(query)
            .ok_or_else(|| not_found(query, LookupKind::Name))
    }

    /// Strict form of [`Self::by_calling_code`]; malformed codes are
    /// `InvalidInput`, well-formed but unassigned ones `NotFound`
    pub fn require_calling_code(&self, code: &str) -> Result<&Country> {
        if normalize_calling_code(code).is_none() {
            return Err(AtlasError::invalid_input(
                "calling code",
                code,
                "expected an optional '+' followed by digits only",
            ));
        }
        self.by_calling_code(code)
            .ok_or_else(|| not_found(code, LookupKind::CallingCode))
    }

    /// Look up by ISO2 and project onto `fields`. An empty field list
    /// yields the full record.
    pub fn select(&self, code: &str, fields: &[Field]) -> Option<Selection<'_>> {
        self.by_iso2(code).map(|country| project(country, fields))
    }

    /// All alpha-2 codes, sorted
    pub fn iso2_codes(&self) -> Vec<&str> {
        sorted_unique(self.countries().iter().map(|c| c.iso.alpha2.as_str()))
    }

    /// All alpha-3 codes, sorted
    pub fn iso3_codes(&self) -> Vec<&str> {
        sorted_unique(self.countries().iter().map(|c| c.iso.alpha3.as_str()))
    }

    /// Distinct currency codes in use, sorted
    pub fn currency_codes(&self) -> Vec<&str> {
        sorted_unique(
            self.countries()
                .iter()
                .filter_map(|c| c.currency.as_ref())
                .map(|c| c.code.as_str()),
        )
    }
}

fn not_found(query: &str, kind: LookupKind) -> AtlasError {
    AtlasError::NotFound {
        query: query.to_string(),
        kind,
    }
}

fn sorted_unique<'a>(codes: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    codes.collect::<BTreeSet<_>>().into_iter().collect()
}
