//! Field projection of country records

use crate::model::{
    Country, Currency, Domains, Flag, Formats, Geo, IsoCodes, NativeName, Postal, Timezone,
};
use crate::AtlasError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Top-level record fields that can be projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    OfficialName,
    Capital,
    Iso,
    Geo,
    NativeNames,
    Languages,
    Currency,
    CallingCode,
    Domains,
    Timezones,
    Postal,
    Formats,
    Flag,
    UnMember,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Name,
        Field::OfficialName,
        Field::Capital,
        Field::Iso,
        Field::Geo,
        Field::NativeNames,
        Field::Languages,
        Field::Currency,
        Field::CallingCode,
        Field::Domains,
        Field::Timezones,
        Field::Postal,
        Field::Formats,
        Field::Flag,
        Field::UnMember,
    ];

    /// JSON key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::OfficialName => "officialName",
            Self::Capital => "capital",
            Self::Iso => "iso",
            Self::Geo => "geo",
            Self::NativeNames => "nativeNames",
            Self::Languages => "languages",
            Self::Currency => "currency",
            Self::CallingCode => "callingCode",
            Self::Domains => "domains",
            Self::Timezones => "timezones",
            Self::Postal => "postal",
            Self::Formats => "formats",
            Self::Flag => "flag",
            Self::UnMember => "unMember",
        }
    }

    /// Parse a comma-separated list, dropping names that aren't fields
    pub fn parse_list(list: &str) -> Vec<Field> {
        let mut fields = Vec::new();
        for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<Field>() {
                Ok(field) if !fields.contains(&field) => fields.push(field),
                Ok(_) => {}
                Err(_) => debug!("ignoring unknown field {:?}", raw),
            }
        }
        fields
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = AtlasError;

    /// Accepts camelCase or snake_case in any letter case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|&c| c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| AtlasError::invalid_input("field", s, "unknown country field"))
    }
}

/// A record with only the requested fields set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCountry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<IsoCodes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_names: Option<BTreeMap<String, NativeName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calling_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<Domains>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezones: Option<Vec<Timezone>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal: Option<Postal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Formats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub un_member: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Selection<'a> {
    Full(&'a Country),
    Partial(PartialCountry),
}

impl<'a> Selection<'a> {
    pub fn as_full(&self) -> Option<&'a Country> {
        match self {
            Self::Full(country) => Some(country),
            Self::Partial(_) => None,
        }
    }
}

fn non_empty_string(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn non_empty_vec(v: &[String]) -> Option<Vec<String>> {
    (!v.is_empty()).then(|| v.to_vec())
}

/// Project a record onto `fields`. The record itself is never modified;
/// requested fields that are absent or empty stay unset.
pub fn project<'a>(country: &'a Country, fields: &[Field]) -> Selection<'a> {
    if fields.is_empty() {
        return Selection::Full(country);
    }

    let mut partial = PartialCountry::default();
    for field in fields {
        match field {
            Field::Name => partial.name = non_empty_string(&country.name),
            Field::OfficialName => partial.official_name = non_empty_string(&country.official_name),
            Field::Capital => partial.capital = non_empty_vec(&country.capital),
            Field::Iso => partial.iso = Some(country.iso.clone()),
            Field::Geo => partial.geo = Some(country.geo.clone()),
            Field::NativeNames => {
                partial.native_names =
                    (!country.native_names.is_empty()).then(|| country.native_names.clone())
            }
            Field::Languages => partial.languages = non_empty_vec(&country.languages),
            Field::Currency => partial.currency = country.currency.clone(),
            Field::CallingCode => partial.calling_code = country.calling_code.clone(),
            Field::Domains => partial.domains = country.domains.clone(),
            Field::Timezones => {
                partial.timezones =
                    (!country.timezones.is_empty()).then(|| country.timezones.clone())
            }
            Field::Postal => partial.postal = country.postal.clone(),
            Field::Formats => partial.formats = country.formats.clone(),
            Field::Flag => partial.flag = Some(country.flag.clone()),
            Field::UnMember => partial.un_member = Some(country.un_member),
        }
    }
    Selection::Partial(partial)
}
