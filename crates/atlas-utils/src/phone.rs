//! Phone number validation and international formatting
//!
//! Numbers are cleaned down to digits and `+`. With an explicit country
//! the number may carry that country's calling code or be national. Without
//! one, the calling code is detected from a `+` or `00` prefix, longest
//! match first, so `+1 876 …` resolves to Jamaica rather than the `+1`
//! holders. Leading trunk zeros are dropped from the national part.

use country_atlas::index::normalize_calling_code;
use country_atlas::{Country, CountryAtlas};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

pub const MIN_NATIONAL_DIGITS: usize = 4;
pub const MAX_NATIONAL_DIGITS: usize = 15;
const MAX_CALLING_CODE_DIGITS: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number is required")]
    Required,
    #[error("Invalid country code: {0}")]
    InvalidCountry(String),
    #[error("Country {0} has no calling code")]
    NoCallingCode(String),
    #[error("Phone number too short")]
    TooShort,
    #[error("Phone number too long")]
    TooLong,
    #[error("Could not determine country from phone number. Please provide country code.")]
    UnknownCountry,
}

/// Full outcome of [`validate_phone_number`]. When a country was resolved
/// it is reported even if the number itself is invalid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneValidation<'a> {
    pub is_valid: bool,
    #[serde(
        serialize_with = "serialize_country",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<&'a Country>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calling_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_number: Option<String>,
    #[serde(
        serialize_with = "serialize_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<PhoneError>,
}

fn serialize_country<S: Serializer>(
    country: &Option<&Country>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match country {
        Some(c) => serializer.serialize_some(&c.iso.alpha2),
        None => serializer.serialize_none(),
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<PhoneError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Components of a valid phone number
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPhone<'a> {
    pub country: &'a Country,
    pub calling_code: String,
    pub national_number: String,
}

impl<'a> PhoneValidation<'a> {
    fn failed(error: PhoneError) -> Self {
        Self {
            is_valid: false,
            country: None,
            calling_code: None,
            national_number: None,
            formatted_number: None,
            error: Some(error),
        }
    }

    /// Length-check the national part for a resolved country
    fn resolved(country: &'a Country, calling_code: &str, national: String) -> Self {
        let error = if national.len() < MIN_NATIONAL_DIGITS {
            Some(PhoneError::TooShort)
        } else if national.len() > MAX_NATIONAL_DIGITS {
            Some(PhoneError::TooLong)
        } else {
            None
        };

        Self {
            is_valid: error.is_none(),
            country: Some(country),
            calling_code: Some(calling_code.to_string()),
            formatted_number: error
                .is_none()
                .then(|| format!("{} {}", calling_code, national)),
            national_number: Some(national),
            error,
        }
    }

    pub fn into_result(self) -> Result<ParsedPhone<'a>, PhoneError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match (self.country, self.calling_code, self.national_number) {
            (Some(country), Some(calling_code), Some(national_number)) => Ok(ParsedPhone {
                country,
                calling_code,
                national_number,
            }),
            _ => Err(PhoneError::UnknownCountry),
        }
    }
}

/// Digits and `+` only
pub fn clean_phone_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn national_part(digits: &str) -> String {
    digits
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .trim_start_matches('0')
        .to_string()
}

pub fn validate_phone_number<'a>(
    atlas: &'a CountryAtlas,
    number: &str,
    country: Option<&str>,
) -> PhoneValidation<'a> {
    if number.trim().is_empty() {
        return PhoneValidation::failed(PhoneError::Required);
    }
    let cleaned = clean_phone_number(number);

    match country {
        Some(iso2) => validate_for_country(atlas, &cleaned, iso2),
        None => validate_detected(atlas, &cleaned),
    }
}

fn validate_for_country<'a>(
    atlas: &'a CountryAtlas,
    cleaned: &str,
    iso2: &str,
) -> PhoneValidation<'a> {
    let Some(country) = atlas.by_iso2(iso2) else {
        return PhoneValidation::failed(PhoneError::InvalidCountry(iso2.to_string()));
    };
    let Some((calling_code, code_digits)) = country
        .calling_code
        .as_deref()
        .and_then(|code| normalize_calling_code(code).map(|digits| (code, digits)))
    else {
        return PhoneValidation::failed(PhoneError::NoCallingCode(country.name.clone()));
    };

    let body = cleaned.strip_prefix('+').unwrap_or(cleaned);
    let national = match body.strip_prefix(code_digits.as_str()) {
        Some(rest) => national_part(rest),
        None => national_part(body),
    };

    PhoneValidation::resolved(country, calling_code, national)
}

fn validate_detected<'a>(atlas: &'a CountryAtlas, cleaned: &str) -> PhoneValidation<'a> {
    let Some(tail) = cleaned
        .strip_prefix('+')
        .or_else(|| cleaned.strip_prefix("00"))
    else {
        return PhoneValidation::failed(PhoneError::UnknownCountry);
    };
    let digits: String = tail.chars().filter(|c| c.is_ascii_digit()).collect();

    for len in (1..=MAX_CALLING_CODE_DIGITS.min(digits.len())).rev() {
        let (prefix, rest) = digits.split_at(len);
        if let Some(country) = atlas.by_calling_code(prefix) {
            debug!("calling code +{} resolved to {}", prefix, country.iso.alpha2);
            let calling_code = country.calling_code.as_deref().unwrap_or(prefix);
            return PhoneValidation::resolved(country, calling_code, national_part(rest));
        }
    }

    PhoneValidation::failed(PhoneError::UnknownCountry)
}

pub fn is_valid_phone_number(atlas: &CountryAtlas, number: &str, country: Option<&str>) -> bool {
    validate_phone_number(atlas, number, country).is_valid
}

/// `"+91 9876543210"` for a valid number
pub fn format_phone_number_international(
    atlas: &CountryAtlas,
    number: &str,
    country: Option<&str>,
) -> Option<String> {
    validate_phone_number(atlas, number, country).formatted_number
}

/// Country whose calling code prefixes the number, valid or not
pub fn country_from_phone_number<'a>(atlas: &'a CountryAtlas, number: &str) -> Option<&'a Country> {
    validate_phone_number(atlas, number, None).country
}

pub fn parse_phone_number<'a>(
    atlas: &'a CountryAtlas,
    number: &str,
    country: Option<&str>,
) -> Result<ParsedPhone<'a>, PhoneError> {
    validate_phone_number(atlas, number, country).into_result()
}
