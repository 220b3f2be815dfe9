//! Code format predicates

use crate::{AtlasError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("Invalid iso2 regex pattern"));
static ISO3: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid iso3 regex pattern"));
static CALLING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{1,4}$").expect("Invalid calling code regex pattern"));
static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid currency regex pattern"));

/// Exactly two uppercase ASCII letters
pub fn is_valid_iso2(code: &str) -> bool {
    ISO2.is_match(code)
}

/// Exactly three uppercase ASCII letters
pub fn is_valid_iso3(code: &str) -> bool {
    ISO3.is_match(code)
}

/// Optional `+` followed by one to four digits
pub fn is_valid_calling_code(code: &str) -> bool {
    CALLING_CODE.is_match(code)
}

pub fn is_valid_currency_code(code: &str) -> bool {
    CURRENCY_CODE.is_match(code)
}

fn ensure(valid: bool, field: &'static str, value: &str, reason: &str) -> Result<()> {
    if valid {
        Ok(())
    } else {
        Err(AtlasError::invalid_input(field, value, reason))
    }
}

pub fn ensure_iso2(code: &str) -> Result<()> {
    ensure(is_valid_iso2(code), "iso2", code, "expected 2 uppercase letters")
}

pub fn ensure_iso3(code: &str) -> Result<()> {
    ensure(is_valid_iso3(code), "iso3", code, "expected 3 uppercase letters")
}

pub fn ensure_calling_code(code: &str) -> Result<()> {
    ensure(
        is_valid_calling_code(code),
        "callingCode",
        code,
        "expected an optional '+' and 1-4 digits",
    )
}

pub fn ensure_currency_code(code: &str) -> Result<()> {
    ensure(
        is_valid_currency_code(code),
        "currency",
        code,
        "expected 3 uppercase letters",
    )
}
