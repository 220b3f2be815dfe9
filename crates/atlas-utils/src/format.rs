//! Display strings built from atlas records

use crate::phone::clean_phone_number;
use country_atlas::CountryAtlas;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagFormat {
    #[default]
    Emoji,
    Svg,
}

pub fn country_flag<'a>(atlas: &'a CountryAtlas, iso2: &str, format: FlagFormat) -> Option<&'a str> {
    let country = atlas.by_iso2(iso2)?;
    Some(match format {
        FlagFormat::Emoji => country.flag.emoji.as_str(),
        FlagFormat::Svg => country.flag.svg.as_str(),
    })
}

/// Prefix a phone number with the country's calling code unless it is
/// already there. No separator is inserted.
pub fn format_phone_number(atlas: &CountryAtlas, phone: &str, iso2: &str) -> Option<String> {
    let country = atlas.by_iso2(iso2)?;
    let calling_code = country.calling_code.as_deref()?;
    let cleaned = clean_phone_number(phone);

    if cleaned.starts_with(calling_code) {
        return Some(cleaned);
    }
    Some(format!("{}{}", calling_code, cleaned.trim_start_matches('0')))
}

/// `"🇮🇳 India"`
pub fn country_with_flag(atlas: &CountryAtlas, iso2: &str) -> Option<String> {
    let country = atlas.by_iso2(iso2)?;
    Some(format!("{} {}", country.flag.emoji, country.name))
}

/// `"₹ (INR)"`, or `"₹1,234.5 INR"` with an amount
pub fn format_currency(atlas: &CountryAtlas, iso2: &str, amount: Option<f64>) -> Option<String> {
    let currency = atlas.by_iso2(iso2)?.currency.as_ref()?;
    Some(match amount {
        Some(value) => format!("{}{} {}", currency.symbol, group_thousands(value), currency.code),
        None => format!("{} ({})", currency.symbol, currency.code),
    })
}

/// Comma-grouped integer part, at most three fraction digits, no trailing
/// zeros: 1234567.891 -> "1,234,567.891", 0.5 -> "0.5"
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
