//! Plain-text rendering for terminal output

use atlas_utils::format::group_thousands;
use country_atlas::Country;

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: String) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

/// Multi-line detail card for a single country
pub fn detail(country: &Country) -> String {
    let currency = country
        .currency
        .as_ref()
        .map(|c| format!("{} ({})", c.name, c.code))
        .unwrap_or_default();

    let mut lines = vec![
        String::new(),
        format!("{}  {}", country.flag.emoji, country.name.to_uppercase()),
        "=".repeat(country.name.chars().count() + 4),
        format!("Official Name : {}", country.official_name),
        format!("ISO Codes     : {} / {}", country.iso.alpha2, country.iso.alpha3),
        format!("Capital       : {}", or_na(country.capital.join(", "))),
        format!(
            "Region        : {} ({})",
            or_na(country.geo.region.clone()),
            country.geo.continent
        ),
        format!("Currency      : {}", or_na(currency)),
        format!(
            "Calling Code  : {}",
            or_na(country.calling_code.clone().unwrap_or_default())
        ),
        format!("Languages     : {}", or_na(country.languages.join(", "))),
        format!("Area          : {} km²", group_thousands(country.geo.area_km2)),
    ];
    if !country.geo.borders.is_empty() {
        lines.push(format!("Borders       : {}", country.geo.borders.join(", ")));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Column-aligned table with a `-+-` separator under the header
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| {
                let pad = w.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };
    let separator = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut out = format_row(headers.to_vec());
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub const COUNTRY_HEADERS: [&str; 5] = ["Flag", "Name", "ISO2", "Capital", "Region"];

pub fn country_row(country: &Country) -> Vec<String> {
    vec![
        country.flag.emoji.clone(),
        country.name.clone(),
        country.iso.alpha2.clone(),
        or_na(country.primary_capital().unwrap_or_default().to_string()),
        or_na(country.geo.region.clone()),
    ]
}

/// Standard country table followed by the result count
pub fn country_table(countries: &[&Country]) -> String {
    let rows: Vec<Vec<String>> = countries.iter().map(|c| country_row(c)).collect();
    let mut out = table(&COUNTRY_HEADERS, &rows);
    out.push_str(&format!("\nTotal: {} countries found.\n", countries.len()));
    out
}
