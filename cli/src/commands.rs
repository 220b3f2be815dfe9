//! Command dispatch. Every command writes to the given sink so that output
//! can be captured in tests.

use crate::render;
use crate::{Cli, Command, Query};
use anyhow::{bail, Context, Result};
use atlas_utils::flag::{emoji_to_unicode, resize_svg, resize_with_preset, svg_to_base64_data_url};
use atlas_utils::format::group_thousands;
use atlas_utils::geo::{distance_between, nearest_countries, share_border};
use atlas_utils::phone::validate_phone_number;
use country_atlas::{
    project, AtlasError, CallingCodeMatch, Continent, Country, CountryAtlas, CountryFilter,
    Dataset, Field,
};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use tracing::debug;

struct Output<'w> {
    out: &'w mut dyn Write,
    json: bool,
    fields: Vec<Field>,
}

impl Output<'_> {
    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{}", text)?;
        Ok(())
    }

    /// Detail card, or the projected record when fields were requested
    fn country(&mut self, country: &Country) -> Result<()> {
        if self.json || !self.fields.is_empty() {
            let selection = project(country, &self.fields);
            return self.json(&selection);
        }
        self.text(&render::detail(country))
    }

    fn countries(&mut self, countries: &[&Country]) -> Result<()> {
        if self.json {
            let selections: Vec<_> = countries.iter().map(|c| project(c, &self.fields)).collect();
            return self.json(&selections);
        }
        if countries.is_empty() {
            return self.text("No countries found.\n");
        }
        self.text(&render::country_table(countries))
    }
}

fn load_atlas(cli: &Cli) -> Result<Option<CountryAtlas>> {
    let Some(path) = &cli.data else {
        return Ok(None);
    };
    let dataset = Dataset::from_path(path)
        .with_context(|| format!("Failed to load dataset from {:?}", path))?;
    Ok(Some(CountryAtlas::new(dataset)))
}

/// ISO2, ISO3 or any indexed name
fn find<'a>(atlas: &'a CountryAtlas, query: &str) -> Result<&'a Country> {
    let country = atlas
        .find(query)
        .map_or_else(|| atlas.require_name(query), Ok)?;
    Ok(country)
}

pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let fields = cli
        .fields
        .as_deref()
        .map(Field::parse_list)
        .unwrap_or_default();
    let mut output = Output {
        out,
        json: cli.json,
        fields,
    };

    match &cli.command {
        Command::Validate => validate(cli, &mut output),
        Command::Query(command) => {
            let loaded = load_atlas(cli)?;
            let atlas = match &loaded {
                Some(atlas) => atlas,
                None => CountryAtlas::global().context("Failed to load embedded dataset")?,
            };
            debug!("Running {:?} against {} countries", command, atlas.len());
            execute(command, atlas, &mut output)
        }
    }
}

fn execute(command: &Query, atlas: &CountryAtlas, output: &mut Output<'_>) -> Result<()> {
    match command {
        Query::Lookup { query } => {
            let country = find(atlas, &query.join(" "))?;
            output.country(country)
        }
        Query::Search { query } => output.countries(&atlas.search(&query.join(" "))),
        Query::Region { continent } => output.countries(&atlas.by_continent(continent)),
        Query::Borders { query } => {
            let country = find(atlas, &query.join(" "))?;
            output.countries(&atlas.border_neighbors(&country.iso.alpha2))
        }
        Query::Currency { code } => output.countries(&atlas.by_currency(code)),
        Query::Language { name } => output.countries(&atlas.by_language(&name.join(" "))),
        Query::CallingCode { code } => calling_code(atlas, code, output),
        Query::Filter {
            continent,
            region,
            currency,
            language,
            landlocked,
            un_member,
            name,
        } => {
            let filter = CountryFilter {
                continent: continent
                    .as_deref()
                    .map(str::parse::<Continent>)
                    .transpose()?,
                region: region.clone(),
                currency: currency.clone(),
                language: language.clone(),
                landlocked: *landlocked,
                un_member: *un_member,
                name: name.clone(),
            };
            output.countries(&atlas.filter(&filter))
        }
        Query::Nearest { query, limit } => {
            let subject = find(atlas, &query.join(" "))?;
            nearest(atlas, subject, *limit, output)
        }
        Query::Distance { from, to } => {
            let a = find(atlas, from)?;
            let b = find(atlas, to)?;
            distance(a, b, output)
        }
        Query::Phone { number, country } => {
            let validation = validate_phone_number(atlas, number, country.as_deref());
            if output.json {
                output.json(&validation)?;
            } else if let (true, Some(c)) = (validation.is_valid, validation.country) {
                output.text(&format!(
                    "{}  {}\nNumber        : {}\nNational      : {}\n",
                    c.flag.emoji,
                    c.name,
                    validation.formatted_number.as_deref().unwrap_or_default(),
                    validation.national_number.as_deref().unwrap_or_default(),
                ))?;
            }
            match validation.error {
                Some(error) => bail!("Invalid phone number {}: {}", number, error),
                None => Ok(()),
            }
        }
        Query::Flag {
            iso2,
            svg,
            width,
            height,
            size,
            data_url,
        } => {
            let country = atlas.require_iso2(iso2)?;
            if !*svg && !*data_url {
                let unicode = emoji_to_unicode(&country.flag.emoji);
                return if output.json {
                    output.json(&json!({
                        "iso2": country.iso.alpha2,
                        "emoji": country.flag.emoji,
                        "unicode": unicode,
                    }))
                } else {
                    output.text(&format!("{}  {} ({})\n", country.flag.emoji, country.name, unicode))
                };
            }

            let mut image = match (size, width, height) {
                (Some(size), _, _) => resize_with_preset(&country.flag.svg, *size),
                (None, Some(w), Some(h)) => resize_svg(&country.flag.svg, *w, *h),
                _ => country.flag.svg.clone(),
            };
            if *data_url {
                image = svg_to_base64_data_url(&image);
            }
            if output.json {
                output.json(&json!({ "iso2": country.iso.alpha2, "svg": image }))
            } else {
                output.text(&format!("{}\n", image))
            }
        }
    }
}

fn calling_code(atlas: &CountryAtlas, code: &str, output: &mut Output<'_>) -> Result<()> {
    atlas.require_calling_code(code)?;
    let matched = atlas.resolve_calling_code(code);

    if let (CallingCodeMatch::Shared(all), Some(first)) = (&matched, matched.first()) {
        if !output.json {
            output.text(&format!(
                "Note: {} is shared by {} countries; single lookups resolve to {}.\n\n",
                code,
                all.len(),
                first.name
            ))?;
        }
    }
    output.countries(&matched.into_vec())
}

fn nearest(
    atlas: &CountryAtlas,
    subject: &Country,
    limit: usize,
    output: &mut Output<'_>,
) -> Result<()> {
    let nearby = nearest_countries(atlas.countries(), subject, limit);

    if output.json {
        let rows: Vec<_> = nearby
            .iter()
            .map(|n| {
                json!({
                    "iso2": n.country.iso.alpha2,
                    "name": n.country.name,
                    "distanceKm": n.distance_km.round(),
                })
            })
            .collect();
        return output.json(&rows);
    }
    if nearby.is_empty() {
        return output.text("No countries found.\n");
    }

    let rows: Vec<Vec<String>> = nearby
        .iter()
        .map(|n| {
            vec![
                n.country.flag.emoji.clone(),
                n.country.name.clone(),
                n.country.iso.alpha2.clone(),
                group_thousands(n.distance_km.round()),
            ]
        })
        .collect();
    output.text(&format!("Nearest to {}:\n\n", subject.name))?;
    output.text(&render::table(&["Flag", "Name", "ISO2", "Distance (km)"], &rows))
}

fn distance(a: &Country, b: &Country, output: &mut Output<'_>) -> Result<()> {
    let km = distance_between(a, b);
    let neighbours = share_border(a, b) || share_border(b, a);

    if output.json {
        return output.json(&json!({
            "from": a.iso.alpha2,
            "to": b.iso.alpha2,
            "distanceKm": km.round(),
            "shareBorder": neighbours,
        }));
    }

    let suffix = if neighbours { " (neighbours)" } else { "" };
    output.text(&format!(
        "{} {} -> {} {}: {} km{}\n",
        a.flag.emoji,
        a.name,
        b.flag.emoji,
        b.name,
        group_thousands(km.round()),
        suffix
    ))
}

fn validate(cli: &Cli, output: &mut Output<'_>) -> Result<()> {
    let loaded = match &cli.data {
        Some(path) => Dataset::from_path(path),
        None => Dataset::embedded(),
    };

    match loaded {
        Ok(dataset) => {
            if output.json {
                output.json(&json!({
                    "valid": true,
                    "countries": dataset.len(),
                    "issues": [],
                }))
            } else {
                output.text(&format!("Dataset OK: {} countries, no issues.\n", dataset.len()))
            }
        }
        Err(AtlasError::InvalidDataset { issues }) => {
            if output.json {
                output.json(&json!({ "valid": false, "issues": issues }))?;
            } else {
                output.text(&format!("Dataset has {} issue(s):\n", issues.len()))?;
                for issue in &issues {
                    output.text(&format!("  - {}\n", issue))?;
                }
            }
            bail!("Dataset validation failed with {} issue(s)", issues.len())
        }
        Err(e) => Err(e).context("Failed to load dataset"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::NamedTempFile;

    fn run_args(args: &[&str]) -> (Result<()>, String) {
        let mut argv = vec!["atlas"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut buffer = Vec::new();
        let result = run(&cli, &mut buffer);
        (result, String::from_utf8(buffer).unwrap())
    }

    fn run_ok(args: &[&str]) -> String {
        let (result, text) = run_args(args);
        result.unwrap();
        text
    }

    fn dataset_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_lookup_detail() {
        let text = run_ok(&["lookup", "india"]);
        assert!(text.contains("🇮🇳  INDIA"));
        assert!(text.contains("Capital       : New Delhi"));
    }

    #[test]
    fn test_lookup_by_iso3_and_multi_word_name() {
        assert!(run_ok(&["lookup", "JPN"]).contains("JAPAN"));
        assert!(run_ok(&["lookup", "united", "kingdom"]).contains("UNITED KINGDOM"));
    }

    #[test]
    fn test_lookup_not_found() {
        let (result, text) = run_args(&["lookup", "atlantis"]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Country not found with name: atlantis");
        assert!(text.is_empty());
    }

    #[test]
    fn test_lookup_fields_projection() {
        let text = run_ok(&["lookup", "IN", "--fields", "name,capital,bogus"]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({ "name": "India", "capital": ["New Delhi"] }));
    }

    #[test]
    fn test_lookup_json_full_record() {
        let text = run_ok(&["--json", "lookup", "jp"]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["iso"]["alpha3"], "JPN");
        assert_eq!(value["callingCode"], "+81");
    }

    #[test]
    fn test_search_table() {
        let text = run_ok(&["search", "korea"]);
        assert!(text.starts_with("Flag | Name"));
        assert!(text.contains("Total: 2 countries found."));
    }

    #[test]
    fn test_search_empty() {
        assert_eq!(run_ok(&["search", "qqqq"]), "No countries found.\n");
        assert_eq!(run_ok(&["--json", "search", "qqqq"]).trim(), "[]");
    }

    #[test]
    fn test_borders_json() {
        let text = run_ok(&["--json", "--fields", "iso", "borders", "India"]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let mut codes: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["iso"]["alpha2"].as_str().unwrap())
            .collect();
        codes.sort();
        assert_eq!(codes, vec!["BD", "BT", "CN", "MM", "NP", "PK"]);
    }

    #[test]
    fn test_region_and_currency() {
        assert!(run_ok(&["region", "oceania"]).contains("Australia"));
        let text = run_ok(&["currency", "eur"]);
        assert!(text.contains("France"));
        assert!(text.contains("Germany"));
    }

    #[test]
    fn test_calling_code_shared_note() {
        let text = run_ok(&["calling-code", "+1"]);
        assert!(text.starts_with("Note: +1 is shared by 2 countries"));
        assert!(text.contains("United States"));
        assert!(text.contains("Canada"));

        let single = run_ok(&["calling-code", "81"]);
        assert!(!single.contains("Note:"));
        assert!(single.contains("Japan"));
    }

    #[test]
    fn test_calling_code_unknown() {
        let (result, _) = run_args(&["calling-code", "+999"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Country not found with callingCode: +999"
        );

        let (result, text) = run_args(&["calling-code", "tel:91"]);
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("Invalid calling code 'tel:91'"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_lookup_locale_fields() {
        let text = run_ok(&["lookup", "IN", "--fields", "timezones,domains,formats"]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["timezones"][0]["utcOffset"], "+05:30");
        assert_eq!(value["timezones"][0]["utcOffsetMin"], 330);
        assert_eq!(value["domains"]["topLevelDomain"], ".in");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_filter() {
        let text = run_ok(&[
            "--json",
            "--fields",
            "name",
            "filter",
            "--continent",
            "europe",
            "--landlocked",
            "true",
            "--currency",
            "EUR",
        ]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Austria"));
        assert!(!names.contains(&"France"));
    }

    #[test]
    fn test_filter_bad_continent() {
        let (result, _) = run_args(&["filter", "--continent", "atlantis"]);
        assert!(result.unwrap_err().to_string().starts_with("Invalid continent"));
    }

    #[test]
    fn test_nearest() {
        let text = run_ok(&["nearest", "france", "--limit", "3"]);
        assert!(text.starts_with("Nearest to France:"));
        assert!(text.contains("Distance (km)"));
        assert!(!text.contains("| FR |"));
    }

    #[test]
    fn test_distance() {
        let text = run_ok(&["distance", "IN", "PK"]);
        assert!(text.contains("India -> "));
        assert!(text.ends_with("km (neighbours)\n"));

        let value: serde_json::Value =
            serde_json::from_str(&run_ok(&["--json", "distance", "IN", "JP"])).unwrap();
        assert_eq!(value["shareBorder"], false);
        assert!(value["distanceKm"].as_f64().unwrap() > 5000.0);
    }

    #[test]
    fn test_phone() {
        let text = run_ok(&["phone", "+91 98765 43210"]);
        assert!(text.contains("India"));
        assert!(text.contains("Number        : +91 9876543210"));

        let (result, _) = run_args(&["phone", "123", "--country", "IN"]);
        assert!(result.unwrap_err().to_string().ends_with("Phone number too short"));
    }

    #[test]
    fn test_phone_json_reports_invalid() {
        let (result, text) = run_args(&["--json", "phone", "12345"]);
        assert!(result.is_err());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["isValid"], false);
    }

    #[test]
    fn test_flag() {
        assert_eq!(run_ok(&["flag", "in"]), "🇮🇳  India (1F1EE-1F1F3)\n");

        let svg = run_ok(&["flag", "in", "--svg", "--width", "32", "--height", "24"]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="32""#));

        let url = run_ok(&["flag", "in", "--data-url", "--size", "tiny"]);
        assert!(url.starts_with("data:image/svg+xml;base64,"));

        let (result, _) = run_args(&["flag", "zz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_embedded() {
        let text = run_ok(&["validate"]);
        assert!(text.starts_with("Dataset OK: "));
    }

    #[test]
    fn test_validate_external_with_issues() {
        let file = dataset_file(
            r#"[
                {"name": "Alpha", "officialName": "Republic of Alpha",
                 "iso": {"alpha2": "AA", "alpha3": "AAA"},
                 "geo": {"latitude": 0, "longitude": 0, "region": "", "continent": "Asia"},
                 "flag": {"emoji": "", "svg": ""}},
                {"name": "Beta", "officialName": "Republic of Beta",
                 "iso": {"alpha2": "AA", "alpha3": "BBB"},
                 "geo": {"latitude": 0, "longitude": 0, "region": "", "continent": "Asia"},
                 "flag": {"emoji": "", "svg": ""}}
            ]"#,
        );
        let path = file.path().to_str().unwrap();
        let (result, text) = run_args(&["--data", path, "validate"]);
        assert!(result.is_err());
        assert!(text.starts_with("Dataset has 1 issue(s):"));

        let (result, _) = run_args(&["--data", path, "lookup", "alpha"]);
        assert!(format!("{:#}", result.unwrap_err()).starts_with("Failed to load dataset"));
    }

    #[test]
    fn test_external_dataset_lookup() {
        let file = dataset_file(
            r#"[{"name": "Alpha", "officialName": "Republic of Alpha",
                 "iso": {"alpha2": "AA", "alpha3": "AAA"},
                 "geo": {"latitude": 1, "longitude": 2, "region": "Nowhere", "continent": "Asia"},
                 "flag": {"emoji": "", "svg": ""}}]"#,
        );
        let path = file.path().to_str().unwrap();
        let text = run_ok(&["--data", path, "lookup", "aaa"]);
        assert!(text.contains("ALPHA"));
        assert!(text.contains("Region        : Nowhere (Asia)"));
    }
}
