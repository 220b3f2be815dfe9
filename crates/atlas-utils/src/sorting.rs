//! Non-mutating sorts and groupings

use country_atlas::Country;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

pub fn sort_by_name<'a>(countries: &[&'a Country], order: SortOrder) -> Vec<&'a Country> {
    let mut sorted = countries.to_vec();
    sorted.sort_by(|a, b| {
        order.apply(
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        )
    });
    sorted
}

pub fn sort_by_area<'a>(countries: &[&'a Country], order: SortOrder) -> Vec<&'a Country> {
    let mut sorted = countries.to_vec();
    sorted.sort_by(|a, b| {
        order.apply(
            a.geo
                .area_km2
                .partial_cmp(&b.geo.area_km2)
                .unwrap_or(Ordering::Equal),
        )
    });
    sorted
}

fn group_by<'a>(
    countries: &[&'a Country],
    key: impl Fn(&Country) -> String,
) -> BTreeMap<String, Vec<&'a Country>> {
    let mut groups: BTreeMap<String, Vec<&'a Country>> = BTreeMap::new();
    for &country in countries {
        groups.entry(key(country)).or_default().push(country);
    }
    groups
}

pub fn group_by_continent<'a>(countries: &[&'a Country]) -> BTreeMap<String, Vec<&'a Country>> {
    group_by(countries, |c| c.geo.continent.to_string())
}

/// Countries without a region land under `"Unknown"`
pub fn group_by_region<'a>(countries: &[&'a Country]) -> BTreeMap<String, Vec<&'a Country>> {
    group_by(countries, |c| {
        if c.geo.region.trim().is_empty() {
            "Unknown".to_string()
        } else {
            c.geo.region.clone()
        }
    })
}

/// Countries without a currency land under `"No Currency"`
pub fn group_by_currency<'a>(countries: &[&'a Country]) -> BTreeMap<String, Vec<&'a Country>> {
    group_by(countries, |c| {
        c.currency
            .as_ref()
            .map(|cur| cur.code.clone())
            .unwrap_or_else(|| "No Currency".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use country_atlas::CountryAtlas;

    fn sample() -> Vec<&'static Country> {
        let atlas = CountryAtlas::global().unwrap();
        ["IN", "JP", "AQ", "FR", "VA"]
            .iter()
            .filter_map(|code| atlas.by_iso2(code))
            .collect()
    }

    fn names(countries: &[&Country]) -> Vec<String> {
        countries.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_sort_by_name() {
        let input = sample();
        let asc = sort_by_name(&input, SortOrder::Asc);
        assert_eq!(
            names(&asc),
            vec!["Antarctica", "France", "India", "Japan", "Vatican City"]
        );
        let desc = sort_by_name(&input, SortOrder::Desc);
        assert_eq!(names(&desc)[0], "Vatican City");
        // input untouched
        assert_eq!(input[0].name, "India");
    }

    #[test]
    fn test_sort_by_area() {
        let input = sample();
        let desc = sort_by_area(&input, SortOrder::Desc);
        assert_eq!(desc[0].iso.alpha2, "AQ");
        assert_eq!(desc.last().unwrap().iso.alpha2, "VA");
        let asc = sort_by_area(&input, SortOrder::Asc);
        assert_eq!(asc[0].iso.alpha2, "VA");
    }

    #[test]
    fn test_group_by_continent() {
        let groups = group_by_continent(&sample());
        assert_eq!(groups["Asia"].len(), 2);
        assert_eq!(groups["Europe"].len(), 2);
        assert_eq!(groups["Antarctic"].len(), 1);
    }

    #[test]
    fn test_group_by_currency() {
        let groups = group_by_currency(&sample());
        assert_eq!(groups["EUR"].len(), 2);
        assert_eq!(groups["No Currency"][0].iso.alpha2, "AQ");
    }

    #[test]
    fn test_group_by_region_unknown() {
        let atlas = CountryAtlas::global().unwrap();
        let mut blank = atlas.by_iso2("JP").unwrap().clone();
        blank.geo.region = String::new();
        let groups = group_by_region(&[&blank, atlas.by_iso2("IN").unwrap()]);
        assert_eq!(groups["Unknown"].len(), 1);
        assert_eq!(groups["Southern Asia"].len(), 1);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }
}
