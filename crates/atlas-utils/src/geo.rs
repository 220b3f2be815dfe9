//! Great-circle distances between country centroids

use country_atlas::Country;
use serde::Serialize;
use std::f64::consts::PI;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in km
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let dlat = (lat2 - lat1) * PI / 180.0;
    let dlon = (lon2 - lon1) * PI / 180.0;

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_between(a: &Country, b: &Country) -> f64 {
    haversine_km(a.geo.latitude, a.geo.longitude, b.geo.latitude, b.geo.longitude)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyCountry<'a> {
    pub country: &'a Country,
    pub distance_km: f64,
}

/// The `limit` countries closest to `subject`, nearest first. The subject
/// itself is excluded.
pub fn nearest_countries<'a>(
    countries: impl IntoIterator<Item = &'a Country>,
    subject: &Country,
    limit: usize,
) -> Vec<NearbyCountry<'a>> {
    let mut nearby: Vec<NearbyCountry<'a>> = countries
        .into_iter()
        .filter(|c| c.iso.alpha2 != subject.iso.alpha2)
        .map(|c| NearbyCountry {
            country: c,
            distance_km: distance_between(subject, c),
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    nearby.truncate(limit);
    nearby
}

/// Whether `b` appears in `a`'s border list, by alpha-2 or alpha-3
pub fn share_border(a: &Country, b: &Country) -> bool {
    a.geo
        .borders
        .iter()
        .any(|code| code == &b.iso.alpha2 || code == &b.iso.alpha3)
}
