//! Presentation helpers for the country atlas
//!
//! Everything here resolves records through a [`country_atlas::CountryAtlas`]
//! passed in by the caller; no module keeps its own copy of the data.
//!
//! | Module | Role |
//! |--------|------|
//! | [`phone`] | Phone number validation and international formatting |
//! | [`flag`] | Flag emoji and SVG resizing, filters, shapes, data URLs |
//! | [`geo`] | Haversine distance, nearest countries, shared borders |
//! | [`format`] | Display strings for flags, phone numbers, currency |
//! | [`sorting`] | Non-mutating sorts and groupings |

pub mod flag;
pub mod format;
pub mod geo;
pub mod phone;
pub mod sorting;

pub use flag::{FlagFilter, FlagShape, FlagSize, ImgTagOptions};
pub use format::FlagFormat;
pub use geo::{haversine_km, NearbyCountry};
pub use phone::{ParsedPhone, PhoneError, PhoneValidation};
pub use sorting::SortOrder;
