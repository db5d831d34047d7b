//! European capitals shown on the collection map.
//!
//! Fixed reference data. Selecting a capital (or standing near one) runs a
//! geo search for its country.

use serde::Serialize;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A capital city marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCapital {
    /// Country name as the API's `geoLocation` filter expects it.
    pub country: &'static str,
    pub capital: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: &'static str,
}

const fn capital(
    country: &'static str,
    capital: &'static str,
    latitude: f64,
    longitude: f64,
    country_code: &'static str,
) -> GeoCapital {
    GeoCapital { country, capital, latitude, longitude, country_code }
}

/// All map markers.
pub const EUROPEAN_CAPITALS: [GeoCapital; 9] = [
    capital("Germany", "Berlin", 52.5200, 13.4050, "DE"),
    capital("Spain", "Madrid", 40.4168, -3.7038, "ES"),
    capital("France", "Paris", 48.8566, 2.3522, "FR"),
    capital("Italy", "Rome", 41.9028, 12.4964, "IT"),
    capital("Netherlands", "Amsterdam", 52.3676, 4.9041, "NL"),
    capital("Belgium", "Brussels", 50.8503, 4.3517, "BE"),
    capital("Austria", "Vienna", 48.2082, 16.3738, "AT"),
    capital("Switzerland", "Bern", 46.9481, 7.4474, "CH"),
    capital("Sweden", "Stockholm", 59.3293, 18.0686, "SE"),
];

impl GeoCapital {
    /// Find a capital by country, capital name or country code (case-insensitive).
    pub fn find(name: &str) -> Option<&'static GeoCapital> {
        let name = name.trim();
        EUROPEAN_CAPITALS.iter().find(|c| {
            c.country.eq_ignore_ascii_case(name)
                || c.capital.eq_ignore_ascii_case(name)
                || c.country_code.eq_ignore_ascii_case(name)
        })
    }

    /// The capital closest to a coordinate.
    pub fn nearest(latitude: f64, longitude: f64) -> &'static GeoCapital {
        EUROPEAN_CAPITALS
            .iter()
            .min_by(|a, b| {
                a.distance_km(latitude, longitude)
                    .total_cmp(&b.distance_km(latitude, longitude))
            })
            .unwrap_or(&EUROPEAN_CAPITALS[0])
    }

    /// Great-circle distance from this capital to a coordinate.
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}
