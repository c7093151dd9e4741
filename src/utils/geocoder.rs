//! Address and zipcode geocoding.
//!
//! Production uses a MapQuest-compatible HTTP endpoint. [`StaticGeocoder`]
//! answers from a built-in table and is used offline and in tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use devcamper_config::{GeocoderConfig, GeocoderProvider};
use devcamper_core::AppError;
use devcamper_models::Location;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl From<GeocodedLocation> for Location {
    fn from(geo: GeocodedLocation) -> Self {
        Location {
            latitude: geo.latitude,
            longitude: geo.longitude,
            formatted_address: geo.formatted_address,
            street: geo.street,
            city: geo.city,
            state: geo.state,
            zipcode: geo.zipcode,
            country: geo.country,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Could not find a location for `{0}`")]
    NotFound(String),

    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding provider rejected the request: {0}")]
    Provider(String),
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(_) => AppError::bad_request(err.to_string()),
            other => AppError::unexpected(other),
        }
    }
}

pub type GeocodeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GeocodedLocation, GeocodeError>> + Send + 'a>>;

pub trait Geocoder: Send + Sync {
    /// Resolves a free-form address or a bare zipcode to a point.
    fn geocode<'a>(&'a self, address: &'a str) -> GeocodeFuture<'a>;
}

/// Builds the geocoder selected by `GEOCODER_PROVIDER`.
pub fn geocoder_from_config(config: &GeocoderConfig) -> Arc<dyn Geocoder> {
    match config.provider {
        GeocoderProvider::Mapquest => Arc::new(MapQuestGeocoder::new(
            config.base_url.clone(),
            config.api_key.clone(),
        )),
        GeocoderProvider::Static => Arc::new(StaticGeocoder::with_defaults()),
    }
}

pub struct MapQuestGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MapQuestGeocoder {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MapQuestResponse {
    info: MapQuestInfo,
    #[serde(default)]
    results: Vec<MapQuestResult>,
}

#[derive(Debug, Deserialize)]
struct MapQuestInfo {
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MapQuestResult {
    #[serde(default)]
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapQuestLocation {
    lat_lng: MapQuestLatLng,
    #[serde(default)]
    street: String,
    /// City
    #[serde(default)]
    admin_area5: String,
    /// State
    #[serde(default)]
    admin_area3: String,
    /// Country
    #[serde(default)]
    admin_area1: String,
    #[serde(default)]
    postal_code: String,
}

#[derive(Debug, Deserialize)]
struct MapQuestLatLng {
    lat: f64,
    lng: f64,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<MapQuestLocation> for GeocodedLocation {
    fn from(loc: MapQuestLocation) -> Self {
        let state_zip = [loc.admin_area3.trim(), loc.postal_code.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let formatted = [
            loc.street.trim(),
            loc.admin_area5.trim(),
            state_zip.as_str(),
            loc.admin_area1.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        GeocodedLocation {
            latitude: loc.lat_lng.lat,
            longitude: loc.lat_lng.lng,
            formatted_address: non_empty(formatted),
            street: non_empty(loc.street),
            city: non_empty(loc.admin_area5),
            state: non_empty(loc.admin_area3),
            zipcode: non_empty(loc.postal_code),
            country: non_empty(loc.admin_area1),
        }
    }
}

impl Geocoder for MapQuestGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> GeocodeFuture<'a> {
        Box::pin(async move {
            let url = format!(
                "{}/geocoding/v1/address",
                self.base_url.trim_end_matches('/')
            );

            let response: MapQuestResponse = self
                .client
                .get(url)
                .query(&[("key", self.api_key.as_str()), ("location", address)])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if response.info.statuscode != 0 {
                return Err(GeocodeError::Provider(response.info.messages.join("; ")));
            }

            response
                .results
                .into_iter()
                .flat_map(|result| result.locations)
                .next()
                .map(GeocodedLocation::from)
                .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
        })
    }
}

/// Answers from a fixed table keyed by zipcode.
///
/// A full address resolves when it contains a known five-digit zipcode.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    by_zipcode: HashMap<String, GeocodedLocation>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Greater Boston zipcodes used by the demo data.
    pub fn with_defaults() -> Self {
        let entries = [
            ("02118", 42.3362, -71.0709, "Boston", "233 Bay State Rd"),
            ("02215", 42.3505, -71.1054, "Boston", "Bay State Rd"),
            ("02120", 42.3320, -71.0972, "Boston", "Tremont St"),
            ("01701", 42.3011, -71.4350, "Framingham", "45 Upper College Rd"),
            ("01803", 42.5035, -71.2017, "Burlington", "220 Pawtucket St"),
            ("02453", 42.3665, -71.2551, "Waltham", "Main St"),
            ("02139", 42.3647, -71.1042, "Cambridge", "Massachusetts Ave"),
        ];

        entries
            .into_iter()
            .fold(Self::new(), |geocoder, (zip, lat, lng, city, street)| {
                geocoder.with_entry(
                    zip,
                    GeocodedLocation {
                        latitude: lat,
                        longitude: lng,
                        formatted_address: Some(format!("{}, {}, MA {}, US", street, city, zip)),
                        street: Some(street.to_string()),
                        city: Some(city.to_string()),
                        state: Some("MA".to_string()),
                        zipcode: Some(zip.to_string()),
                        country: Some("US".to_string()),
                    },
                )
            })
    }

    pub fn with_entry(mut self, zipcode: &str, location: GeocodedLocation) -> Self {
        self.by_zipcode.insert(zipcode.to_string(), location);
        self
    }

    fn lookup(&self, address: &str) -> Option<GeocodedLocation> {
        let address = address.trim();
        if let Some(hit) = self.by_zipcode.get(address) {
            return Some(hit.clone());
        }

        address
            .split(|c: char| !c.is_ascii_digit())
            .filter(|token| token.len() == 5)
            .find_map(|zip| self.by_zipcode.get(zip).cloned())
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> GeocodeFuture<'a> {
        Box::pin(async move {
            self.lookup(address)
                .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_geocoder_resolves_zip_and_address() {
        let geocoder = StaticGeocoder::with_defaults();

        let by_zip = geocoder.geocode("02118").await.unwrap();
        assert_eq!(by_zip.city.as_deref(), Some("Boston"));

        let by_address = geocoder
            .geocode("45 Upper College Rd Kingston RI 01701")
            .await
            .unwrap();
        assert_eq!(by_address.zipcode.as_deref(), Some("01701"));
    }

    #[tokio::test]
    async fn test_static_geocoder_unknown_is_not_found() {
        let err = StaticGeocoder::with_defaults()
            .geocode("99999")
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(_)));

        let app_err: AppError = err.into();
        assert_eq!(app_err.status.as_u16(), 400);
    }

    #[test]
    fn test_mapquest_payload_parsing() {
        let payload = serde_json::json!({
            "info": { "statuscode": 0, "messages": [] },
            "results": [{
                "locations": [{
                    "latLng": { "lat": 42.350_5, "lng": -71.105_4 },
                    "street": "233 Bay State Rd",
                    "adminArea5": "Boston",
                    "adminArea3": "MA",
                    "adminArea1": "US",
                    "postalCode": "02215"
                }]
            }]
        });
        let response: MapQuestResponse = serde_json::from_value(payload).unwrap();
        let location: GeocodedLocation = response
            .results
            .into_iter()
            .flat_map(|r| r.locations)
            .next()
            .unwrap()
            .into();

        assert_eq!(
            location.formatted_address.as_deref(),
            Some("233 Bay State Rd, Boston, MA 02215, US")
        );
        assert_eq!(location.country.as_deref(), Some("US"));
    }
}
