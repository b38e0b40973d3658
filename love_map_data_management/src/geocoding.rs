use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DataManagerError;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const RESULT_LIMIT: &str = "6";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of the Nominatim response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimEntry {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub display_name_short: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResult {
    fn from_entry(entry: NominatimEntry) -> Option<Self> {
        let lat = entry.lat.parse().ok()?;
        let lng = entry.lon.parse().ok()?;
        Some(Self {
            display_name_short: short_label(&entry.display_name),
            display_name: entry.display_name,
            lat,
            lng,
        })
    }
}

#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
}

impl GeocodingClient {
    pub fn new() -> Result<Self, DataManagerError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("love_map")
            .build()
            .map_err(|err| {
                DataManagerError::Geocoding(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client })
    }

    /// Free-text search against the public Nominatim endpoint. An empty
    /// result list is a valid answer; a failed request or malformed response
    /// is not. Entries with unparseable coordinates are dropped.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, DataManagerError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("format", "json"), ("limit", RESULT_LIMIT), ("q", query)])
            .header("Accept-Language", "en")
            .send()
            .await
            .map_err(|err| DataManagerError::Geocoding(format!("Search request failed: {err}")))?;

        let entries: Vec<NominatimEntry> = response.json().await.map_err(|err| {
            DataManagerError::Geocoding(format!("Malformed search response: {err}"))
        })?;

        Ok(entries
            .into_iter()
            .filter_map(GeocodeResult::from_entry)
            .collect())
    }
}

/// The part of a display name before the first comma, used as a pin's short
/// location label.
pub fn short_label(display_name: &str) -> String {
    display_name.split(',').next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_takes_first_segment() {
        assert_eq!(
            short_label("Paris, Ile-de-France, Metropolitan France, France"),
            "Paris"
        );
        assert_eq!(short_label("Reykjavík"), "Reykjavík");
        assert_eq!(short_label(""), "");
    }

    #[test]
    fn response_entries_map_to_results() {
        let body = r#"[
            {"display_name": "Paris, Ile-de-France, France", "lat": "48.8589", "lon": "2.3200"},
            {"display_name": "Paris, Texas, United States", "lat": "oops", "lon": "-95.5555"}
        ]"#;
        let entries: Vec<NominatimEntry> = serde_json::from_str(body).unwrap();
        let results: Vec<GeocodeResult> = entries
            .into_iter()
            .filter_map(GeocodeResult::from_entry)
            .collect();

        // The unparseable second entry is dropped, not an error.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name_short, "Paris");
        assert_eq!(results[0].lat, 48.8589);
        assert_eq!(results[0].lng, 2.32);
    }
}
