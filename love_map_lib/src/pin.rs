use geo_types::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Memory,
    Dream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

/// A single media attachment. The url is either a remote path or an embedded
/// data url; no format validation happens beyond the type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
}

/// A memory or dream anchored to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: i64,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub location_full: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default, rename = "userAdded")]
    pub user_added: bool,
}

impl Pin {
    pub fn position(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

/// The add-form payload. Coordinates stay unset until the user picks a
/// geocoding result, so the store validates them before minting a Pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDraft {
    #[serde(rename = "type")]
    pub pin_type: PinType,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_full: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_wire_format_round_trip() {
        let json = r#"{
            "id": 3,
            "type": "memory",
            "title": "First trip",
            "location": "Copenhagen",
            "location_full": "Copenhagen, Denmark",
            "description": "The harbour walk",
            "date": "June 2023",
            "lat": 55.6761,
            "lng": 12.5683,
            "media": [{"type": "image", "url": "photos/harbour.jpg"}],
            "userAdded": true
        }"#;

        let pin: Pin = serde_json::from_str(json).unwrap();
        assert_eq!(pin.pin_type, PinType::Memory);
        assert_eq!(pin.media[0].media_type, MediaType::Image);
        assert!(pin.user_added);

        let back: Pin = serde_json::from_str(&serde_json::to_string(&pin).unwrap()).unwrap();
        assert_eq!(back, pin);
    }

    #[test]
    fn base_pin_defaults() {
        // Base pins.json records may omit media, date and the userAdded flag.
        let json = r#"{
            "id": 1,
            "type": "dream",
            "title": "Northern lights",
            "location": "Tromsø",
            "lat": 69.6492,
            "lng": 18.9553
        }"#;

        let pin: Pin = serde_json::from_str(json).unwrap();
        assert!(pin.media.is_empty());
        assert!(!pin.user_added);
        assert!(pin.date.is_empty());
    }

    #[test]
    fn position_is_lng_lat() {
        let pin: Pin = serde_json::from_str(
            r#"{"id": 1, "type": "memory", "title": "t", "location": "l", "lat": 55.0, "lng": 12.0}"#,
        )
        .unwrap();
        assert_eq!(pin.position().x(), 12.0);
        assert_eq!(pin.position().y(), 55.0);
    }
}
