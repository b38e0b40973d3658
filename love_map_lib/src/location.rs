use std::str::FromStr;

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One of the two people sharing their location. The set is closed: the map
/// belongs to exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Flo,
    Maria,
}

impl Participant {
    pub const ALL: [Participant; 2] = [Participant::Flo, Participant::Maria];

    pub fn as_str(self) -> &'static str {
        match self {
            Participant::Flo => "flo",
            Participant::Maria => "maria",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Participant::Flo => "Flo",
            Participant::Maria => "Maria",
        }
    }

    pub fn other(self) -> Participant {
        match self {
            Participant::Flo => Participant::Maria,
            Participant::Maria => Participant::Flo,
        }
    }
}

impl FromStr for Participant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flo" => Ok(Participant::Flo),
            "maria" => Ok(Participant::Maria),
            _ => Err("unknown participant"),
        }
    }
}

/// A participant's last shared position. Overwritten on every share, never
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    pub fn new(lat: f64, lng: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lng,
            timestamp,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_parse_round_trip() {
        for who in Participant::ALL {
            assert_eq!(who.as_str().parse::<Participant>().unwrap(), who);
        }
        assert!("bob".parse::<Participant>().is_err());
        assert!("Flo".parse::<Participant>().is_err());
    }

    #[test]
    fn participant_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Participant::Flo).unwrap(), "\"flo\"");
        assert_eq!(
            serde_json::from_str::<Participant>("\"maria\"").unwrap(),
            Participant::Maria
        );
    }

    #[test]
    fn other_is_symmetric() {
        assert_eq!(Participant::Flo.other(), Participant::Maria);
        assert_eq!(Participant::Maria.other().other(), Participant::Maria);
    }
}
