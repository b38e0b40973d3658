use geo_types::Point;
use serde::Serialize;

use crate::location::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;

// Conversion constants behind the stat cards.
const WALK_SPEED_KMH: f64 = 5.0;
const BIKE_SPEED_KMH: f64 = 15.0;
const FLIGHT_SPEED_KMH: f64 = 900.0;
const CAR_SPEED_KMH: f64 = 80.0;
const BIKE_MINUTES_PER_KM: f64 = 12.0;
const STEPS_PER_KM: f64 = 1312.0;
const MARATHON_KM: f64 = 42.195;
const EIFFEL_TOWER_M: f64 = 330.0;
const LOVE_LETTER_M: f64 = 21.5;
const TINY_STEP_M: f64 = 0.5;

/// Great-circle distance in kilometers between two lat/lng pairs.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Same distance for `geo_types` points, which carry (lng, lat) as (x, y).
pub fn haversine_points(p1: Point, p2: Point) -> f64 {
    haversine(p1.y(), p1.x(), p2.y(), p2.x())
}

/// One fixed message per distance tier. Boundaries are strict-less-than, so
/// exactly 10 km falls in the road-trip tier.
pub fn classify(km: f64) -> String {
    if km < 1.0 {
        "That's basically the same room — get off your phone and hug! 🤗".to_string()
    } else if km < 10.0 {
        format!(
            "So close! That's about a {} minute bike ride apart 🚲",
            (km * BIKE_MINUTES_PER_KM).round() as i64
        )
    } else if km < 100.0 {
        format!(
            "Just a short road trip away — about {} minutes by car 🚗",
            (km / CAR_SPEED_KMH * 60.0).round() as i64
        )
    } else if km < 1000.0 {
        "A few hours of missing each other — but so worth the wait 💕".to_string()
    } else {
        "Across the world, but never out of each other's hearts 🌍".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub emoji: String,
    pub number: String,
    pub label: String,
}

impl StatCard {
    fn new(emoji: &str, number: impl Into<String>, label: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
            number: number.into(),
            label: label.to_string(),
        }
    }
}

/// The ordered stat-card set for a distance. Three tiers: same-room, day-trip
/// range, and far apart.
pub fn stat_cards(km: f64) -> Vec<StatCard> {
    let metres = km * 1000.0;
    let walk_hours = km / WALK_SPEED_KMH;
    let steps = (km * STEPS_PER_KM).round() as i64;
    let marathons = format!("{:.1}", km / MARATHON_KM);
    let eiffel_towers = (metres / EIFFEL_TOWER_M).round() as i64;
    let love_letters = (metres / LOVE_LETTER_M).round() as i64;

    if km < 1.0 {
        let whole_metres = metres.round() as i64;
        let tiny_steps = (whole_metres as f64 / TINY_STEP_M).ceil() as i64;
        vec![
            StatCard::new("👣", whole_metres.to_string(), "metres between us"),
            StatCard::new("🤗", tiny_steps.to_string(), "tiny steps to reach you"),
            StatCard::new("💋", "∞", "kisses — you're RIGHT HERE"),
        ]
    } else if km < 50.0 {
        let bike_mins = (km / BIKE_SPEED_KMH * 60.0).round() as i64;
        vec![
            StatCard::new("🚶‍♂️", format_duration(walk_hours), "walking to you non-stop"),
            StatCard::new("👣", group_thousands(steps), "steps hand-in-hand to meet"),
            StatCard::new("🚲", format!("{bike_mins} min"), "by bike to your arms"),
            StatCard::new("🏃", marathons, "marathons of missing you"),
            StatCard::new("🗼", group_thousands(eiffel_towers), "Eiffel Towers stacked between us"),
            StatCard::new("💌", love_letters.to_string(), "love letters laid end to end"),
        ]
    } else {
        let flight_mins = (km / FLIGHT_SPEED_KMH * 60.0).round() as i64;
        vec![
            StatCard::new("✈️", format!("{flight_mins} min"), "by plane to be together"),
            StatCard::new("🚶‍♂️", format_duration(walk_hours), "walking to you non-stop"),
            StatCard::new("👣", group_thousands(steps), "steps hand-in-hand to meet"),
            StatCard::new("🏃", marathons, "marathons of missing you"),
            StatCard::new("🗼", group_thousands(eiffel_towers), "Eiffel Towers stacked between us"),
            StatCard::new("💌", group_thousands(love_letters), "love letters laid end to end"),
        ]
    }
}

/// Minutes below one hour, otherwise days and hours with the day part dropped
/// when zero.
pub fn format_duration(hours: f64) -> String {
    if hours < 1.0 {
        return format!("{} min", (hours * 60.0).round() as i64);
    }
    let days = (hours / 24.0).floor() as i64;
    let rem_hours = (hours % 24.0).round() as i64;
    if days > 0 {
        format!("{days}d {rem_hours}h")
    } else {
        format!("{rem_hours}h")
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The distance banner payload: headline value, narrative message and the
/// stat cards, all derived from the single km figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub km: f64,
    pub display: String,
    pub message: String,
    pub stats: Vec<StatCard>,
}

impl DistanceReport {
    pub fn new(km: f64) -> Self {
        Self {
            display: format!("{} km", group_thousands(km.round() as i64)),
            message: classify(km),
            stats: stat_cards(km),
            km,
        }
    }

    pub fn between(a: &Location, b: &Location) -> Self {
        Self::new(haversine_points(a.position(), b.position()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(haversine(55.6761, 12.5683, 55.6761, 12.5683), 0.0);
    }

    #[test]
    fn haversine_london_paris() {
        let km = haversine(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((343.0..344.0).contains(&km), "got {km}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let ab = haversine(51.5074, -0.1278, 48.8566, 2.3522);
        let ba = haversine(48.8566, 2.3522, 51.5074, -0.1278);
        assert_eq!(ab, ba);
    }

    #[test]
    fn haversine_points_matches_lat_lng_form() {
        let p1 = Point::new(-0.1278, 51.5074);
        let p2 = Point::new(2.3522, 48.8566);
        assert_eq!(haversine_points(p1, p2), haversine(51.5074, -0.1278, 48.8566, 2.3522));
    }

    #[test]
    fn classify_boundaries_are_strict() {
        assert!(classify(0.999).contains("same room"));
        assert!(classify(1.0).contains("bike ride"));
        // Exactly 10 km belongs to the road-trip tier, not the bike tier.
        assert!(classify(10.0).contains("by car"));
        assert!(classify(100.0).contains("worth the wait"));
        assert!(classify(1000.0).contains("Across the world"));
    }

    #[test]
    fn classify_interpolates_minutes() {
        assert_eq!(
            classify(5.0),
            "So close! That's about a 60 minute bike ride apart 🚲"
        );
        assert_eq!(
            classify(40.0),
            "Just a short road trip away — about 30 minutes by car 🚗"
        );
    }

    #[test]
    fn stat_cards_same_room_tier() {
        let cards = stat_cards(0.25);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].number, "250");
        assert_eq!(cards[0].label, "metres between us");
        assert_eq!(cards[1].number, "500");
        assert_eq!(cards[2].number, "∞");
    }

    #[test]
    fn stat_cards_day_trip_tier() {
        let cards = stat_cards(14.9);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].emoji, "🚶‍♂️");
        // 14.9 km at 5 km/h is just under 3 hours.
        assert_eq!(cards[0].number, "3h");
        assert_eq!(cards[1].number, "19,549");
        assert_eq!(cards[2].number, "60 min");
        assert_eq!(cards[3].number, "0.4");
    }

    #[test]
    fn stat_cards_far_tier_leads_with_flight() {
        let cards = stat_cards(343.5);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].emoji, "✈️");
        assert_eq!(cards[0].number, "23 min");
        assert_eq!(cards[1].number, format_duration(343.5 / 5.0));
    }

    #[test]
    fn stat_tier_boundary_at_fifty() {
        assert_eq!(stat_cards(49.999)[0].emoji, "🚶‍♂️");
        assert_eq!(stat_cards(50.0)[0].emoji, "✈️");
    }

    #[test]
    fn format_duration_boundaries() {
        assert_eq!(format_duration(0.5), "30 min");
        assert_eq!(format_duration(0.99), "59 min");
        assert_eq!(format_duration(2.0), "2h");
        assert_eq!(format_duration(23.4), "23h");
        assert_eq!(format_duration(30.0), "1d 6h");
        assert_eq!(format_duration(48.0), "2d 0h");
    }

    #[test]
    fn group_thousands_formats() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn report_bundles_all_parts() {
        let flo = Location::new(10.0, 20.0, Utc::now());
        let maria = Location::new(10.1, 20.1, Utc::now());
        let report = DistanceReport::between(&flo, &maria);
        assert!((15.0..16.0).contains(&report.km), "got {}", report.km);
        assert_eq!(report.display, "16 km");
        // ~15.6 km sits in the day-trip stat tier.
        assert_eq!(report.stats.len(), 6);
        assert_eq!(report.stats[0].emoji, "🚶‍♂️");
    }
}
