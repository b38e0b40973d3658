use const_format::concatcp;

pub mod geocoding;
pub mod location_store;
pub mod pin_store;
mod data_manager;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const USER_PINS_PATH: &str = concatcp!(DATA_DIR, "user_pins.json");
pub const LOCATIONS_PATH: &str = concatcp!(DATA_DIR, "locations.json");

pub const STATIC_DIR: &str = "static/";
pub const BASE_PINS_PATH: &str = concatcp!(STATIC_DIR, "pins.json");

#[derive(Debug)]
pub enum DataManagerError {
    Storage(String),
    Validation(String),
    Geocoding(String),
}
