use std::path::PathBuf;

use love_map_lib::{
    distance::DistanceReport,
    location::{Location, Participant},
    pin::{Pin, PinDraft},
};

use crate::{
    BASE_PINS_PATH, DATA_DIR, DataManagerError, LOCATIONS_PATH, USER_PINS_PATH,
    geocoding::{GeocodeResult, GeocodingClient},
    location_store::LocationStore,
    pin_store::{PinFilter, PinStore},
};

#[derive(Clone)]
pub struct DataManager {
    pub(crate) pin_store: PinStore,
    pub(crate) location_store: LocationStore,
    pub(crate) geocoding: GeocodingClient,
}

/// The public interface for all love map data management.
impl DataManager {
    pub async fn start() -> Result<Self, DataManagerError> {
        let root: PathBuf = project_root::get_project_root().unwrap();

        // Create data dir if it doesn't exist
        let data_dir = root.join(DATA_DIR);
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|_| {
                DataManagerError::Storage(format!(
                    "Failed to create data directory: {:?}",
                    data_dir
                ))
            })?;
        }

        let pin_store =
            PinStore::load(&root.join(BASE_PINS_PATH), &root.join(USER_PINS_PATH)).await;
        let location_store = LocationStore::new(root.join(LOCATIONS_PATH));
        let geocoding = GeocodingClient::new()?;

        Ok(DataManager {
            pin_store,
            location_store,
            geocoding,
        })
    }

    pub async fn get_pins(&self, filter: PinFilter) -> Vec<Pin> {
        self.pin_store.filtered(filter).await
    }

    pub async fn add_pin(&self, draft: PinDraft) -> Result<Pin, DataManagerError> {
        self.pin_store.add(draft).await
    }

    pub async fn export_pins(&self) -> Result<String, DataManagerError> {
        self.pin_store.export().await
    }

    pub async fn get_location(&self, who: Participant) -> Option<Location> {
        self.location_store.get(who).await
    }

    pub async fn set_location(
        &self,
        who: Participant,
        lat: f64,
        lng: f64,
    ) -> Result<Location, DataManagerError> {
        self.location_store.set(who, lat, lng).await
    }

    pub async fn search_location(
        &self,
        query: &str,
    ) -> Result<Vec<GeocodeResult>, DataManagerError> {
        self.geocoding.search(query).await
    }

    /// The distance banner payload, available once both participants have
    /// shared a location.
    pub async fn distance_report(&self) -> Option<DistanceReport> {
        let flo = self.location_store.get(Participant::Flo).await?;
        let maria = self.location_store.get(Participant::Maria).await?;
        Some(DistanceReport::between(&flo, &maria))
    }
}
