use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::Utc;
use love_map_lib::location::{Location, Participant};

use crate::DataManagerError;

/// The persisted participant → last-shared-location mapping. Every operation
/// goes through the file, so the newest external write is what a
/// read-modify-write starts from.
#[derive(Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The participant's saved location, or None when never set or the
    /// storage is unreadable. Corrupt storage is treated as empty, never an
    /// error.
    pub async fn get(&self, who: Participant) -> Option<Location> {
        self.read_all().await.remove(&who)
    }

    /// Upserts the participant's entry with the coordinate and the current
    /// timestamp, writing the whole mapping back.
    pub async fn set(
        &self,
        who: Participant,
        lat: f64,
        lng: f64,
    ) -> Result<Location, DataManagerError> {
        let mut locations = self.read_all().await;
        let location = Location::new(lat, lng, Utc::now());
        locations.insert(who, location.clone());

        let json = serde_json::to_vec_pretty(&locations).map_err(|err| {
            DataManagerError::Storage(format!("Failed to serialize locations: {err}"))
        })?;
        tokio::fs::write(&self.path, json).await.map_err(|err| {
            DataManagerError::Storage(format!(
                "Failed to save locations to {:?}: {err}",
                self.path
            ))
        })?;

        Ok(location)
    }

    async fn read_all(&self) -> HashMap<Participant, Location> {
        read_location_file(&self.path).await
    }
}

async fn read_location_file(path: &Path) -> HashMap<Participant, Location> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(err) => {
            tracing::warn!("Could not read locations from {:?}: {err}", path);
            return HashMap::new();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(locations) => locations,
        Err(err) => {
            tracing::warn!("Could not parse locations in {:?}: {err}", path);
            HashMap::new()
        }
    }
}
