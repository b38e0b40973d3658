use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use love_map_lib::pin::{Pin, PinDraft, PinType};
use tokio::sync::Mutex;

use crate::DataManagerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFilter {
    All,
    Only(PinType),
}

impl FromStr for PinFilter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PinFilter::All),
            "memory" => Ok(PinFilter::Only(PinType::Memory)),
            "dream" => Ok(PinFilter::Only(PinType::Dream)),
            _ => Err("unknown filter"),
        }
    }
}

/// All pins matching the filter, insertion order preserved.
pub fn filter(pins: &[Pin], pin_filter: PinFilter) -> Vec<Pin> {
    match pin_filter {
        PinFilter::All => pins.to_vec(),
        PinFilter::Only(pin_type) => pins
            .iter()
            .filter(|pin| pin.pin_type == pin_type)
            .cloned()
            .collect(),
    }
}

/// The canonical pin collection for the process: the base set merged with the
/// persisted user-added set, extended in-session through [`PinStore::add`].
#[derive(Clone)]
pub struct PinStore {
    user_path: PathBuf,
    pins: Arc<Mutex<Vec<Pin>>>,
}

impl PinStore {
    /// Loads the base collection, then merges in previously persisted user
    /// pins, skipping any whose id the base set already claims. Both reads
    /// absorb failure: a missing or unparseable file leaves that side empty
    /// and the store usable.
    pub async fn load(base_path: &Path, user_path: &Path) -> Self {
        let mut pins = read_pin_file(base_path).await;

        let base_ids: HashSet<i64> = pins.iter().map(|pin| pin.id).collect();
        for mut pin in read_pin_file(user_path).await {
            pin.user_added = true; // survives round trips
            if !base_ids.contains(&pin.id) {
                pins.push(pin);
            }
        }

        PinStore {
            user_path: user_path.to_path_buf(),
            pins: Arc::new(Mutex::new(pins)),
        }
    }

    /// Snapshot of the current collection in insertion order.
    pub async fn all(&self) -> Vec<Pin> {
        self.pins.lock().await.clone()
    }

    pub async fn filtered(&self, pin_filter: PinFilter) -> Vec<Pin> {
        filter(&self.pins.lock().await, pin_filter)
    }

    /// Validates the draft, mints the next sequential id, appends and persists
    /// the user-added subset. The collection is untouched on validation
    /// failure.
    pub async fn add(&self, draft: PinDraft) -> Result<Pin, DataManagerError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DataManagerError::Validation(
                "Please provide a title.".to_string(),
            ));
        }
        let (Some(lat), Some(lng)) = (draft.lat, draft.lng) else {
            return Err(DataManagerError::Validation(
                "Please search for and select a location from the results.".to_string(),
            ));
        };

        // Id assignment and append happen under one lock so two rapid adds
        // cannot mint the same id.
        let mut pins = self.pins.lock().await;
        let id = pins.iter().map(|pin| pin.id).max().map_or(1, |max| max + 1);
        let pin = Pin {
            id,
            pin_type: draft.pin_type,
            title,
            location: draft.location.trim().to_string(),
            location_full: draft.location_full,
            description: draft.description,
            date: draft.date,
            lat,
            lng,
            media: draft.media,
            user_added: true,
        };
        pins.push(pin.clone());
        let user_pins: Vec<Pin> = pins.iter().filter(|pin| pin.user_added).cloned().collect();
        drop(pins);

        self.persist_user_added(&user_pins).await;

        Ok(pin)
    }

    /// The full current collection, pretty-printed for download.
    pub async fn export(&self) -> Result<String, DataManagerError> {
        serde_json::to_string_pretty(&*self.pins.lock().await)
            .map_err(|err| DataManagerError::Storage(format!("Failed to serialize pins: {err}")))
    }

    /// Overwrites the user-pins file with the given subset. Best effort: a
    /// failed write is logged and the in-memory collection stays
    /// authoritative.
    async fn persist_user_added(&self, user_pins: &[Pin]) {
        let json = match serde_json::to_vec_pretty(user_pins) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("Could not serialize user pins: {err}");
                return;
            }
        };
        if let Err(err) = tokio::fs::write(&self.user_path, json).await {
            tracing::warn!("Could not save user pins to {:?}: {err}", self.user_path);
        }
    }
}

async fn read_pin_file(path: &Path) -> Vec<Pin> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!("Could not read pins from {:?}: {err}", path);
            return Vec::new();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(pins) => pins,
        Err(err) => {
            tracing::warn!("Could not parse pins in {:?}: {err}", path);
            Vec::new()
        }
    }
}
