//! In-memory latest-reading store behind `/iot/live`.

use indexmap::IndexMap;
use shared::{compute_status, IotUpdate, LiveTote, ToteRecord};
use tokio::sync::RwLock;

/// Description recorded when a device sends no location label
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("tote_id is required")]
    MissingToteId,
}

/// Latest record per tote, in first-seen order.
#[derive(Default)]
pub struct ToteStore {
    totes: RwLock<IndexMap<String, ToteRecord>>,
}

impl ToteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tote's record with this reading. The status is always
    /// derived here from the readings; whatever the device claims is ignored.
    pub async fn apply_update(
        &self,
        update: &IotUpdate,
        received_at: f64,
    ) -> Result<ToteRecord, IngestError> {
        let tote_id = update.tote_id().ok_or(IngestError::MissingToteId)?;

        let record = ToteRecord {
            id: tote_id.to_string(),
            name: Some(tote_id.to_string()),
            status: compute_status(update.temperature, update.humidity, update.lux),
            temperature: update.temperature,
            humidity: update.humidity,
            lux: update.lux,
            location: Some(
                update
                    .location_label
                    .clone()
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            ),
            coords: update.coords(),
            last_updated: Some(update.timestamp.unwrap_or(received_at)),
        };

        self.totes
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Wire form of every tote for `/iot/live`
    pub async fn live(&self) -> IndexMap<String, LiveTote> {
        self.totes
            .read()
            .await
            .iter()
            .map(|(id, record)| (id.clone(), LiveTote::from(record)))
            .collect()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.totes.read().await.len()
    }
}
