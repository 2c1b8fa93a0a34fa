//! Loading and saving the app-data document.

use crate::error::{ErrorKind, Result};
use crate::models::{
    AppData, Cell, ChurchConfig, ChurchEvent, GalleryImage, Sermon, default_cells, default_events,
    default_gallery, default_sermons,
};
use exn::ResultExt;
use serde::Deserialize;
use verbum_storage::KeyValueStore;

/// Store key holding the whole [`AppData`] document.
pub const APP_DATA_KEY: &str = "igreja_digital_data";

/// The document as written by any past version: every part optional, unknown
/// fields ignored.
#[derive(Deserialize)]
struct StoredAppData {
    config: Option<ChurchConfig>,
    events: Option<Vec<ChurchEvent>>,
    sermons: Option<Vec<Sermon>>,
    gallery: Option<Vec<GalleryImage>>,
    cells: Option<Vec<Cell>>,
}

impl From<StoredAppData> for AppData {
    fn from(stored: StoredAppData) -> Self {
        Self {
            config: stored.config.unwrap_or_default(),
            events: stored.events.unwrap_or_else(default_events),
            sermons: stored.sermons.unwrap_or_else(default_sermons),
            gallery: stored.gallery.unwrap_or_else(default_gallery),
            cells: stored.cells.unwrap_or_else(default_cells),
        }
    }
}

impl AppData {
    /// Parse a document, filling whatever it leaves out from the defaults.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<StoredAppData>(raw).map(Self::from)
    }
}

/// Load church data, merged over the defaults.
///
/// Absent or unparseable documents give [`AppData::default()`]. Only a failing
/// store is an error.
pub async fn load_app_data(store: &dyn KeyValueStore) -> Result<AppData> {
    let Some(raw) = store.get(APP_DATA_KEY).await.or_raise(|| ErrorKind::Storage)? else {
        return Ok(AppData::default());
    };
    match AppData::from_json(&raw) {
        Ok(data) => Ok(data),
        Err(err) => {
            tracing::warn!(key = APP_DATA_KEY, error = %err, "Ignoring unreadable church data");
            Ok(AppData::default())
        },
    }
}

/// Replace the stored document.
pub async fn save_app_data(store: &dyn KeyValueStore, data: &AppData) -> Result<()> {
    let raw = serde_json::to_string(data).or_raise(|| ErrorKind::Storage)?;
    store.set(APP_DATA_KEY, &raw).await.or_raise(|| ErrorKind::Storage)?;
    tracing::debug!(events = data.events.len(), sermons = data.sermons.len(), "Saved church data");
    Ok(())
}
