//! Church community data.
//!
//! Everything an administrator edits (church details, events, sermons,
//! gallery, cell groups) lives in a single JSON document in the key-value
//! store. Loading never fails on bad data: missing or unreadable parts are
//! replaced by the built-in defaults.

mod data;
pub mod error;
mod models;

pub use crate::data::{APP_DATA_KEY, load_app_data, save_app_data};
pub use crate::models::{AppData, Cell, ChurchConfig, ChurchEvent, GalleryImage, Sermon};
