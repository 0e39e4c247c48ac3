//! Model module - Application state and data types
//!
//! - `types`: Song record and UI state
//! - `navigator`: next/previous index selection
//! - `playback`: the playback store, its transitions and progress timing
//! - `app_model`: shared application model used by controller and view

mod types;
mod navigator;
mod playback;
mod app_model;

pub use types::{ActiveSection, HeaderTab, Song, UiState};

pub use playback::{PlaybackInfo, PlaybackSnapshot, PlayerStore, Transition};

pub use app_model::AppModel;
