//! Controller module - Application logic and event handling
//!
//! - `input`: Key event handling
//! - `playback`: Transport transitions and keeping the audio output in step
//! - `player_events`: Audio output event listener

mod input;
mod playback;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::AudioBackend;
use crate::catalog::CatalogClient;
use crate::model::{AppModel, Transition};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) audio_backend: Arc<Mutex<Option<AudioBackend>>>,
    pub(crate) catalog: CatalogClient,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        audio_backend: Arc<Mutex<Option<AudioBackend>>>,
        catalog: CatalogClient,
    ) -> Self {
        Self {
            model,
            audio_backend,
            catalog,
        }
    }

    /// Fetch the catalog once and populate the playback store.
    ///
    /// Failures are logged and absorbed: the app keeps running with an
    /// empty catalog and no retry is attempted.
    pub async fn load_catalog(&self) {
        let songs = match self.catalog.fetch_songs().await {
            Ok(songs) => songs,
            Err(e) => {
                tracing::error!(url = %self.catalog.endpoint(), error = %e, "Error fetching songs");
                return;
            }
        };

        if self.model.lock().await.should_quit().await {
            tracing::debug!("Catalog arrived after shutdown, discarding");
            return;
        }

        tracing::info!(songs = songs.len(), "Catalog loaded");
        self.apply(Transition::CatalogLoaded(songs)).await;
    }
}
