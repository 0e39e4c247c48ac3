//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::playback::{PlaybackInfo, PlaybackSnapshot, PlaybackTiming, PlayerStore, Transition};
use super::types::{ActiveSection, HeaderTab, Song, UiState};

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    store: Arc<Mutex<PlayerStore>>,
    playback_timing: Arc<Mutex<PlaybackTiming>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self::with_store(PlayerStore::new())
    }

    pub fn with_store(store: PlayerStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            playback_timing: Arc::new(Mutex::new(PlaybackTiming::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Playback store
    // ========================================================================

    /// Apply a transition and return the snapshots around it.
    pub async fn dispatch(&self, transition: Transition) -> (PlaybackSnapshot, PlaybackSnapshot) {
        let mut store = self.store.lock().await;
        let before = store.snapshot();
        store.dispatch(transition);
        (before, store.snapshot())
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.store.lock().await.snapshot()
    }

    pub async fn current_song(&self) -> Option<Song> {
        self.snapshot().await.current_song().cloned()
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let snapshot = self.snapshot().await;
        let timing = self.playback_timing.lock().await;

        PlaybackInfo {
            snapshot,
            progress_ms: timing.current_position_ms(),
            duration_ms: timing.duration_ms,
            finished: timing.finished,
        }
    }

    // ========================================================================
    // Audio progress
    // ========================================================================

    pub async fn start_track_timing(&self, duration_ms: u32, running: bool) {
        self.playback_timing.lock().await.start_track(duration_ms, running);
    }

    pub async fn set_timing_running(&self, running: bool) {
        self.playback_timing.lock().await.set_running(running);
    }

    pub async fn finish_track_timing(&self) {
        self.playback_timing.lock().await.finish();
    }

    pub async fn reset_timing(&self) {
        *self.playback_timing.lock().await = PlaybackTiming::default();
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn switch_header_tab(&self, forward: bool) {
        let mut state = self.ui_state.lock().await;
        state.header_tab = if forward {
            state.header_tab.next()
        } else {
            state.header_tab.prev()
        };
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Sidebar => {
                state.sidebar_selected = state.sidebar_selected.saturating_sub(1);
            }
            ActiveSection::Songs => {
                state.song_cursor = state.song_cursor.saturating_sub(1);
            }
            ActiveSection::Search => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let song_count = self.store.lock().await.catalog().len();
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Sidebar => {
                if state.sidebar_selected < state.sidebar_items.len().saturating_sub(1) {
                    state.sidebar_selected += 1;
                }
            }
            ActiveSection::Songs => {
                if state.song_cursor < song_count.saturating_sub(1) {
                    state.song_cursor += 1;
                }
            }
            ActiveSection::Search => {}
        }
    }

    /// Move the song list cursor onto the playing song.
    pub async fn follow_current_song(&self) {
        let index = self.store.lock().await.state().current;
        if let Some(index) = index {
            self.ui_state.lock().await.song_cursor = index;
        }
    }

    pub async fn song_under_cursor(&self) -> Option<Song> {
        let state = self.ui_state.lock().await;
        if state.header_tab != HeaderTab::Music {
            return None;
        }
        let cursor = state.song_cursor;
        drop(state);
        self.store.lock().await.catalog().get(cursor).cloned()
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    pub async fn clear_search(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_DURATION {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
