//! Playback state: the catalog, the current position in it and the
//! transport flags, owned by a single store.
//!
//! Everything outside this module reads a [`PlaybackSnapshot`] and changes
//! state only through [`PlayerStore::dispatch`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

use super::navigator;
use super::types::Song;

/// The five user-facing transitions plus the one-shot catalog population.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Toggle play/pause on the current song, switch to another song
    /// (always playing), or pause when no song id is given.
    SelectOrToggle(Option<String>),
    Next,
    Previous,
    ToggleShuffle,
    ToggleLoop,
    CatalogLoaded(Vec<Song>),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::SelectOrToggle(Some(_)) => "select_or_toggle",
            Transition::SelectOrToggle(None) => "pause",
            Transition::Next => "next",
            Transition::Previous => "previous",
            Transition::ToggleShuffle => "toggle_shuffle",
            Transition::ToggleLoop => "toggle_loop",
            Transition::CatalogLoaded(_) => "catalog_loaded",
        }
    }
}

/// Transport state. The current song is stored only as an index into the
/// catalog, so the song and its position cannot disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current: Option<usize>,
    pub is_playing: bool,
    pub is_shuffling: bool,
    /// Tracked and shown, but nothing consults it yet.
    pub is_looping: bool,
}

impl PlaybackState {
    /// Position used by next/previous. Defaults to 0 before any selection.
    pub fn current_index(&self) -> usize {
        self.current.unwrap_or(0)
    }
}

/// Read-only view of the store handed to the controller and the view.
#[derive(Clone, Debug, Default)]
pub struct PlaybackSnapshot {
    pub catalog: Arc<Vec<Song>>,
    pub state: PlaybackState,
}

impl PlaybackSnapshot {
    pub fn current_song(&self) -> Option<&Song> {
        self.state.current.and_then(|i| self.catalog.get(i))
    }

    pub fn current_song_id(&self) -> Option<&str> {
        self.current_song().map(|s| s.id.as_str())
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Whether audio fetched for `song_id` should go into the sink, and if
    /// so whether it starts playing right away.
    ///
    /// `None` when another song became current while the audio was fetched.
    pub fn autoplay_for(&self, song_id: &str) -> Option<bool> {
        (self.current_song_id() == Some(song_id)).then_some(self.state.is_playing)
    }
}

pub struct PlayerStore {
    catalog: Arc<Vec<Song>>,
    catalog_loaded: bool,
    state: PlaybackState,
    rng: StdRng,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            catalog: Arc::new(Vec::new()),
            catalog_loaded: false,
            state: PlaybackState::default(),
            rng,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            catalog: Arc::clone(&self.catalog),
            state: self.state,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    /// Apply a transition. Returns `true` if the state changed.
    pub fn dispatch(&mut self, transition: Transition) -> bool {
        let name = transition.name();
        let before = self.state;
        let changed = match transition {
            Transition::SelectOrToggle(Some(id)) => self.select_or_toggle(&id),
            Transition::SelectOrToggle(None) => {
                self.state.is_playing = false;
                before != self.state
            }
            Transition::Next => self.next(),
            Transition::Previous => self.previous(),
            Transition::ToggleShuffle => {
                self.state.is_shuffling = !self.state.is_shuffling;
                true
            }
            Transition::ToggleLoop => {
                self.state.is_looping = !self.state.is_looping;
                true
            }
            Transition::CatalogLoaded(songs) => self.load_catalog(songs),
        };
        crate::log_transition!(name, changed);
        changed
    }

    fn select_or_toggle(&mut self, id: &str) -> bool {
        let current_id = self
            .state
            .current
            .and_then(|i| self.catalog.get(i))
            .map(|s| s.id.as_str());

        if current_id == Some(id) {
            self.state.is_playing = !self.state.is_playing;
            return true;
        }

        match self.catalog.iter().position(|s| s.id == id) {
            Some(index) => {
                self.state.current = Some(index);
                self.state.is_playing = true;
                true
            }
            None => {
                tracing::warn!(song_id = id, "Selected song is not in the catalog");
                false
            }
        }
    }

    fn next(&mut self) -> bool {
        let len = self.catalog.len();
        let current = self.state.current_index();
        match navigator::next_index(len, current, self.state.is_shuffling, &mut self.rng) {
            Some(index) => {
                self.state.current = Some(index);
                self.state.is_playing = true;
                true
            }
            None => false,
        }
    }

    fn previous(&mut self) -> bool {
        let len = self.catalog.len();
        match navigator::previous_index(len, self.state.current_index()) {
            Some(index) => {
                self.state.current = Some(index);
                self.state.is_playing = true;
                true
            }
            None => false,
        }
    }

    fn load_catalog(&mut self, songs: Vec<Song>) -> bool {
        if self.catalog_loaded {
            tracing::warn!("Catalog already loaded for this session, ignoring");
            return false;
        }
        self.catalog_loaded = true;
        self.state.current = if songs.is_empty() { None } else { Some(0) };
        self.catalog = Arc::new(songs);
        true
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress of the audio currently in the output sink, for the progress bar.
///
/// Fed by audio backend events; it never feeds back into [`PlaybackState`].
#[derive(Clone)]
pub struct PlaybackTiming {
    pub position_ms: u32,
    pub last_update: Instant,
    pub is_running: bool,
    pub duration_ms: u32,
    pub finished: bool,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            position_ms: 0,
            last_update: Instant::now(),
            is_running: false,
            duration_ms: 0,
            finished: false,
        }
    }
}

impl PlaybackTiming {
    pub fn current_position_ms(&self) -> u32 {
        let position = if self.is_running {
            let elapsed = u32::try_from(self.last_update.elapsed().as_millis()).unwrap_or(u32::MAX);
            self.position_ms.saturating_add(elapsed)
        } else {
            self.position_ms
        };
        if self.duration_ms > 0 {
            position.min(self.duration_ms)
        } else {
            position
        }
    }

    /// A new track was loaded into the sink.
    pub fn start_track(&mut self, duration_ms: u32, running: bool) {
        self.position_ms = 0;
        self.duration_ms = duration_ms;
        self.is_running = running;
        self.finished = false;
        self.last_update = Instant::now();
    }

    pub fn set_running(&mut self, running: bool) {
        if self.finished || self.is_running == running {
            return;
        }
        self.position_ms = self.current_position_ms();
        self.is_running = running;
        self.last_update = Instant::now();
    }

    pub fn finish(&mut self) {
        self.position_ms = self.duration_ms.max(self.current_position_ms());
        self.is_running = false;
        self.finished = true;
        self.last_update = Instant::now();
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub snapshot: PlaybackSnapshot,
    pub progress_ms: u32,
    pub duration_ms: u32,
    pub finished: bool,
}
