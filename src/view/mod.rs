//! View module - UI rendering
//!
//! Presentation only: everything drawn here comes from the playback info
//! and UI state snapshots passed to [`AppView::render`].
//!
//! - `utils`: Shared helpers (formatting, scrollable lists, popups)
//! - `layout`: Header (section tabs, search) and sidebar
//! - `content`: Song list
//! - `now_playing`: Current song and transport controls
//! - `progress`: Progress bar
//! - `overlays`: Error notification and help popup

mod utils;
mod layout;
mod content;
mod now_playing;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header: tabs + search
                Constraint::Min(0),    // Sidebar, songs, now playing
                Constraint::Length(3), // Progress bar
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(18),
                Constraint::Percentage(52),
                Constraint::Percentage(30),
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], ui_state);
        content::render_main_content(frame, main_chunks[1], ui_state, &playback.snapshot);
        now_playing::render_now_playing(frame, main_chunks[2], &playback.snapshot);

        progress::render_progress_bar(frame, chunks[2], playback);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
