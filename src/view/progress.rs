//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackInfo;
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let status_text = match playback.snapshot.current_song() {
        None => " No track selected".to_string(),
        Some(song) if playback.snapshot.is_playing() => format!(" ▶ {} | {}", song.title, song.artist),
        Some(song) => format!(" ⏸  {} | {}", song.title, song.artist),
    };

    let state = &playback.snapshot.state;
    let shuffle_text = if state.is_shuffling { "Shuffle: On" } else { "Shuffle: Off" };
    let loop_text = if state.is_looping { "Loop: On" } else { "Loop: Off" };

    let time_str = if playback.finished {
        format!("{} / {} (ended)", format_duration(playback.progress_ms), format_duration(playback.duration_ms))
    } else if playback.duration_ms > 0 {
        format!("{} / {}", format_duration(playback.progress_ms), format_duration(playback.duration_ms))
    } else {
        format_duration(playback.progress_ms)
    };

    let progress_ratio = if playback.duration_ms > 0 {
        (playback.progress_ms as f64 / playback.duration_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let controls_info = format!(" {} | {} | H: help ", shuffle_text, loop_text);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress_ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
