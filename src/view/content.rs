//! Main content area: the song list, or a placeholder for the other tabs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, HeaderTab, PlaybackSnapshot, UiState};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_main_content(frame: &mut Frame, area: Rect, ui_state: &UiState, playback: &PlaybackSnapshot) {
    let is_focused = ui_state.active_section == ActiveSection::Songs;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if ui_state.header_tab != HeaderTab::Music {
        let placeholder = Paragraph::new(format!("{} is not available yet", ui_state.header_tab.title()))
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", ui_state.header_tab.title()))
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(placeholder, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Songs ({}) ", playback.catalog.len()))
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    if playback.catalog.is_empty() {
        let empty = Paragraph::new("No songs yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Format: " {num}   {marker}   {title}   {artist}", inside borders and padding
    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(playback.catalog.len());
    let fixed_width = 1 + num_width + 3 + 1 + 3 + 3;
    let remaining = content_width.saturating_sub(fixed_width);
    let title_width = (remaining * 55) / 100;
    let artist_width = remaining.saturating_sub(title_width);

    let items: Vec<ListItem> = playback
        .catalog
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let is_current = playback.state.current == Some(i);
            let marker = match (is_current, playback.is_playing()) {
                (true, true) => "▶",
                (true, false) => "⏸",
                _ => " ",
            };

            let line = format!(
                " {:>num_width$}   {}   {}   {}",
                i + 1,
                marker,
                truncate_string(&song.title, title_width),
                truncate_string(&song.artist, artist_width),
                num_width = num_width,
            );

            let style = if i == ui_state.song_cursor && is_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, ui_state.song_cursor, block);
}
