//! Now-playing panel with the transport controls

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::PlaybackSnapshot;

fn flag_span(label: &str, on: bool) -> Span<'static> {
    let (text, style) = if on {
        (format!("{label}: On"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        (format!("{label}: Off"), Style::default().fg(Color::DarkGray))
    };
    Span::styled(text, style)
}

pub fn render_now_playing(frame: &mut Frame, area: Rect, playback: &PlaybackSnapshot) {
    let mut lines: Vec<Line> = Vec::new();

    match playback.current_song() {
        Some(song) => {
            lines.push(Line::from(Span::styled(
                song.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                song.artist.clone(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("Track {} of {}", playback.current_index() + 1, playback.catalog.len()),
                Style::default().fg(Color::DarkGray),
            )));
            if let Some(image) = &song.image {
                lines.push(Line::from(Span::styled(
                    format!("Artwork: {image}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Nothing selected",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(if playback.is_playing() {
        Line::from(Span::styled("▶ Playing", Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled("⏸ Paused", Style::default().fg(Color::Yellow)))
    });
    lines.push(Line::from(flag_span("Shuffle", playback.state.is_shuffling)));
    lines.push(Line::from(flag_span("Loop", playback.state.is_looping)));

    lines.push(Line::from(""));
    let key = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    lines.push(Line::from(vec![
        Span::styled("[P]", key),
        Span::raw(" ⏮   "),
        Span::styled("[Space]", key),
        Span::raw(" ⏯   "),
        Span::styled("[N]", key),
        Span::raw(" ⏭"),
    ]));
    lines.push(Line::from(vec![
        Span::styled("[S]", key),
        Span::raw(" shuffle  "),
        Span::styled("[R]", key),
        Span::raw(" loop  "),
        Span::styled("[X]", key),
        Span::raw(" pause"),
    ]));

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Now Playing ")
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(panel, area);
}
