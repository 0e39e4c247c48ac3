//! Layout rendering (header, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph, Tabs},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, HeaderTab, UiState};
use super::utils::render_scrollable_list;

const SEARCH_PLACEHOLDER: &str = "Michael Jackson";

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Section tabs
            Constraint::Length(40), // Search input
        ])
        .split(area);

    // Header tabs, highlighted by the current selection
    let selected = HeaderTab::ALL
        .iter()
        .position(|tab| *tab == ui_state.header_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(HeaderTab::ALL.iter().map(|tab| tab.title()))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .divider(" ")
        .padding("  ", "  ")
        .block(Block::default().borders(Borders::ALL).title(" tunes-rs "));
    frame.render_widget(tabs, chunks[0]);

    // Search box, placeholder until something is typed
    let is_focused = ui_state.active_section == ActiveSection::Search;
    let (search_text, search_style) = if ui_state.search_query.is_empty() {
        (SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if is_focused {
        (ui_state.search_query.as_str(), Style::default().fg(Color::Green))
    } else {
        (ui_state.search_query.as_str(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(format!("🔍 {}", search_text))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(focus_style(is_focused)),
        );
    frame.render_widget(search, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Sidebar;

    let items: Vec<ListItem> = ui_state
        .sidebar_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == ui_state.sidebar_selected && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == ui_state.sidebar_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(item.name.clone()).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Browse ")
        .padding(Padding::horizontal(1))
        .border_style(focus_style(is_focused));

    render_scrollable_list(frame, area, items, ui_state.sidebar_selected, block);
}
