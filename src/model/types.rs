//! Core type definitions for the application

use serde::{Deserialize, Deserializer};
use std::time::Instant;

/// A playable entry of the catalog, as served by the catalog endpoint.
///
/// Immutable once fetched. Field names follow the server's JSON; the
/// aliases cover the spellings the common catalog backends use.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Song {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(alias = "url", alias = "audio", alias = "file")]
    pub src: String,
    #[serde(default, alias = "cover", alias = "artwork")]
    pub image: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Sidebar,
    Songs,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Sidebar,
            ActiveSection::Sidebar => ActiveSection::Songs,
            ActiveSection::Songs => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Songs,
            ActiveSection::Sidebar => ActiveSection::Search,
            ActiveSection::Songs => ActiveSection::Sidebar,
        }
    }
}

/// Header tabs. Only `Music` has content; the rest are placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeaderTab {
    #[default]
    Music,
    Podcast,
    Live,
    Radio,
}

impl HeaderTab {
    pub const ALL: [HeaderTab; 4] = [
        HeaderTab::Music,
        HeaderTab::Podcast,
        HeaderTab::Live,
        HeaderTab::Radio,
    ];

    pub fn title(self) -> &'static str {
        match self {
            HeaderTab::Music => "Music",
            HeaderTab::Podcast => "Podcast",
            HeaderTab::Live => "Live",
            HeaderTab::Radio => "Radio",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Music => Self::Podcast,
            Self::Podcast => Self::Live,
            Self::Live => Self::Radio,
            Self::Radio => Self::Music,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Music => Self::Radio,
            Self::Podcast => Self::Music,
            Self::Live => Self::Podcast,
            Self::Radio => Self::Live,
        }
    }
}

/// An entry in the sidebar
#[derive(Clone, Debug)]
pub struct SidebarItem {
    pub name: String,
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub header_tab: HeaderTab,
    pub search_query: String,
    pub sidebar_items: Vec<SidebarItem>,
    pub sidebar_selected: usize,
    /// Cursor in the song list (independent of the playing song)
    pub song_cursor: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Songs,
            header_tab: HeaderTab::Music,
            search_query: String::new(),
            sidebar_items: vec![
                SidebarItem { name: "Home".to_string() },
                SidebarItem { name: "Discover".to_string() },
                SidebarItem { name: "Albums".to_string() },
                SidebarItem { name: "Artists".to_string() },
                SidebarItem { name: "Favourites".to_string() },
            ],
            sidebar_selected: 0,
            song_cursor: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_accepts_mongo_style_record() {
        let json = r#"{
            "_id": "66a1f0c2",
            "title": "Billie Jean",
            "artist": "Michael Jackson",
            "src": "/uploads/billie-jean.mp3",
            "image": "/uploads/thriller.jpg",
            "__v": 0
        }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.id, "66a1f0c2");
        assert_eq!(song.src, "/uploads/billie-jean.mp3");
        assert_eq!(song.image.as_deref(), Some("/uploads/thriller.jpg"));
    }

    #[test]
    fn song_accepts_numeric_id_and_alternate_names() {
        let json = r#"{ "id": 7, "title": "Intro", "url": "https://cdn.example.org/intro.ogg", "cover": "c.png" }"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.id, "7");
        assert_eq!(song.artist, "");
        assert_eq!(song.src, "https://cdn.example.org/intro.ogg");
        assert_eq!(song.image.as_deref(), Some("c.png"));
    }

    #[test]
    fn song_without_source_is_rejected() {
        let json = r#"{ "_id": "1", "title": "Silent" }"#;
        assert!(serde_json::from_str::<Song>(json).is_err());
    }

    #[test]
    fn sections_cycle_both_ways() {
        let mut section = ActiveSection::Search;
        for _ in 0..3 {
            section = section.next();
        }
        assert_eq!(section, ActiveSection::Search);
        assert_eq!(ActiveSection::Search.prev(), ActiveSection::Songs);
        assert_eq!(HeaderTab::Music.prev(), HeaderTab::Radio);
        assert_eq!(HeaderTab::Radio.next(), HeaderTab::Music);
    }
}
