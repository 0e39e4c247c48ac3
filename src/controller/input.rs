//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Error toast swallows the dismiss keys only
        if model.has_error().await && matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            model.clear_error().await;
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // The search field takes text but is not wired to the catalog
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::Songs && key.code == KeyCode::Enter {
            let song = model.song_under_cursor().await;
            drop(model);
            if song.is_some() {
                self.select_or_toggle(song).await;
            }
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Left => {
                model.switch_header_tab(false).await;
            }
            KeyCode::Right => {
                model.switch_header_tab(true).await;
            }
            // Play/Pause toggle on the current song
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            // Pause only
            KeyCode::Char('x') | KeyCode::Char('X') => {
                drop(model);
                self.pause().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_track().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_track().await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.toggle_shuffle().await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.toggle_loop().await;
            }
            KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::controller::test_support::controller_with_songs;
    use crate::controller::AppController;
    use crate::model::ActiveSection;

    async fn press(controller: &AppController, code: KeyCode) {
        controller
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn enter_plays_song_under_cursor_and_toggles_it() {
        let controller = controller_with_songs(3).await;
        press(&controller, KeyCode::Down).await;
        press(&controller, KeyCode::Down).await;
        press(&controller, KeyCode::Enter).await;

        let snapshot = controller.model.lock().await.snapshot().await;
        assert_eq!(snapshot.current_song_id(), Some("s3"));
        assert!(snapshot.is_playing());

        press(&controller, KeyCode::Enter).await;
        let snapshot = controller.model.lock().await.snapshot().await;
        assert_eq!(snapshot.current_song_id(), Some("s3"));
        assert!(!snapshot.is_playing());
    }

    #[tokio::test]
    async fn transport_keys_drive_the_store() {
        let controller = controller_with_songs(3).await;

        press(&controller, KeyCode::Char('n')).await;
        press(&controller, KeyCode::Char('s')).await;
        press(&controller, KeyCode::Char('r')).await;
        let state = controller.model.lock().await.snapshot().await.state;
        assert_eq!(state.current, Some(1));
        assert!(state.is_shuffling);
        assert!(state.is_looping);
        assert!(state.is_playing);

        press(&controller, KeyCode::Char('x')).await;
        assert!(!controller.model.lock().await.snapshot().await.is_playing());

        press(&controller, KeyCode::Char('p')).await;
        let state = controller.model.lock().await.snapshot().await.state;
        assert_eq!(state.current, Some(0));
        assert!(state.is_playing);

        press(&controller, KeyCode::Char(' ')).await;
        assert!(!controller.model.lock().await.snapshot().await.is_playing());
    }

    #[tokio::test]
    async fn typing_in_search_does_not_trigger_transport() {
        let controller = controller_with_songs(2).await;
        controller
            .model
            .lock()
            .await
            .set_active_section(ActiveSection::Search)
            .await;

        for c in "nspq".chars() {
            press(&controller, KeyCode::Char(c)).await;
        }

        let model = controller.model.lock().await;
        assert_eq!(model.get_ui_state().await.search_query, "nspq");
        assert_eq!(model.snapshot().await.state.current, Some(0));
        assert!(!model.should_quit().await);
    }

    #[tokio::test]
    async fn help_popup_blocks_other_keys() {
        let controller = controller_with_songs(2).await;
        press(&controller, KeyCode::Char('h')).await;
        press(&controller, KeyCode::Char('n')).await;
        assert_eq!(controller.model.lock().await.snapshot().await.state.current, Some(0));

        press(&controller, KeyCode::Esc).await;
        press(&controller, KeyCode::Char('q')).await;
        assert!(controller.model.lock().await.should_quit().await);
    }
}
