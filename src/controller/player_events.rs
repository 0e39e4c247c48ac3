//! Listener for events coming back from the audio output thread

use tokio::sync::mpsc::UnboundedReceiver;

use crate::audio::AudioEvent;
use super::AppController;

impl AppController {
    pub fn start_audio_event_listener(&self, mut events: UnboundedReceiver<AudioEvent>) -> tokio::task::JoinHandle<()> {
        let controller = self.clone();
        tracing::info!("Starting audio event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Audio event listener shutting down");
                    break;
                }
                controller.handle_audio_event(event).await;
            }
        })
    }

    pub(crate) async fn handle_audio_event(&self, event: AudioEvent) {
        let model = self.model.lock().await;
        let snapshot = model.snapshot().await;

        match event {
            AudioEvent::Loaded { song_id, duration_ms } => {
                if snapshot.current_song_id() != Some(song_id.as_str()) {
                    tracing::trace!(song_id = %song_id, "Loaded event for a stale song");
                    return;
                }
                tracing::info!(song_id = %song_id, duration_ms, "AudioEvent::Loaded");
                model.start_track_timing(duration_ms, snapshot.is_playing()).await;
            }
            AudioEvent::Finished { song_id } => {
                if snapshot.current_song_id() != Some(song_id.as_str()) {
                    return;
                }
                tracing::debug!(song_id = %song_id, "AudioEvent::Finished");
                model.finish_track_timing().await;
            }
            AudioEvent::Failed { song_id, message } => {
                tracing::warn!(song_id = %song_id, message = %message, "AudioEvent::Failed");
                if snapshot.current_song_id() == Some(song_id.as_str()) {
                    model.set_error(message).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::AudioEvent;
    use crate::controller::test_support::controller_with_songs;

    #[tokio::test]
    async fn finished_track_stops_progress_but_not_state() {
        let controller = controller_with_songs(2).await;
        controller.next_track().await;

        controller
            .handle_audio_event(AudioEvent::Loaded {
                song_id: "s2".to_string(),
                duration_ms: 200_000,
            })
            .await;
        controller
            .handle_audio_event(AudioEvent::Finished { song_id: "s2".to_string() })
            .await;

        let info = controller.model.lock().await.get_playback_info().await;
        assert!(info.finished);
        assert_eq!(info.duration_ms, 200_000);
        assert_eq!(info.progress_ms, 200_000);
        assert!(info.snapshot.is_playing());
        assert_eq!(info.snapshot.current_song_id(), Some("s2"));
    }

    #[tokio::test]
    async fn events_for_stale_songs_are_ignored() {
        let controller = controller_with_songs(2).await;

        controller
            .handle_audio_event(AudioEvent::Loaded {
                song_id: "s2".to_string(),
                duration_ms: 1_000,
            })
            .await;
        controller
            .handle_audio_event(AudioEvent::Failed {
                song_id: "s2".to_string(),
                message: "bad".to_string(),
            })
            .await;

        let model = controller.model.lock().await;
        assert_eq!(model.get_playback_info().await.duration_ms, 0);
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn failure_for_current_song_is_shown() {
        let controller = controller_with_songs(1).await;
        controller
            .handle_audio_event(AudioEvent::Failed {
                song_id: "s1".to_string(),
                message: "Could not decode track".to_string(),
            })
            .await;
        let ui = controller.model.lock().await.get_ui_state().await;
        assert_eq!(ui.error_message.as_deref(), Some("Could not decode track"));
    }
}
