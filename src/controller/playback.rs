//! Playback control methods

use crate::model::{PlaybackSnapshot, Song, Transition};

use super::AppController;

impl AppController {
    /// Dispatch a transition and bring the audio output in line with it.
    pub async fn apply(&self, transition: Transition) {
        let model = self.model.lock().await;
        let (before, after) = model.dispatch(transition).await;

        if before.current_song_id() != after.current_song_id() {
            model.follow_current_song().await;
        }
        drop(model);

        self.sync_audio(&before, &after).await;
    }

    /// Enter on a song in the list, or play/pause from the now-playing panel.
    pub async fn select_or_toggle(&self, song: Option<Song>) {
        self.apply(Transition::SelectOrToggle(song.map(|s| s.id))).await;
    }

    pub async fn toggle_playback(&self) {
        let current = self.model.lock().await.current_song().await;
        self.select_or_toggle(current).await;
    }

    pub async fn pause(&self) {
        self.apply(Transition::SelectOrToggle(None)).await;
    }

    pub async fn next_track(&self) {
        self.apply(Transition::Next).await;
    }

    pub async fn previous_track(&self) {
        self.apply(Transition::Previous).await;
    }

    pub async fn toggle_shuffle(&self) {
        self.apply(Transition::ToggleShuffle).await;
    }

    pub async fn toggle_loop(&self) {
        self.apply(Transition::ToggleLoop).await;
    }

    async fn sync_audio(&self, before: &PlaybackSnapshot, after: &PlaybackSnapshot) {
        if before.current_song_id() != after.current_song_id() {
            self.model.lock().await.reset_timing().await;

            // Silence the previous track while the next one is fetched
            if let Some(backend) = self.audio_backend.lock().await.as_ref() {
                if let Err(e) = backend.stop() {
                    tracing::warn!(error = %e, "Failed to stop audio");
                }
            }

            if let Some(song) = after.current_song() {
                let controller = self.clone();
                let song = song.clone();
                tokio::spawn(async move {
                    controller.load_song(song).await;
                });
            }
            return;
        }

        if before.is_playing() != after.is_playing() {
            let playing = after.is_playing();
            self.model.lock().await.set_timing_running(playing).await;

            if let Some(backend) = self.audio_backend.lock().await.as_ref() {
                let result = if playing { backend.play() } else { backend.pause() };
                match result {
                    Ok(()) => tracing::info!(action = if playing { "resumed" } else { "paused" }, "Playback toggled"),
                    Err(e) => tracing::error!(error = %e, "Toggle playback failed"),
                }
            }
        }
    }

    /// Fetch a song's audio and hand it to the output.
    ///
    /// The result is dropped if another song was selected while fetching.
    async fn load_song(&self, song: Song) {
        if self.audio_backend.lock().await.is_none() {
            tracing::debug!(song_id = %song.id, "No audio output, skipping load");
            return;
        }

        let bytes = match self.catalog.fetch_audio(&song).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(song_id = %song.id, error = %e, "Failed to fetch audio");
                self.model
                    .lock()
                    .await
                    .set_error(format!("Could not load \"{}\": {}", song.title, e))
                    .await;
                return;
            }
        };

        let snapshot = self.model.lock().await.snapshot().await;
        let Some(autoplay) = snapshot.autoplay_for(&song.id) else {
            tracing::debug!(song_id = %song.id, "Song changed while fetching, discarding");
            return;
        };

        if let Some(backend) = self.audio_backend.lock().await.as_ref() {
            if let Err(e) = backend.load(song.id.clone(), bytes, autoplay) {
                tracing::error!(song_id = %song.id, error = %e, "Failed to load track");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::AudioCommand;
    use crate::config::Config;
    use crate::controller::test_support::{controller_with_output, controller_with_songs};
    use crate::controller::AppController;
    use crate::model::{Song, Transition};
    use axum::{routing::get, Router};
    use std::sync::mpsc::{self, TryRecvError};
    use std::time::Duration;
    use tokio::net::TcpListener;

    /// Serves `/audio/1.mp3` after a delay and `/audio/2.mp3` immediately;
    /// song 3 has no route and gets a 404.
    async fn audio_server() -> Config {
        let router = Router::new()
            .route(
                "/audio/1.mp3",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    b"one".to_vec()
                }),
            )
            .route("/audio/2.mp3", get(|| async { b"two".to_vec() }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Config {
            catalog_url: format!("http://{addr}/api/songs"),
            ..Config::default()
        }
    }

    async fn with_catalog() -> (AppController, mpsc::Receiver<AudioCommand>) {
        let (controller, commands) = controller_with_output(&audio_server().await);
        let songs = (1..=3).map(|i| song_with_id(&i.to_string())).collect();
        controller.apply(Transition::CatalogLoaded(songs)).await;
        (controller, commands)
    }

    /// Next command the output received, waiting for background loads.
    async fn next_command(commands: &mpsc::Receiver<AudioCommand>) -> AudioCommand {
        for _ in 0..500 {
            match commands.try_recv() {
                Ok(command) => return command,
                Err(TryRecvError::Empty) => tokio::time::sleep(Duration::from_millis(10)).await,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        panic!("no audio command arrived");
    }

    fn assert_load(command: AudioCommand, expected_id: &str, expected_autoplay: bool) {
        match command {
            AudioCommand::Load { song_id, autoplay, .. } => {
                assert_eq!(song_id, expected_id);
                assert_eq!(autoplay, expected_autoplay);
            }
            other => panic!("expected a load, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_without_audio_output_updates_state() {
        let controller = controller_with_songs(3).await;

        controller.next_track().await;
        controller.next_track().await;
        let snapshot = controller.model.lock().await.snapshot().await;
        assert_eq!(snapshot.current_song_id(), Some("s3"));
        assert!(snapshot.is_playing());

        controller.toggle_playback().await;
        assert!(!controller.model.lock().await.snapshot().await.is_playing());

        controller.previous_track().await;
        let model = controller.model.lock().await;
        assert_eq!(model.snapshot().await.current_song_id(), Some("s2"));
        assert_eq!(model.get_ui_state().await.song_cursor, 1);
    }

    #[tokio::test]
    async fn pause_keeps_selection() {
        let controller = controller_with_songs(2).await;
        controller.next_track().await;
        controller.pause().await;

        let snapshot = controller.model.lock().await.snapshot().await;
        assert!(!snapshot.is_playing());
        assert_eq!(snapshot.current_song_id(), Some("s2"));
    }

    #[tokio::test]
    async fn first_song_is_preloaded_paused() {
        let (_controller, commands) = with_catalog().await;

        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "1", false);
    }

    #[tokio::test]
    async fn switching_songs_stops_the_old_track_before_loading() {
        let (controller, commands) = with_catalog().await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "1", false);

        controller.next_track().await;

        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "2", true);
    }

    #[tokio::test]
    async fn audio_fetched_for_a_replaced_song_is_discarded() {
        let (controller, commands) = with_catalog().await;
        // song 1 is still downloading when the user moves on
        controller.next_track().await;

        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "2", true);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(matches!(commands.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn failed_fetch_is_shown_and_old_track_stays_silent() {
        let (controller, commands) = with_catalog().await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "1", false);

        controller.select_or_toggle(Some(song_with_id("3"))).await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));

        let mut shown = false;
        for _ in 0..500 {
            if controller.model.lock().await.has_error().await {
                shown = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(shown);
        assert!(matches!(commands.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn play_flag_changes_drive_the_output() {
        let (controller, commands) = with_catalog().await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Stop));
        assert_load(next_command(&commands).await, "1", false);

        controller.toggle_playback().await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Play));

        controller.pause().await;
        assert!(matches!(next_command(&commands).await, AudioCommand::Pause));

        // shuffle and loop leave the output alone
        controller.toggle_shuffle().await;
        controller.toggle_loop().await;
        assert!(matches!(commands.try_recv(), Err(TryRecvError::Empty)));
    }

    fn song_with_id(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "Band".to_string(),
            src: format!("/audio/{id}.mp3"),
            image: None,
        }
    }
}
