//! Session media-state controller
//!
//! Owns the local media device lifecycle for one session: camera/microphone
//! acquisition, per-track mute flags, the camera/screen source swap, and
//! teardown. All device access goes through a [`SourceProvider`]; the view
//! only ever reads [`SessionSnapshot`]s and issues commands.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::config::SessionConfig;
use crate::constants::PLACEHOLDER_PARTICIPANTS;
use crate::media::{MediaHandle, MediaSource, SourceProvider, TrackKind, TrackState};
use crate::protocol::SessionSnapshot;

/// Session lifecycle phase.
///
/// `ScreenActive` is reachable only from `CameraActive` and returns there
/// when sharing stops. `Ended` is terminal and reachable from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Initializing,
    CameraActive,
    ScreenActive,
    Ended,
}

struct SessionState {
    phase: SessionPhase,
    tracks: TrackState,
    camera: Option<MediaHandle>,
    screen: Option<MediaHandle>,
    /// Camera acquisition failed; the session runs without media
    no_media: bool,
    copied_at: Option<Instant>,
    /// Scoped screen-ended watcher; present exactly while `ScreenActive`
    screen_watch: Option<AbortHandle>,
}

/// The session media-state controller
pub struct SessionController {
    id: String,
    provider: Arc<dyn SourceProvider>,
    state: Mutex<SessionState>,
    copied_ttl: Duration,
    /// Revision channel bumped after every observable state change
    changed: Arc<watch::Sender<()>>,
    /// Back-reference handed to the scoped screen-ended watcher
    weak: Weak<SessionController>,
}

impl SessionController {
    pub fn new(
        id: impl Into<String>,
        provider: Arc<dyn SourceProvider>,
        config: &SessionConfig,
    ) -> Arc<Self> {
        let (changed, _) = watch::channel(());
        Arc::new_cyclic(|weak| Self {
            id: id.into(),
            provider,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Initializing,
                tracks: TrackState {
                    video_enabled: config.video_enabled,
                    audio_enabled: config.audio_enabled,
                },
                camera: None,
                screen: None,
                no_media: false,
                copied_at: None,
                screen_watch: None,
            }),
            copied_ttl: config.copied_ack_ttl(),
            changed: Arc::new(changed),
            weak: weak.clone(),
        })
    }

    /// The immutable session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Subscribe to state-change notifications for re-rendering.
    pub fn subscribe_changes(&self) -> watch::Receiver<()> {
        self.changed.subscribe()
    }

    /// Acquire the camera and enter `CameraActive`.
    ///
    /// Acquisition failure is not an error to the caller: the session
    /// continues degraded with `no_media` set and the view renders a
    /// disabled-camera placeholder. A handle that arrives after the session
    /// already ended is released, never installed.
    pub async fn start(&self) {
        let tracks = {
            let state = self.state.lock();
            if state.phase != SessionPhase::Initializing {
                return;
            }
            state.tracks
        };

        match self
            .provider
            .acquire_camera(tracks.video_enabled, tracks.audio_enabled)
            .await
        {
            Ok(handle) => {
                let mut state = self.state.lock();
                if state.phase == SessionPhase::Ended {
                    drop(state);
                    self.provider.release(&handle);
                    return;
                }
                state.camera = Some(handle);
                state.phase = SessionPhase::CameraActive;
                state.no_media = false;
            }
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "camera acquisition failed, continuing without media");
                let mut state = self.state.lock();
                if state.phase == SessionPhase::Ended {
                    return;
                }
                state.phase = SessionPhase::CameraActive;
                state.no_media = true;
            }
        }
        self.mark_changed();
    }

    /// Flip the camera video flag. Silent no-op without a camera handle.
    pub fn toggle_video(&self) -> TrackState {
        self.toggle(TrackKind::Video)
    }

    /// Flip the microphone flag. Silent no-op without a camera handle.
    ///
    /// During a screen share this mutates only the retained camera track:
    /// there is no audible effect until the camera is displayed again.
    pub fn toggle_audio(&self) -> TrackState {
        self.toggle(TrackKind::Audio)
    }

    fn toggle(&self, kind: TrackKind) -> TrackState {
        let mut state = self.state.lock();
        match &state.camera {
            Some(camera) if camera.has_track(kind) => {}
            _ => return state.tracks,
        }
        let enabled = match kind {
            TrackKind::Video => {
                state.tracks.video_enabled = !state.tracks.video_enabled;
                state.tracks.video_enabled
            }
            TrackKind::Audio => {
                state.tracks.audio_enabled = !state.tracks.audio_enabled;
                state.tracks.audio_enabled
            }
        };
        if let Some(camera) = &state.camera {
            self.provider.set_track_enabled(camera, kind, enabled);
        }
        let tracks = state.tracks;
        drop(state);
        self.mark_changed();
        tracks
    }

    /// Acquire a screen handle and enter `ScreenActive`.
    ///
    /// The camera handle is retained, only detached from display, so that
    /// stopping the share does not need a fresh permission prompt. Calling
    /// this while already sharing is a no-op; an acquisition failure leaves
    /// the session in `CameraActive` untouched.
    pub async fn start_screen_share(&self) {
        {
            let state = self.state.lock();
            if state.phase != SessionPhase::CameraActive {
                return;
            }
        }

        match self.provider.acquire_screen().await {
            Ok(handle) => {
                let mut state = self.state.lock();
                if state.phase != SessionPhase::CameraActive {
                    drop(state);
                    self.provider.release(&handle);
                    return;
                }
                state.screen_watch = Some(self.watch_screen_end(&handle));
                state.screen = Some(handle);
                state.phase = SessionPhase::ScreenActive;
            }
            Err(err) => {
                tracing::debug!(session = %self.id, error = %err, "screen share not started");
                return;
            }
        }
        self.mark_changed();
    }

    /// Release the screen handle and return to `CameraActive`.
    ///
    /// Also invoked when the platform reports the shared surface ended. The
    /// retained camera handle is re-displayed with its last track flags.
    pub fn stop_screen_share(&self) {
        let screen = {
            let mut state = self.state.lock();
            if state.phase != SessionPhase::ScreenActive {
                return;
            }
            if let Some(watcher) = state.screen_watch.take() {
                watcher.abort();
            }
            state.phase = SessionPhase::CameraActive;
            state.screen.take()
        };
        if let Some(handle) = screen {
            self.provider.release(&handle);
        }
        self.mark_changed();
    }

    /// Tear the session down from any phase, releasing every held handle.
    /// Idempotent; must run on view teardown even without an explicit click.
    pub fn leave(&self) {
        let (camera, screen) = {
            let mut state = self.state.lock();
            if state.phase == SessionPhase::Ended {
                return;
            }
            if let Some(watcher) = state.screen_watch.take() {
                watcher.abort();
            }
            state.phase = SessionPhase::Ended;
            (state.camera.take(), state.screen.take())
        };
        if let Some(handle) = screen {
            self.provider.release(&handle);
        }
        if let Some(handle) = camera {
            self.provider.release(&handle);
        }
        tracing::info!(session = %self.id, "session ended");
        self.mark_changed();
    }

    /// Record a copy of the session id and return it for the clipboard
    /// write. The acknowledgement is transient: `snapshot()` reports
    /// `copied` until the configured delay expires.
    pub fn copy_session_id(&self) -> String {
        self.state.lock().copied_at = Some(Instant::now());
        self.mark_changed();

        // Re-notify once the ack expires so the view drops the "Copied!"
        // label without polling.
        let changed = Arc::clone(&self.changed);
        let ttl = self.copied_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            changed.send_replace(());
        });

        self.id.clone()
    }

    /// Current render state for the view.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        let source = match state.phase {
            SessionPhase::ScreenActive => Some(MediaSource::Screen),
            SessionPhase::CameraActive if state.camera.is_some() => Some(MediaSource::Camera),
            _ => None,
        };
        let display_handle = match state.phase {
            SessionPhase::ScreenActive => state.screen.as_ref().map(|h| h.id),
            SessionPhase::CameraActive => state.camera.as_ref().map(|h| h.id),
            _ => None,
        };
        SessionSnapshot {
            session_id: self.id.clone(),
            phase: state.phase,
            source,
            tracks: state.tracks,
            no_media: state.no_media,
            copied: state
                .copied_at
                .map(|at| at.elapsed() < self.copied_ttl)
                .unwrap_or(false),
            participants: PLACEHOLDER_PARTICIPANTS,
            display_handle,
        }
    }

    /// Spawn the scoped watcher for a screen handle's ended signal. The
    /// returned handle is aborted on every exit from `ScreenActive`.
    fn watch_screen_end(&self, handle: &MediaHandle) -> AbortHandle {
        let mut ended = handle.ended();
        let controller = self.weak.clone();
        let task = tokio::spawn(async move {
            if ended.wait_for(|ended| *ended).await.is_ok() {
                if let Some(controller) = controller.upgrade() {
                    tracing::debug!(session = %controller.id, "shared surface ended by platform");
                    controller.stop_screen_share();
                }
            }
        });
        task.abort_handle()
    }

    fn mark_changed(&self) {
        self.changed.send_replace(());
    }
}
