//! Media handles and track state

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// Where the displayed video currently comes from.
///
/// At most one source is active while a session is live; a session that lost
/// its camera to a denied permission has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    Camera,
    Screen,
}

/// Kind of an individual track inside a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Enabled/disabled flags for the local camera tracks.
///
/// These flags survive a screen share: toggling while sharing mutates the
/// retained camera track so that stopping the share restores the exact
/// pre-share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackState {
    pub video_enabled: bool,
    pub audio_enabled: bool,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            video_enabled: true,
            audio_enabled: true,
        }
    }
}

/// An acquired, ownable reference to one or more live media tracks.
///
/// Handles are created by a [`SourceProvider`](crate::media::SourceProvider)
/// and owned exclusively by the session controller. The view only ever sees
/// the handle id inside a rendered snapshot. A handle must be released back
/// to its provider before being replaced and on session teardown; anything
/// else leaks the platform's "in use" indicator and the hardware lock.
#[derive(Debug)]
pub struct MediaHandle {
    pub id: Uuid,
    pub source: MediaSource,
    pub has_video: bool,
    pub has_audio: bool,
    ended: watch::Receiver<bool>,
}

impl MediaHandle {
    /// Create a handle together with the signal its provider uses to report
    /// that the underlying surface ended (e.g. the user stopped sharing from
    /// the native picker UI).
    pub fn new(id: Uuid, source: MediaSource, has_video: bool, has_audio: bool) -> (Self, EndedSignal) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                id,
                source,
                has_video,
                has_audio,
                ended: rx,
            },
            EndedSignal { tx },
        )
    }

    pub fn has_track(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Video => self.has_video,
            TrackKind::Audio => self.has_audio,
        }
    }

    /// Subscribe to the end-of-surface notification for this handle.
    pub fn ended(&self) -> watch::Receiver<bool> {
        self.ended.clone()
    }
}

/// Provider-side trigger for a handle's end-of-surface notification
#[derive(Debug)]
pub struct EndedSignal {
    tx: watch::Sender<bool>,
}

impl EndedSignal {
    /// Report the surface as ended. Subsequent calls are harmless.
    pub fn raise(&self) {
        let _ = self.tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_state_defaults_to_both_enabled() {
        let state = TrackState::default();
        assert!(state.video_enabled);
        assert!(state.audio_enabled);
    }

    #[tokio::test]
    async fn ended_signal_reaches_subscribers() {
        let (handle, signal) = MediaHandle::new(Uuid::new_v4(), MediaSource::Screen, true, false);
        let mut rx = handle.ended();
        assert!(!*rx.borrow());
        signal.raise();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[test]
    fn handle_reports_present_tracks() {
        let (handle, _signal) = MediaHandle::new(Uuid::new_v4(), MediaSource::Camera, true, false);
        assert!(handle.has_track(TrackKind::Video));
        assert!(!handle.has_track(TrackKind::Audio));
    }
}
