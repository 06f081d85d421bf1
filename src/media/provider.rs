//! Device source provider boundary

use async_trait::async_trait;

use crate::error::MediaError;
use crate::media::handle::{MediaHandle, TrackKind};

/// Platform boundary for acquiring and releasing capture devices.
///
/// Acquisition is asynchronous and may take arbitrary wall-clock time while
/// the platform shows its permission prompt or source picker; callers must
/// tolerate other session events arriving in the meantime. Results are
/// explicit: a usable handle or a [`MediaError`], never a panic or a thrown
/// platform exception.
///
/// The production implementation is [`BrowserBridge`], which forwards these
/// calls over the session websocket to the browser that owns the real
/// devices. Tests script outcomes through a mock.
///
/// [`BrowserBridge`]: crate::ui::bridge::BrowserBridge
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Acquire a camera + microphone handle with the given initial track
    /// flags. Triggers the platform permission prompt when not yet granted.
    async fn acquire_camera(
        &self,
        video_enabled: bool,
        audio_enabled: bool,
    ) -> std::result::Result<MediaHandle, MediaError>;

    /// Acquire a screen-capture handle via the platform's source picker.
    async fn acquire_screen(&self) -> std::result::Result<MediaHandle, MediaError>;

    /// Propagate a track's enabled flag to the live track. Best-effort and
    /// fire-and-forget; a handle without that track ignores the call.
    fn set_track_enabled(&self, handle: &MediaHandle, kind: TrackKind, enabled: bool);

    /// Stop every track in the handle. Idempotent: releasing an already
    /// released handle does nothing. After this call no platform "in use"
    /// indicator remains attributable to the handle.
    fn release(&self, handle: &MediaHandle);
}
