//! Browser-backed device source provider
//!
//! The browser owns the real capture devices, so acquisition crosses the
//! session websocket: the bridge sends an acquire request, parks the call on
//! a oneshot, and the page answers with an [`AcquireOutcome`] once the
//! platform permission prompt resolves. Release and track syncs are
//! fire-and-forget orders in the other direction.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::MediaError;
use crate::media::{EndedSignal, MediaHandle, MediaSource, SourceProvider, TrackKind};
use crate::protocol::{AcquireOutcome, ServerMessage};

/// [`SourceProvider`] implementation bridging to the connected browser
pub struct BrowserBridge {
    outbound: mpsc::UnboundedSender<ServerMessage>,
    pending: Mutex<HashMap<Uuid, oneshot::Sender<AcquireOutcome>>>,
    /// Ended triggers for live handles, keyed by handle id
    ended: Mutex<HashMap<Uuid, EndedSignal>>,
    /// Handles already released; makes release idempotent
    released: Mutex<HashSet<Uuid>>,
}

impl BrowserBridge {
    pub fn new(outbound: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
            ended: Mutex::new(HashMap::new()),
            released: Mutex::new(HashSet::new()),
        }
    }

    /// Deliver the browser's answer to a pending acquisition. Unknown or
    /// already resolved request ids are ignored.
    pub fn resolve(&self, request_id: Uuid, outcome: AcquireOutcome) {
        if let Some(tx) = self.pending.lock().remove(&request_id) {
            let _ = tx.send(outcome);
        }
    }

    /// Fail every pending acquisition. Called when the socket closes so no
    /// acquisition task waits forever on an answer that cannot arrive;
    /// dropping the parked senders surfaces as `DeviceUnavailable`.
    pub fn close(&self) {
        self.pending.lock().clear();
    }

    /// The page reported that the surface behind this handle ended.
    pub fn screen_ended(&self, handle_id: Uuid) {
        if let Some(signal) = self.ended.lock().get(&handle_id) {
            signal.raise();
        }
    }

    async fn acquire(
        &self,
        source: MediaSource,
        request: ServerMessage,
        request_id: Uuid,
    ) -> Result<MediaHandle, MediaError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id, tx);

        if self.outbound.send(request).is_err() {
            // Socket already gone; nothing will ever answer.
            self.pending.lock().remove(&request_id);
            return Err(MediaError::DeviceUnavailable);
        }

        match rx.await {
            Ok(AcquireOutcome::Granted { video, audio }) => {
                // The page keys its streams by request id, so the handle
                // reuses it and snapshots stay directly renderable.
                let (handle, signal) = MediaHandle::new(request_id, source, video, audio);
                self.ended.lock().insert(handle.id, signal);
                Ok(handle)
            }
            Ok(AcquireOutcome::PermissionDenied) => Err(MediaError::PermissionDenied),
            Ok(AcquireOutcome::DeviceUnavailable) => Err(MediaError::DeviceUnavailable),
            Ok(AcquireOutcome::UserCancelled) => Err(MediaError::UserCancelled),
            Err(_) => Err(MediaError::DeviceUnavailable),
        }
    }
}

#[async_trait]
impl SourceProvider for BrowserBridge {
    async fn acquire_camera(
        &self,
        video_enabled: bool,
        audio_enabled: bool,
    ) -> Result<MediaHandle, MediaError> {
        let request_id = Uuid::new_v4();
        self.acquire(
            MediaSource::Camera,
            ServerMessage::AcquireCamera {
                request_id,
                video: video_enabled,
                audio: audio_enabled,
            },
            request_id,
        )
        .await
    }

    async fn acquire_screen(&self) -> Result<MediaHandle, MediaError> {
        let request_id = Uuid::new_v4();
        self.acquire(
            MediaSource::Screen,
            ServerMessage::AcquireScreen { request_id },
            request_id,
        )
        .await
    }

    fn set_track_enabled(&self, handle: &MediaHandle, kind: TrackKind, enabled: bool) {
        let _ = self.outbound.send(ServerMessage::SetTrackEnabled {
            handle_id: handle.id,
            kind,
            enabled,
        });
    }

    fn release(&self, handle: &MediaHandle) {
        if self.released.lock().insert(handle.id) {
            self.ended.lock().remove(&handle.id);
            let _ = self.outbound.send(ServerMessage::ReleaseHandle {
                handle_id: handle.id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge() -> (BrowserBridge, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (BrowserBridge::new(tx), rx)
    }

    #[tokio::test]
    async fn granted_camera_yields_handle_keyed_by_request() {
        let (bridge, mut rx) = bridge();
        let bridge = std::sync::Arc::new(bridge);

        let pending = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.acquire_camera(true, true).await })
        };
        let request_id = match rx.recv().await.unwrap() {
            ServerMessage::AcquireCamera { request_id, video, audio } => {
                assert!(video && audio);
                request_id
            }
            other => panic!("unexpected message: {other:?}"),
        };
        bridge.resolve(
            request_id,
            AcquireOutcome::Granted { video: true, audio: true },
        );

        let handle = pending.await.unwrap().unwrap();
        assert_eq!(handle.id, request_id);
        assert_eq!(handle.source, MediaSource::Camera);
        assert!(handle.has_video && handle.has_audio);
    }

    #[tokio::test]
    async fn denied_acquisition_maps_to_media_error() {
        let (bridge, mut rx) = bridge();
        let bridge = std::sync::Arc::new(bridge);

        let pending = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.acquire_camera(true, false).await })
        };
        let request_id = match rx.recv().await.unwrap() {
            ServerMessage::AcquireCamera { request_id, .. } => request_id,
            other => panic!("unexpected message: {other:?}"),
        };
        bridge.resolve(request_id, AcquireOutcome::PermissionDenied);

        let err = pending.await.unwrap().unwrap_err();
        assert_eq!(err, MediaError::PermissionDenied);
    }

    #[tokio::test]
    async fn release_is_idempotent_on_the_wire() {
        let (bridge, mut rx) = bridge();
        let bridge = std::sync::Arc::new(bridge);

        let pending = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.acquire_screen().await })
        };
        let request_id = match rx.recv().await.unwrap() {
            ServerMessage::AcquireScreen { request_id } => request_id,
            other => panic!("unexpected message: {other:?}"),
        };
        bridge.resolve(
            request_id,
            AcquireOutcome::Granted { video: true, audio: false },
        );
        let handle = pending.await.unwrap().unwrap();

        bridge.release(&handle);
        bridge.release(&handle);

        match rx.recv().await.unwrap() {
            ServerMessage::ReleaseHandle { handle_id } => assert_eq!(handle_id, handle.id),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_fails_pending_acquisitions() {
        let (bridge, mut rx) = bridge();
        let bridge = std::sync::Arc::new(bridge);

        let pending = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.acquire_camera(true, true).await })
        };
        // The view went away mid-permission-prompt: the order is out but no
        // answer will ever come back.
        match rx.recv().await.unwrap() {
            ServerMessage::AcquireCamera { .. } => {}
            other => panic!("unexpected message: {other:?}"),
        }
        bridge.close();

        let result = tokio::time::timeout(std::time::Duration::from_millis(200), pending)
            .await
            .expect("acquisition must resolve once the bridge closes");
        assert_eq!(result.unwrap().unwrap_err(), MediaError::DeviceUnavailable);
    }

    #[tokio::test]
    async fn closed_socket_reports_device_unavailable() {
        let (bridge, rx) = bridge();
        drop(rx);

        let err = bridge.acquire_camera(true, true).await.unwrap_err();
        assert_eq!(err, MediaError::DeviceUnavailable);
    }
}
