//! Wire protocol between the session page and the server
//!
//! Everything crossing the session websocket is one of these serde types,
//! JSON-encoded. The browser is both the view and the capture platform, so
//! traffic flows in two directions: user commands and acquisition outcomes
//! come in, state snapshots and device orders go out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ChatMessage;
use crate::media::{MediaSource, TrackKind, TrackState};
use crate::session::SessionPhase;

/// Messages sent by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ToggleVideo,
    ToggleAudio,
    StartScreenShare,
    StopScreenShare,
    /// The platform reported the shared surface ended (native "stop sharing")
    ScreenEnded { handle_id: Uuid },
    Leave,
    CopySessionId,
    Chat { text: String },
    /// Outcome of a previously requested device acquisition
    AcquireResult {
        request_id: Uuid,
        outcome: AcquireOutcome,
    },
}

/// Browser-reported result of an acquisition request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AcquireOutcome {
    /// Stream obtained; flags report which tracks it actually carries
    Granted { video: bool, audio: bool },
    PermissionDenied,
    DeviceUnavailable,
    UserCancelled,
}

/// Messages sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full render state; sent after every controller transition
    State { session: SessionSnapshot },
    /// Ask the browser to run `getUserMedia` with these constraints
    AcquireCamera {
        request_id: Uuid,
        video: bool,
        audio: bool,
    },
    /// Ask the browser to run `getDisplayMedia`
    AcquireScreen { request_id: Uuid },
    /// Sync one live track's enabled flag
    SetTrackEnabled {
        handle_id: Uuid,
        kind: TrackKind,
        enabled: bool,
    },
    /// Stop every track of the stream behind this handle
    ReleaseHandle { handle_id: Uuid },
    /// Session id for a best-effort clipboard write
    SessionId { id: String },
    /// Echo of a locally appended chat message
    Chat { message: ChatMessage },
}

/// Read-only controller state handed to the view for rendering.
///
/// The view never touches session fields directly; it renders from this and
/// issues commands back through [`ClientMessage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: SessionPhase,
    /// Currently displayed source, or `None` when no handle is held
    pub source: Option<MediaSource>,
    pub tracks: TrackState,
    /// Camera acquisition failed; render the disabled-camera placeholder
    pub no_media: bool,
    /// Transient "copied" acknowledgement, auto-expires server-side
    pub copied: bool,
    pub participants: u32,
    /// Handle whose stream the local tile should display
    pub display_handle: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_commands_parse_from_page_json() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"chat","text":"hi"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Chat { ref text } if text == "hi"));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"acquire_result",
                "request_id":"9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d",
                "outcome":{"outcome":"granted","video":true,"audio":false}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::AcquireResult { outcome, .. } => {
                assert!(matches!(outcome, AcquireOutcome::Granted { video: true, audio: false }));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn server_messages_tag_by_type() {
        let json = serde_json::to_string(&ServerMessage::SessionId { id: "abc".into() }).unwrap();
        assert!(json.contains(r#""type":"session_id""#));
    }
}
