//! # Mini Meet
//!
//! Self-hosted meeting rooms with local camera/screen capture control and
//! ephemeral per-view chat.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            BROWSER                               │
//! │   getUserMedia / getDisplayMedia / clipboard / video grid        │
//! └───────────────▲──────────────────────────────┬───────────────────┘
//!                 │ acquire / release / sync     │ commands, chat
//!                 │ (ServerMessage)              │ (ClientMessage)
//! ┌───────────────┴──────────────────────────────▼───────────────────┐
//! │                 WebSocket session channel (ui::websocket)        │
//! │                                                                  │
//! │   ┌────────────────────┐  SourceProvider  ┌────────────────────┐ │
//! │   │   BrowserBridge    │◄─────────────────│ SessionController  │ │
//! │   │   (ui::bridge)     │                  │ (session, the core)│ │
//! │   └────────────────────┘                  └─────────┬──────────┘ │
//! │                                                     │ snapshots  │
//! │   ┌────────────────────┐                            ▼            │
//! │   │      ChatLog       │                   state watch channel   │
//! │   │      (chat)        │                                         │
//! │   └────────────────────┘                                         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session controller owns the media device lifecycle: camera/microphone
//! acquisition, per-track mute flags, the mutually-exclusive camera/screen
//! source swap, and teardown. The browser owns the real capture devices; the
//! [`ui::bridge::BrowserBridge`] forwards acquisition and release across the
//! websocket and reports permission outcomes back as explicit results. No
//! media or chat ever leaves the local view: remote participant tiles are
//! static placeholders.

pub mod chat;
pub mod config;
pub mod error;
pub mod media;
pub mod protocol;
pub mod session;
pub mod ui;

pub use error::{Error, MediaError, Result};

/// Application-wide constants
pub mod constants {
    /// Default HTTP port for the web UI
    pub const DEFAULT_HTTP_PORT: u16 = 8080;

    /// Default bind address for the web UI
    pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

    /// How long the "copied" acknowledgement stays visible, in milliseconds
    pub const DEFAULT_COPIED_ACK_MS: u64 = 2_000;

    /// Sender label attached to locally appended chat messages
    pub const LOCAL_SENDER: &str = "local";

    /// Participant count shown while the roster is a placeholder
    pub const PLACEHOLDER_PARTICIPANTS: u32 = 1;
}
