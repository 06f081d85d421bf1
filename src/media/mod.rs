//! Media source abstraction: handles and the device provider boundary

pub mod handle;
pub mod provider;

pub use handle::{EndedSignal, MediaHandle, MediaSource, TrackKind, TrackState};
pub use provider::SourceProvider;
