//! Session media-state management

pub mod controller;

pub use controller::{SessionController, SessionPhase};
