//! Satellite tracking controller for a two-axis mount.
//!
//! The loop in [`tracking`] points the mount at the selected satellite
//! every cycle and lets the operator change target through an
//! encoder-driven [`menu`] on a 20x4 character display.

pub mod actuator;
pub mod clock;
pub mod config;
pub mod direction;
pub mod display;
pub mod encoder;
pub mod hardware;
pub mod menu;
pub mod model;
pub mod panel;
pub mod provider;
pub mod tracking;

pub use model::{SattrackError, SattrackResult};
pub use tracking::TrackingLoop;
