//! Workstation stand-ins for the panel hardware.

pub mod actuators;
pub mod keyboard;
pub mod terminal;

pub use actuators::{FileActuator, LogActuator};
pub use keyboard::{spawn_keyboard_reader, KeyCommand};
pub use terminal::TerminalDisplay;
