//! File-based bridge to the desktop overlay helper.

pub mod channel;
pub mod helper;
pub mod listener;

pub use channel::{HudCommand, OverlayChannel, HIDDEN};
pub use helper::HudHelper;
pub use listener::{command_loop, notes_loop};
