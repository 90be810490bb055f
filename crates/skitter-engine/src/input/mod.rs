//! Input subsystem.
//!
//! The public API does not expose winit types; the runtime translates
//! platform events into `InputEvent`s and game code polls `InputState`.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
