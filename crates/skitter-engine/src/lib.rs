//! Skitter engine crate.
//!
//! Owns the window, GPU and input plumbing used by the game crate.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
