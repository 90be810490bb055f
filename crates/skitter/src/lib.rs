//! Skitter: move a single sprite around a fixed window.
//!
//! Game rules live here; window, GPU and input plumbing come from
//! `skitter-engine`.

pub mod app;
pub mod config;
pub mod controls;
pub mod frame_loop;
pub mod player;

pub use app::{exit_status, run, Game};
pub use config::GameConfig;
