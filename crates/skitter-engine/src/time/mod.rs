//! Frame timing.
//!
//! The runtime owns one `FrameClock` and ticks it once per presented frame.
//! Game movement is per-tick, so `FrameTime` is informational (logging, pacing checks).

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
