//! Coordinate types shared by the renderer and game code.
//!
//! Game space:
//! - logical pixels (DPI-aware)
//! - origin at the window center
//! - +X right, +Y up (matches NDC orientation)

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
