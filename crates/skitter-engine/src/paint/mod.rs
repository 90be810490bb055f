//! Color model shared by the game and renderers.

pub mod color;

pub use color::Color;
