//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and records into
//! a `RenderTarget` supplied by the frame.
//!
//! Convention:
//! - positions handed to renderers are logical pixels from the window center, +Y up
//! - vertex shaders receive a transform uniform that maps to NDC

mod ctx;
pub mod shader;
pub mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{ShaderError, ShaderProgram, ShaderSource, ShaderStage};
pub use sprite::{SpriteRenderer, SpriteVertex};
