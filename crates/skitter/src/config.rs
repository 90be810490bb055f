use std::path::PathBuf;

use skitter_engine::coords::Vec2;
use skitter_engine::device::GpuInit;
use skitter_engine::paint::Color;
use skitter_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::controls::KeyBindings;
use crate::player::Bounds;

/// Window width and height in logical pixels.
pub const WINDOW_SIZE: f64 = 640.0;

/// Per-tick movement as a fraction of the window half-extent (NDC units).
pub const PLAYER_SPEED_NDC: f32 = 0.005;

/// Sprite half-width in NDC units.
pub const SPRITE_HALF_EXTENT_NDC: f32 = 0.1;

/// Everything the game needs to start. There is no config file; callers
/// tweak fields on `GameConfig::default()`.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window: RuntimeConfig,
    pub gpu: GpuInit,

    /// Sprite half-width in NDC; also decides how far it may travel.
    pub sprite_half_extent_ndc: f32,

    /// Distance moved per tick, in NDC.
    pub speed_ndc: f32,

    pub clear_color: Color,
    pub bindings: KeyBindings,

    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: RuntimeConfig {
                title: "OpenGL 2D Game".to_string(),
                size: LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE),
                resizable: false,
            },
            gpu: GpuInit {
                // Colors are authored for a non-sRGB framebuffer.
                prefer_srgb: false,
                ..GpuInit::default()
            },
            sprite_half_extent_ndc: SPRITE_HALF_EXTENT_NDC,
            speed_ndc: PLAYER_SPEED_NDC,
            clear_color: Color::opaque(0.0, 0.725, 0.098),
            bindings: KeyBindings::default(),
            vertex_shader: PathBuf::from("shader/sprite.vert.wgsl"),
            fragment_shader: PathBuf::from("shader/sprite.frag.wgsl"),
        }
    }
}

impl GameConfig {
    /// Distance from the window center to its edges, in logical pixels.
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(
            (self.window.size.width * 0.5) as f32,
            (self.window.size.height * 0.5) as f32,
        )
    }

    /// Movement bounds in logical pixels.
    ///
    /// The window is square, so one symmetric limit serves both axes; the
    /// narrower axis wins otherwise.
    pub fn bounds(&self) -> Bounds {
        let half = self.half_extent();
        let half = half.x.min(half.y);
        Bounds::new(
            half - half * self.sprite_half_extent_ndc,
            half * self.speed_ndc,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_the_demo() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.window.title, "OpenGL 2D Game");
        assert_eq!(cfg.window.size, LogicalSize::new(640.0, 640.0));
        assert!(!cfg.window.resizable);
        assert_eq!(cfg.gpu.present_mode, GpuInit::default().present_mode);
    }

    #[test]
    fn default_bounds_are_derived_from_window_and_sprite() {
        let bounds = GameConfig::default().bounds();
        assert!((bounds.limit - 288.0).abs() < 1e-4);
        assert!((bounds.step - 1.6).abs() < 1e-4);
    }

    #[test]
    fn narrower_axis_decides_the_limit() {
        let mut cfg = GameConfig::default();
        cfg.window.size = LogicalSize::new(800.0, 400.0);
        assert!((cfg.bounds().limit - 180.0).abs() < 1e-4);
    }

    #[test]
    fn default_shader_paths_are_relative() {
        let cfg = GameConfig::default();
        assert!(cfg.vertex_shader.is_relative());
        assert!(cfg.fragment_shader.is_relative());
    }
}
