//! Glue between the frame loop and the engine runtime.

use anyhow::Result;

use skitter_engine::coords::Vec2;
use skitter_engine::core::{App, AppControl, FrameCtx};
use skitter_engine::input::InputState;
use skitter_engine::paint::Color;
use skitter_engine::render::{ShaderProgram, SpriteRenderer};
use skitter_engine::window::Runtime;

use crate::config::GameConfig;
use crate::controls::{FrameKeys, KeySource};
use crate::frame_loop::{FrameLoop, FrameTarget, LoopState};

/// How often the sprite position is written to the debug log, in frames.
const POSITION_LOG_INTERVAL: u64 = 300;

pub struct Game {
    frame_loop: FrameLoop,
    renderer: SpriteRenderer,
}

impl Game {
    pub fn new(config: &GameConfig, program: ShaderProgram) -> Self {
        Self {
            frame_loop: FrameLoop::from_config(config),
            renderer: SpriteRenderer::new(program, config.sprite_half_extent_ndc),
        }
    }
}

/// Runs one loop tick and reports it in engine terms.
fn step<K, T>(frame_loop: &mut FrameLoop, keys: &K, target: &mut T) -> AppControl
where
    K: KeySource,
    T: FrameTarget,
{
    match frame_loop.tick(keys, target) {
        LoopState::Running => AppControl::Continue,
        LoopState::Closing => AppControl::Exit,
    }
}

impl App for Game {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let input: &InputState = ctx.input;
        let keys = FrameKeys {
            state: input,
            frame: ctx.input_frame,
        };

        if ctx.time.frame_index % POSITION_LOG_INTERVAL == 0 {
            let p = self.frame_loop.position();
            log::debug!(
                "frame {} dt {:.4}s position ({:.1}, {:.1})",
                ctx.time.frame_index,
                ctx.time.dt,
                p.x,
                p.y
            );
        }

        let mut target = GpuTarget {
            ctx,
            renderer: &mut self.renderer,
            pending: PendingFrame::new(self.frame_loop.clear_color()),
        };

        step(&mut self.frame_loop, &keys, &mut target)
    }

    fn on_close_requested(&mut self) {
        self.frame_loop.request_close();
    }
}

/// Clear color and sprite offset collected for the next present.
#[derive(Debug, Copy, Clone, PartialEq)]
struct PendingFrame {
    clear: Color,
    offset: Option<Vec2>,
}

impl PendingFrame {
    fn new(clear: Color) -> Self {
        Self { clear, offset: None }
    }

    /// Hands out this frame's requests. The clear color carries over to the
    /// next frame; the sprite must be drawn again.
    fn take(&mut self) -> (Color, Option<Vec2>) {
        (self.clear, self.offset.take())
    }
}

/// Records and presents a frame through the engine on `present`.
struct GpuTarget<'c, 'a, 'w> {
    ctx: &'c mut FrameCtx<'a, 'w>,
    renderer: &'c mut SpriteRenderer,
    pending: PendingFrame,
}

impl FrameTarget for GpuTarget<'_, '_, '_> {
    fn clear(&mut self, color: Color) {
        self.pending.clear = color;
    }

    fn draw_sprite(&mut self, offset: Vec2) {
        self.pending.offset = Some(offset);
    }

    fn present(&mut self) -> AppControl {
        let (clear, offset) = self.pending.take();
        let renderer = &mut *self.renderer;

        self.ctx.render(clear, |rctx, target| {
            if let Some(offset) = offset {
                renderer.render(rctx, target, offset);
            }
        })
    }
}

/// Opens the window and runs the game until it closes.
pub fn run(config: GameConfig, program: ShaderProgram) -> Result<()> {
    let game = Game::new(&config, program);
    Runtime::run(config.window, config.gpu, game)
}

/// Reports a fatal error once and turns the outcome into a process status.
pub fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e:#}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::tests::Held;
    use crate::frame_loop::tests::{Call, Recorder};
    use skitter_engine::input::Key;

    fn game() -> Game {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../shader");
        let program = ShaderProgram::load(
            format!("{dir}/sprite.vert.wgsl"),
            format!("{dir}/sprite.frag.wgsl"),
        )
        .unwrap();
        Game::new(&GameConfig::default(), program)
    }

    // ── game ──────────────────────────────────────────────────────────────

    #[test]
    fn running_frame_continues_and_draws() {
        let mut game = game();
        let mut target = Recorder::default();
        let control = step(&mut game.frame_loop, &Held::keys(&[Key::D]), &mut target);
        assert_eq!(control, AppControl::Continue);
        assert_eq!(
            target.calls,
            vec![
                Call::Clear(GameConfig::default().clear_color),
                Call::Draw(Vec2::zero()),
                Call::Present
            ]
        );
    }

    #[test]
    fn window_close_exits_on_the_next_frame_without_drawing() {
        let mut game = game();
        let mut target = Recorder::default();
        game.on_close_requested();

        let control = step(&mut game.frame_loop, &Held::keys(&[Key::D]), &mut target);
        assert_eq!(control, AppControl::Exit);
        assert_eq!(game.frame_loop.tick(&Held::keys(&[]), &mut target), LoopState::Closing);
        assert!(target.calls.is_empty());
        assert_eq!(game.frame_loop.position(), Vec2::zero());
    }

    #[test]
    fn escape_exits_the_game() {
        let mut game = game();
        let mut target = Recorder::default();
        let control = step(&mut game.frame_loop, &Held::keys(&[Key::Escape]), &mut target);
        assert_eq!(control, AppControl::Exit);
        assert!(target.calls.is_empty());
    }

    // ── pending frame ─────────────────────────────────────────────────────

    #[test]
    fn unset_clear_presents_the_configured_color() {
        let green = GameConfig::default().clear_color;
        let mut pending = PendingFrame::new(green);
        pending.offset = Some(Vec2::new(1.6, 0.0));

        assert_eq!(pending.take(), (green, Some(Vec2::new(1.6, 0.0))));
        assert_eq!(pending.take(), (green, None));
    }

    #[test]
    fn explicit_clear_replaces_the_configured_color() {
        let mut pending = PendingFrame::new(GameConfig::default().clear_color);
        pending.clear = Color::opaque(1.0, 0.0, 0.0);
        assert_eq!(pending.take().0, Color::opaque(1.0, 0.0, 0.0));
    }

    // ── exit status ───────────────────────────────────────────────────────

    #[test]
    fn clean_run_exits_zero() {
        assert_eq!(exit_status(Ok(())), 0);
    }

    #[test]
    fn startup_error_exits_nonzero() {
        let err = anyhow::anyhow!("no adapter").context("GPU initialization failed for window");
        assert_eq!(exit_status(Err(err)), 1);
    }
}
