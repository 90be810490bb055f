//! The per-frame update cycle.
//!
//! Each running tick: clear, draw at the current position, apply input,
//! apply the boundary recoil, present. Drawing is routed through
//! [`FrameTarget`] so the loop is independent of the GPU backend.

use skitter_engine::coords::Vec2;
use skitter_engine::core::AppControl;
use skitter_engine::paint::Color;

use crate::config::GameConfig;
use crate::controls::{KeyBindings, KeySource};
use crate::player::{Bounds, Player};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// Terminal. No further frames are drawn.
    Closing,
}

/// Where a frame is drawn.
pub trait FrameTarget {
    fn clear(&mut self, color: Color);

    /// Draws the sprite `offset` logical px from the window center.
    fn draw_sprite(&mut self, offset: Vec2);

    /// Finishes the frame. `Exit` reports an unrecoverable presentation error.
    fn present(&mut self) -> AppControl;
}

pub struct FrameLoop {
    state: LoopState,
    player: Player,
    bounds: Bounds,
    bindings: KeyBindings,
    clear_color: Color,
    close_requested: bool,
}

impl FrameLoop {
    pub fn new(bounds: Bounds, bindings: KeyBindings, clear_color: Color) -> Self {
        Self {
            state: LoopState::Running,
            player: Player::new(),
            bounds,
            bindings,
            clear_color,
            close_requested: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.bounds(), config.bindings, config.clear_color)
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn position(&self) -> Vec2 {
        self.player.position
    }

    /// Close signal from outside the keyboard (e.g. the window close button).
    /// Takes effect on the next tick.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Runs one tick and returns the resulting state.
    pub fn tick<K, T>(&mut self, keys: &K, target: &mut T) -> LoopState
    where
        K: KeySource,
        T: FrameTarget,
    {
        if self.state == LoopState::Closing {
            return self.state;
        }

        if self.close_requested || self.bindings.exit_requested(keys) {
            log::info!("exit requested; closing");
            self.state = LoopState::Closing;
            return self.state;
        }

        target.clear(self.clear_color);
        target.draw_sprite(self.player.position);

        if let Some(dir) = self.bindings.sample(keys) {
            self.player.advance(dir, self.bounds.step);
        }
        self.bounds.clamp(&mut self.player.position);

        if target.present() == AppControl::Exit {
            log::error!("presentation failed; closing");
            self.state = LoopState::Closing;
        }

        self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::controls::tests::Held;
    use skitter_engine::input::Key;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Clear(Color),
        Draw(Vec2),
        Present,
    }

    /// Frame target that records every call, for tests.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub calls: Vec<Call>,
        pub fail_present: bool,
    }

    impl FrameTarget for Recorder {
        fn clear(&mut self, color: Color) {
            self.calls.push(Call::Clear(color));
        }

        fn draw_sprite(&mut self, offset: Vec2) {
            self.calls.push(Call::Draw(offset));
        }

        fn present(&mut self) -> AppControl {
            self.calls.push(Call::Present);
            if self.fail_present { AppControl::Exit } else { AppControl::Continue }
        }
    }

    const GREEN: Color = Color::opaque(0.0, 0.725, 0.098);

    fn frame_loop() -> FrameLoop {
        FrameLoop::new(Bounds::new(75.0, 5.0), KeyBindings::default(), GREEN)
    }

    // ── running ───────────────────────────────────────────────────────────

    #[test]
    fn starts_running_at_the_origin() {
        let mut fl = frame_loop();
        assert_eq!(fl.position(), Vec2::zero());
        assert_eq!(fl.tick(&Held::keys(&[]), &mut Recorder::default()), LoopState::Running);
    }

    #[test]
    fn tick_order_is_clear_draw_present() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        assert_eq!(fl.tick(&Held::keys(&[]), &mut target), LoopState::Running);
        assert_eq!(
            target.calls,
            vec![Call::Clear(GREEN), Call::Draw(Vec2::zero()), Call::Present]
        );
    }

    #[test]
    fn draw_uses_the_position_from_before_this_ticks_input() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        let right = Held::keys(&[Key::D]);

        fl.tick(&right, &mut target);
        fl.tick(&right, &mut target);

        let draws: Vec<_> = target
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![Vec2::zero(), Vec2::new(5.0, 0.0)]);
        assert_eq!(fl.position(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn no_keys_holds_position() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        for _ in 0..10 {
            fl.tick(&Held::keys(&[]), &mut target);
        }
        assert_eq!(fl.position(), Vec2::zero());
    }

    #[test]
    fn one_direction_per_tick() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        fl.tick(&Held::keys(&[Key::W, Key::D]), &mut target);
        assert_eq!(fl.position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn holding_up_oscillates_at_the_top_edge() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        let up = Held::keys(&[Key::W]);
        for _ in 0..100 {
            fl.tick(&up, &mut target);
            let y = fl.position().y;
            assert!(y <= 75.0 + 5.0);
        }
        let y = fl.position().y;
        assert!(y <= 75.0 && y >= 70.0);
    }

    // ── closing ───────────────────────────────────────────────────────────

    #[test]
    fn exit_key_closes_in_the_same_tick_without_drawing() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        assert_eq!(fl.tick(&Held::keys(&[Key::Escape, Key::D]), &mut target), LoopState::Closing);
        assert!(target.calls.is_empty());
        assert_eq!(fl.position(), Vec2::zero());
    }

    #[test]
    fn closing_is_terminal() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        fl.tick(&Held::keys(&[Key::Escape]), &mut target);
        assert_eq!(fl.tick(&Held::keys(&[]), &mut target), LoopState::Closing);
        assert_eq!(fl.tick(&Held::keys(&[Key::D]), &mut target), LoopState::Closing);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn tapped_exit_key_still_closes() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        let mut keys = Held::default();
        keys.tapped.insert(Key::Escape);
        assert_eq!(fl.tick(&keys, &mut target), LoopState::Closing);
    }

    #[test]
    fn external_close_request_is_honored_next_tick() {
        let mut fl = frame_loop();
        let mut target = Recorder::default();
        fl.tick(&Held::keys(&[]), &mut target);
        fl.request_close();
        assert_eq!(fl.tick(&Held::keys(&[]), &mut target), LoopState::Closing);
        assert_eq!(target.calls.len(), 3);
    }

    #[test]
    fn failed_present_closes() {
        let mut fl = frame_loop();
        let mut target = Recorder { fail_present: true, ..Recorder::default() };
        assert_eq!(fl.tick(&Held::keys(&[]), &mut target), LoopState::Closing);
    }
}
