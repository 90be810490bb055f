//! Keyboard controls: which keys move the sprite and which key quits.

use skitter_engine::coords::Vec2;
use skitter_engine::input::{InputFrame, InputState, Key};

/// One of the four movement directions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Order in which held keys are considered. Only the first held one moves.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector in game space (+Y up).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
        }
    }
}

/// Read-only view of the keyboard for one frame.
pub trait KeySource {
    /// Key is held right now.
    fn is_down(&self, key: Key) -> bool;

    /// Key went down at some point since the previous frame.
    fn was_pressed(&self, key: Key) -> bool {
        self.is_down(key)
    }
}

/// Engine input state paired with this frame's transitions.
pub struct FrameKeys<'a> {
    pub state: &'a InputState,
    pub frame: &'a InputFrame,
}

impl KeySource for FrameKeys<'_> {
    fn is_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.frame.key_pressed(key) || self.state.key_down(key)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyBindings {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub exit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: Key::A,
            right: Key::D,
            up: Key::W,
            down: Key::S,
            exit: Key::Escape,
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, dir: Direction) -> Key {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Picks the movement for this tick: the first held key in
    /// [`Direction::PRIORITY`] order, or `None` if no movement key is held.
    pub fn sample(&self, keys: &impl KeySource) -> Option<Direction> {
        Direction::PRIORITY
            .into_iter()
            .find(|&dir| keys.is_down(self.key_for(dir)))
    }

    pub fn exit_requested(&self, keys: &impl KeySource) -> bool {
        keys.was_pressed(self.exit)
    }
}
