//! Motorized curtain drive
//!
//! Moves a percentage position smoothly between 0 and 100 under direction
//! commands, independent of frame rate, with auto-stop at the bounds.

use serde::{Deserialize, Serialize};

/// Percent of full range travelled per second. A full traverse takes
/// about 20 seconds regardless of frame rate.
pub const SPEED_PERCENT_PER_SEC: f32 = 5.0;

/// Commanded motion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Motion {
    /// Raising toward 100
    Up,
    /// Lowering toward 0
    Down,
    /// Holding position
    #[default]
    Stopped,
}

impl Motion {
    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Motion::Up => "Moving Up",
            Motion::Down => "Moving Down",
            Motion::Stopped => "Stopped",
        }
    }
}

/// Curtain drive state: continuous position plus commanded direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Curtain {
    position: f32,
    motion: Motion,
}

impl Curtain {
    /// Create a fully lowered, stopped curtain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in percent, always within [0, 100].
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Commanded motion.
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Whether the drive is currently advancing.
    pub fn is_moving(&self) -> bool {
        self.motion != Motion::Stopped
    }

    /// Command the curtain upward. No-op at the upper bound.
    pub fn up(&mut self) {
        if self.position >= 100.0 {
            return;
        }
        self.motion = Motion::Up;
    }

    /// Command the curtain downward. No-op at the lower bound.
    pub fn down(&mut self) {
        if self.position <= 0.0 {
            return;
        }
        self.motion = Motion::Down;
    }

    /// Halt the drive. No-op when already stopped.
    pub fn stop(&mut self) {
        if self.motion == Motion::Stopped {
            return;
        }
        self.motion = Motion::Stopped;
    }

    /// Advance one frame by `delta_time` seconds.
    ///
    /// Crossing a bound clamps to exactly 0/100 and auto-stops the drive.
    /// Returns true when the position changed.
    pub fn advance(&mut self, delta_time: f32) -> bool {
        let step = SPEED_PERCENT_PER_SEC * delta_time;
        match self.motion {
            Motion::Stopped => false,
            Motion::Up => {
                let next = self.position + step;
                if next >= 100.0 {
                    self.position = 100.0;
                    self.motion = Motion::Stopped;
                } else {
                    self.position = next;
                }
                true
            }
            Motion::Down => {
                let next = self.position - step;
                if next <= 0.0 {
                    self.position = 0.0;
                    self.motion = Motion::Stopped;
                } else {
                    self.position = next;
                }
                true
            }
        }
    }

    /// Reset to the fully lowered, stopped state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_stopped_does_not_move() {
        let mut curtain = Curtain::new();
        assert!(!curtain.advance(FRAME));
        assert_eq!(curtain.position(), 0.0);
    }

    #[test]
    fn test_up_advances_and_clamps() {
        let mut curtain = Curtain::new();
        curtain.up();
        assert_eq!(curtain.motion(), Motion::Up);

        // 25 simulated seconds is more than a full traverse
        for _ in 0..(25 * 60) {
            curtain.advance(FRAME);
            assert!(curtain.position() >= 0.0 && curtain.position() <= 100.0);
        }
        assert_eq!(curtain.position(), 100.0);
        assert_eq!(curtain.motion(), Motion::Stopped);
    }

    #[test]
    fn test_down_from_top_clamps_at_zero() {
        let mut curtain = Curtain::new();
        curtain.up();
        for _ in 0..(25 * 60) {
            curtain.advance(FRAME);
        }
        curtain.down();
        for _ in 0..(25 * 60) {
            curtain.advance(FRAME);
            assert!(curtain.position() >= 0.0);
        }
        assert_eq!(curtain.position(), 0.0);
        assert_eq!(curtain.motion(), Motion::Stopped);
    }

    #[test]
    fn test_up_at_top_is_noop() {
        let mut curtain = Curtain::new();
        curtain.up();
        for _ in 0..(25 * 60) {
            curtain.advance(FRAME);
        }
        curtain.up();
        assert_eq!(curtain.motion(), Motion::Stopped);
    }

    #[test]
    fn test_down_at_bottom_is_noop() {
        let mut curtain = Curtain::new();
        curtain.down();
        assert_eq!(curtain.motion(), Motion::Stopped);
        assert!(!curtain.advance(FRAME));
    }

    #[test]
    fn test_repeated_command_is_idempotent() {
        let mut curtain = Curtain::new();
        curtain.up();
        curtain.advance(FRAME);
        let first_step = curtain.position();
        curtain.up();
        curtain.advance(FRAME);
        let second_step = curtain.position() - first_step;
        // Same speed after the redundant command
        assert!((second_step - first_step).abs() < 1e-4);
        assert_eq!(curtain.motion(), Motion::Up);
    }

    #[test]
    fn test_stop_mid_travel_holds_position() {
        let mut curtain = Curtain::new();
        curtain.up();
        for _ in 0..60 {
            curtain.advance(FRAME);
        }
        curtain.stop();
        let held = curtain.position();
        assert!(held > 0.0 && held < 100.0);
        for _ in 0..60 {
            curtain.advance(FRAME);
        }
        assert_eq!(curtain.position(), held);
    }

    #[test]
    fn test_never_overshoots_clamp() {
        let mut curtain = Curtain::new();
        curtain.up();
        // Huge frame gap (e.g. a background tab) still lands exactly on 100
        curtain.advance(1000.0);
        assert_eq!(curtain.position(), 100.0);
        assert_eq!(curtain.motion(), Motion::Stopped);
    }
}
