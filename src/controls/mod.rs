//! User-facing room controls
//!
//! Holds the control-panel state: lighting brightness (with last-level
//! memory for the on/off buttons), privacy glass, meeting screens, and the
//! curtain drive.

mod curtain;

pub use curtain::{Curtain, Motion, SPEED_PERCENT_PER_SEC};

use serde::{Deserialize, Serialize};

/// Lighting brightness control with last-non-zero memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightControl {
    brightness: f32,
    last_brightness: f32,
}

impl Default for LightControl {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            last_brightness: 100.0,
        }
    }
}

impl LightControl {
    /// Current brightness in percent [0, 100].
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Whether the lights are fully off.
    pub fn is_off(&self) -> bool {
        self.brightness <= 0.0
    }

    /// Set brightness directly (slider). Non-zero levels refresh the memory.
    pub fn set_brightness(&mut self, value: f32) {
        self.brightness = value.clamp(0.0, 100.0);
        if self.brightness > 0.0 {
            self.last_brightness = self.brightness;
        }
    }

    /// Restore the last non-zero level. No-op unless the lights are off.
    pub fn turn_on(&mut self) {
        if self.brightness == 0.0 {
            self.brightness = if self.last_brightness > 0.0 {
                self.last_brightness
            } else {
                100.0
            };
        }
    }

    /// Remember the current level and go dark. No-op when already off.
    pub fn turn_off(&mut self) {
        if self.brightness > 0.0 {
            self.last_brightness = self.brightness;
            self.brightness = 0.0;
        }
    }
}

/// All control-panel state for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlState {
    /// Lighting brightness + memory
    pub lights: LightControl,
    /// Privacy glass engaged
    pub privacy: bool,
    /// Meeting screens active
    pub meeting: bool,
    /// Curtain drive
    pub curtain: Curtain,
}

impl ControlState {
    /// Create the default control state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything, as a pipeline reload does.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lights_off_remembers_level() {
        let mut lights = LightControl::default();
        lights.set_brightness(40.0);
        lights.turn_off();
        assert_eq!(lights.brightness(), 0.0);
        lights.turn_on();
        assert_eq!(lights.brightness(), 40.0);
    }

    #[test]
    fn test_lights_on_defaults_to_full() {
        let mut lights = LightControl {
            brightness: 0.0,
            last_brightness: 0.0,
        };
        lights.turn_on();
        assert_eq!(lights.brightness(), 100.0);
    }

    #[test]
    fn test_lights_on_when_lit_is_noop() {
        let mut lights = LightControl::default();
        lights.set_brightness(55.0);
        lights.turn_on();
        assert_eq!(lights.brightness(), 55.0);
    }

    #[test]
    fn test_slider_refreshes_memory() {
        let mut lights = LightControl::default();
        lights.set_brightness(70.0);
        lights.set_brightness(30.0);
        lights.turn_off();
        lights.turn_on();
        assert_eq!(lights.brightness(), 30.0);
    }

    #[test]
    fn test_reset_clears_session_state() {
        let mut controls = ControlState::new();
        controls.privacy = true;
        controls.meeting = true;
        controls.curtain.up();
        controls.curtain.advance(1.0);
        controls.reset();
        assert!(!controls.privacy);
        assert!(!controls.meeting);
        assert_eq!(controls.curtain.position(), 0.0);
    }
}
