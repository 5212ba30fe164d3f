//! Environment lighting rig
//!
//! The office is lit by a fixed rig: warm ambient, a grid of six ceiling
//! point lights, and a hemisphere bounce. The control panel's brightness
//! percentage scales the whole rig linearly.

use glam::Vec3;

use crate::scene::Color;

/// Ambient intensity at 100% brightness.
pub const AMBIENT_MAX_INTENSITY: f32 = 1.5;
/// Per-point-light intensity at 100% brightness.
pub const POINT_MAX_INTENSITY: f32 = 18.0;
/// Hemisphere bounce intensity at 100% brightness.
pub const HEMISPHERE_MAX_INTENSITY: f32 = 0.7;
/// Point light falloff range.
pub const POINT_RANGE: f32 = 14.0;
/// Point light decay exponent.
pub const POINT_DECAY: f32 = 2.0;

/// Warm ambient tint.
pub const AMBIENT_TINT: u32 = 0xfff8f0;
/// Hemisphere ground bounce color.
pub const HEMISPHERE_GROUND: u32 = 0xd8d8d8;

/// Ceiling grid of the six office point lights.
const POINT_POSITIONS: [[f32; 3]; 6] = [
    [2.0, 2.0, -8.0],
    [5.0, 2.0, -8.0],
    [3.0, 2.0, -14.0],
    [7.0, 2.0, -12.0],
    [3.0, 2.0, -16.0],
    [7.0, 2.0, -16.0],
];

/// One point light of the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub decay: f32,
    pub color: Color,
}

/// Sky/ground hemisphere bounce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

/// The full light rig handed to the render backend each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub points: Vec<PointLight>,
    pub hemisphere: HemisphereLight,
}

impl LightRig {
    /// Build the rig for a brightness percentage in [0, 100].
    pub fn for_brightness(brightness: f32) -> Self {
        let scale = (brightness / 100.0).clamp(0.0, 1.0);
        Self {
            ambient_color: Color::from_hex(AMBIENT_TINT),
            ambient_intensity: AMBIENT_MAX_INTENSITY * scale,
            points: POINT_POSITIONS
                .iter()
                .map(|&position| PointLight {
                    position: Vec3::from_array(position),
                    intensity: POINT_MAX_INTENSITY * scale,
                    range: POINT_RANGE,
                    decay: POINT_DECAY,
                    color: Color::WHITE,
                })
                .collect(),
            hemisphere: HemisphereLight {
                sky: Color::WHITE,
                ground: Color::from_hex(HEMISPHERE_GROUND),
                intensity: HEMISPHERE_MAX_INTENSITY * scale,
            },
        }
    }
}
