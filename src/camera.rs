//! Fixed look-around camera rig
//!
//! The walkthrough camera never translates: its position is pinned every
//! frame and pointer drags only rotate it, pitch clamped to straight up /
//! straight down.

use std::f32::consts::FRAC_PI_2;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};

/// The locked viewpoint inside the office.
pub const FIXED_POSITION: Vec3 = Vec3::new(5.84, 1.84, -15.49);
/// Starting pitch (radians).
pub const INITIAL_PITCH: f32 = -0.1;
/// Starting yaw (radians).
pub const INITIAL_YAW: f32 = -3.31;

const POSE_LOG_INTERVAL: Duration = Duration::from_secs(2);

/// Camera pose handed to the render backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Fixed-position, rotation-only camera.
#[derive(Debug, Clone)]
pub struct FixedCamera {
    yaw: f32,
    pitch: f32,
    /// Radians per pointer pixel, from the device tier
    sensitivity: f32,
    last_pose_log: Option<Instant>,
}

impl FixedCamera {
    /// Create the camera at the initial orientation.
    pub fn new(sensitivity: f32) -> Self {
        Self {
            yaw: INITIAL_YAW,
            pitch: INITIAL_PITCH,
            sensitivity,
            last_pose_log: None,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotate from a pointer drag. Pitch clamps at straight up/down.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// The pose for this frame; the position is always the fixed viewpoint.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: FIXED_POSITION,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// World-space view direction (yaw-then-pitch order).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Right-handed view matrix for the backend.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(FIXED_POSITION, self.forward(), Vec3::Y)
    }

    /// Periodic pose trace, rate-limited to one line every two seconds.
    pub fn log_pose(&mut self, now: Instant) {
        let due = self
            .last_pose_log
            .map_or(true, |last| now.duration_since(last) >= POSE_LOG_INTERVAL);
        if due {
            log::debug!(
                "Camera pose: position {:?}, pitch {:.2}, yaw {:.2}",
                FIXED_POSITION,
                self.pitch,
                self.yaw
            );
            self.last_pose_log = Some(now);
        }
    }

    /// Back to the initial orientation, as a pipeline reload does.
    pub fn reset(&mut self) {
        self.yaw = INITIAL_YAW;
        self.pitch = INITIAL_PITCH;
        self.last_pose_log = None;
    }
}
