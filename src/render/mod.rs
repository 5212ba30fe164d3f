//! Render backend capability surface
//!
//! The actual rasterizer is an external collaborator. This module defines
//! the surface the application drives it through (upload/release of scene
//! instances and a per-frame draw call) plus a headless backend that
//! records what it was asked to do, used by the shell and by tests.

use crate::camera::CameraPose;
use crate::device::{RenderPrecision, TierConfig};
use crate::lighting::LightRig;
use crate::scene::{Color, SceneEpoch, SceneGraph};

/// Sky color behind the office.
pub const SKY_COLOR: u32 = 0x87ceeb;

/// Render settings the backend must honor, resolved from the device tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub precision: RenderPrecision,
    pub antialias: bool,
    pub shadows: bool,
    pub pixel_ratio_cap: f32,
}

impl RenderSettings {
    /// Extract the backend-relevant slice of the tier configuration.
    pub fn from_tier(config: &TierConfig) -> Self {
        Self {
            precision: config.precision,
            antialias: config.antialias,
            shadows: config.shadows,
            pixel_ratio_cap: config.pixel_ratio_cap,
        }
    }
}

/// Everything the backend needs for one frame.
pub struct FrameInput<'a> {
    pub scene: &'a SceneGraph,
    pub camera: CameraPose,
    pub lights: &'a LightRig,
    pub background: Color,
}

/// The consumed rendering capability.
pub trait RenderBackend {
    /// Upload a scene instance's geometry and materials.
    fn prepare(&mut self, epoch: SceneEpoch, scene: &SceneGraph);

    /// Release everything uploaded for an instance.
    fn release(&mut self, epoch: SceneEpoch);

    /// Draw one frame of a prepared instance.
    fn draw(&mut self, epoch: SceneEpoch, frame: FrameInput<'_>);
}

/// Backend that records calls instead of rasterizing.
pub struct HeadlessBackend {
    settings: RenderSettings,
    prepared: Option<SceneEpoch>,
    frames_drawn: u64,
    releases: u64,
    last_mesh_count: usize,
}

impl HeadlessBackend {
    /// Create a headless backend for the tier settings.
    pub fn new(settings: RenderSettings) -> Self {
        log::info!(
            "Headless render backend: precision {:?}, antialias {}, shadows {}, pixel ratio cap {}",
            settings.precision,
            settings.antialias,
            settings.shadows,
            settings.pixel_ratio_cap
        );
        Self {
            settings,
            prepared: None,
            frames_drawn: 0,
            releases: 0,
            last_mesh_count: 0,
        }
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Instance currently uploaded, if any.
    pub fn prepared_epoch(&self) -> Option<SceneEpoch> {
        self.prepared
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    /// Mesh count of the most recently drawn frame.
    pub fn last_mesh_count(&self) -> usize {
        self.last_mesh_count
    }
}

impl RenderBackend for HeadlessBackend {
    fn prepare(&mut self, epoch: SceneEpoch, scene: &SceneGraph) {
        log::info!(
            "Uploading scene attempt {} ({} meshes)",
            epoch.0,
            scene.mesh_count()
        );
        self.prepared = Some(epoch);
    }

    fn release(&mut self, epoch: SceneEpoch) {
        if self.prepared == Some(epoch) {
            self.prepared = None;
        }
        self.releases += 1;
        log::debug!("Released scene attempt {}", epoch.0);
    }

    fn draw(&mut self, epoch: SceneEpoch, frame: FrameInput<'_>) {
        if self.prepared != Some(epoch) {
            log::warn!("Draw for unprepared scene attempt {}", epoch.0);
            return;
        }
        self.frames_drawn += 1;
        self.last_mesh_count = frame.scene.mesh_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FixedCamera;
    use crate::device::DeviceTier;
    use crate::scene::SceneManifest;

    fn frame_for<'a>(scene: &'a SceneGraph, lights: &'a LightRig) -> FrameInput<'a> {
        FrameInput {
            scene,
            camera: FixedCamera::new(0.002).pose(),
            lights,
            background: Color::from_hex(SKY_COLOR),
        }
    }

    #[test]
    fn test_draw_requires_prepare() {
        let settings = RenderSettings::from_tier(&TierConfig::for_tier(DeviceTier::Desktop));
        let mut backend = HeadlessBackend::new(settings);
        let scene = SceneManifest::demo_office().build().unwrap();
        let lights = LightRig::for_brightness(100.0);

        backend.draw(SceneEpoch(1), frame_for(&scene, &lights));
        assert_eq!(backend.frames_drawn(), 0);

        backend.prepare(SceneEpoch(1), &scene);
        backend.draw(SceneEpoch(1), frame_for(&scene, &lights));
        assert_eq!(backend.frames_drawn(), 1);
        assert_eq!(backend.last_mesh_count(), scene.mesh_count());
    }

    #[test]
    fn test_release_forgets_instance() {
        let settings = RenderSettings::from_tier(&TierConfig::for_tier(DeviceTier::Desktop));
        let mut backend = HeadlessBackend::new(settings);
        let scene = SceneManifest::demo_office().build().unwrap();

        backend.prepare(SceneEpoch(1), &scene);
        backend.release(SceneEpoch(1));
        assert_eq!(backend.prepared_epoch(), None);
        assert_eq!(backend.releases(), 1);
    }
}
