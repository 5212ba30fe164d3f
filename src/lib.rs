//! Office Walkthrough
//!
//! An interactive 3D virtual-office walkthrough: loading/retry screen,
//! room controls (lighting, privacy glass, meeting screens, motorized
//! curtain), and a fixed-camera scene driven through a render backend.

pub mod app;
pub mod camera;
pub mod controls;
pub mod device;
pub mod lighting;
pub mod loading;
pub mod render;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use app::OfficeApp;
pub use controls::{ControlState, Curtain, Motion};
pub use device::{classify, DeviceTier, TierConfig};
pub use lighting::LightRig;
pub use loading::{LoadController, LoadPhase};
pub use scene::{SceneGraph, SceneHost, SceneManifest};
