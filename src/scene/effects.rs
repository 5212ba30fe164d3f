//! Room-control effects on the live scene
//!
//! Applies control-state changes to the classified meshes: the privacy
//! glass and meeting-screen swaps are instant material writes; the curtain
//! mesh eases toward the target height a little every frame.

use super::graph::SceneGraph;
use super::init::{ClassifiedMeshes, GLASS_OPACITY, GLASS_TINT};
use super::material::{Color, Material, MaterialKind};

/// Frosted privacy-glass tint.
pub const PRIVACY_TINT: u32 = 0xfcfcfc;
/// Frosted privacy-glass opacity.
pub const PRIVACY_OPACITY: f32 = 0.95;

/// Active meeting-screen color.
pub const SCREEN_ON_COLOR: u32 = 0x00ff88;
/// Idle meeting-screen color (flat variant).
pub const SCREEN_OFF_COLOR: u32 = 0x333333;
pub const SCREEN_ON_OPACITY: f32 = 0.8;
pub const SCREEN_OFF_OPACITY: f32 = 0.3;
pub const SCREEN_ON_EMISSIVE_INTENSITY: f32 = 2.0;

/// World-space distance between a fully lowered and fully raised curtain.
pub const CURTAIN_MAX_RAISE: f32 = 3.0;
/// Exponential smoothing rate of the curtain mesh, per second
/// (roughly a 0.1 blend per frame at 60 fps).
pub const CURTAIN_SMOOTHING_RATE: f32 = 6.3;
/// Distance below which the mesh snaps onto the target.
pub const CURTAIN_SNAP_EPSILON: f32 = 1e-3;

/// Swap the door glass between clear and frosted.
///
/// Safe no-op when the model has no door glass or the scene is gone.
pub fn apply_privacy(graph: &mut SceneGraph, refs: &ClassifiedMeshes, privacy: bool) {
    let Some(door) = refs.door_glass() else {
        return;
    };
    match door.kind {
        MaterialKind::Glass | MaterialKind::Flat => {
            if let Some(Material::Flat(flat)) = graph.material_mut(door.mesh) {
                if privacy {
                    flat.color = Color::from_hex(PRIVACY_TINT);
                    flat.opacity = PRIVACY_OPACITY;
                } else {
                    flat.color = Color::from_hex(GLASS_TINT);
                    flat.opacity = GLASS_OPACITY;
                }
            }
        }
        MaterialKind::Lit => {}
    }
}

/// Switch every meeting screen between active and idle.
///
/// Branches on the material kind recorded at classification: flat screens
/// get a color/opacity swap, lit screens an emissive swap.
pub fn apply_meeting(graph: &mut SceneGraph, refs: &ClassifiedMeshes, meeting: bool) {
    for screen in refs.screens() {
        match screen.kind {
            MaterialKind::Glass | MaterialKind::Flat => {
                if let Some(Material::Flat(flat)) = graph.material_mut(screen.mesh) {
                    if meeting {
                        flat.color = Color::from_hex(SCREEN_ON_COLOR);
                        flat.opacity = SCREEN_ON_OPACITY;
                    } else {
                        flat.color = Color::from_hex(SCREEN_OFF_COLOR);
                        flat.opacity = SCREEN_OFF_OPACITY;
                    }
                }
            }
            MaterialKind::Lit => {
                if let Some(Material::Lit(lit)) = graph.material_mut(screen.mesh) {
                    if meeting {
                        lit.emissive = Color::from_hex(SCREEN_ON_COLOR);
                        lit.emissive_intensity = SCREEN_ON_EMISSIVE_INTENSITY;
                    } else {
                        lit.emissive = Color::BLACK;
                        lit.emissive_intensity = 0.0;
                    }
                }
            }
        }
    }
}

/// Target curtain height for a drive position in [0, 100].
pub fn curtain_target_y(rest_y: f32, position: f32) -> f32 {
    rest_y + position / 100.0 * CURTAIN_MAX_RAISE
}

/// Ease the curtain mesh toward the drive position by one frame.
///
/// Returns true while the mesh is still moving, so the caller keeps
/// scheduling frames; false once it has snapped onto the target.
pub fn ease_curtain(
    graph: &mut SceneGraph,
    refs: &ClassifiedMeshes,
    position: f32,
    delta_time: f32,
) -> bool {
    let (Some(curtain), Some(rest_y)) = (refs.curtain(), refs.curtain_rest_y()) else {
        return false;
    };
    let Some(node) = graph.mesh_mut(curtain.mesh) else {
        return false;
    };

    let target = curtain_target_y(rest_y, position);
    let diff = target - node.position.y;
    if diff.abs() < CURTAIN_SNAP_EPSILON {
        node.position.y = target;
        return false;
    }

    let blend = 1.0 - (-CURTAIN_SMOOTHING_RATE * delta_time).exp();
    node.position.y += diff * blend;
    true
}
