//! Material model for scene meshes
//!
//! Two material variants exist in loaded scenes: lit (standard PBR-style)
//! and flat (unlit). Which variant a classified mesh ended up with is
//! recorded once as a [`MaterialKind`] tag so later mutators branch on the
//! tag instead of re-inspecting the live material.

use serde::{Deserialize, Serialize};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a color from components in [0, 1].
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a 24-bit hex value, e.g. `0xc8dce8`.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

/// Standard lit material (PBR-style parameters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LitMaterial {
    pub base_color: Color,
    pub opacity: f32,
    pub transparent: bool,
    /// None = author did not provide a value
    pub metalness: Option<f32>,
    /// None = author did not provide a value
    pub roughness: Option<f32>,
    pub emissive: Color,
    pub emissive_intensity: f32,
}

impl Default for LitMaterial {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            metalness: None,
            roughness: None,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
        }
    }
}

/// Unlit flat material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatMaterial {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    pub depth_write: bool,
}

impl FlatMaterial {
    /// Translucent glass replacement: double-sided, does not write depth.
    pub fn glass(color: Color, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            transparent: true,
            double_sided: true,
            depth_write: false,
        }
    }
}

impl Default for FlatMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            depth_write: true,
        }
    }
}

/// Surface description attached to a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Lit(LitMaterial),
    Flat(FlatMaterial),
}

impl Material {
    /// The kind tag matching this material variant.
    pub fn variant_kind(&self) -> MaterialKind {
        match self {
            Material::Lit(_) => MaterialKind::Lit,
            Material::Flat(_) => MaterialKind::Flat,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Lit(LitMaterial::default())
    }
}

/// Material classification recorded alongside a cached mesh reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Replaced by the translucent glass material
    Glass,
    /// Standard lit material
    Lit,
    /// Unlit flat material
    Flat,
}
