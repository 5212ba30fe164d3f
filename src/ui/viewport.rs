//! 3D viewport panel
//!
//! Hosts the rendered scene: captures pointer drags for the camera rig,
//! paints the sky behind the backend's output, and overlays frame info.

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui};

use crate::camera::FixedCamera;
use crate::scene::Color;

/// Frame facts shown in the overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportInfo {
    pub tier: &'static str,
    pub mesh_count: usize,
    pub curtain_percent: f32,
    pub brightness_percent: f32,
    pub frames_drawn: u64,
}

/// The scene viewport.
pub struct Viewport {
    /// Show the frame info overlay
    pub show_info: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { show_info: true }
    }
}

impl Viewport {
    /// Create the viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the viewport, feeding drag deltas into the camera.
    pub fn show(&mut self, ui: &mut Ui, camera: &mut FixedCamera, info: ViewportInfo) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());

        if response.dragged() {
            let delta = response.drag_delta();
            camera.apply_pointer_delta(delta.x, delta.y);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, to_color32(Color::from_hex(crate::render::SKY_COLOR)));

        if self.show_info {
            let overlay = format!(
                "tier: {}\nmeshes: {}\ncurtain: {:.0}%\nlights: {:.0}%\nframes: {}",
                info.tier,
                info.mesh_count,
                info.curtain_percent,
                info.brightness_percent,
                info.frames_drawn
            );
            painter.text(
                rect.left_top() + egui::vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                overlay,
                FontId::monospace(12.0),
                Color32::from_black_alpha(180),
            );
        }
    }
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgb(
        (color.r * 255.0) as u8,
        (color.g * 255.0) as u8,
        (color.b * 255.0) as u8,
    )
}
