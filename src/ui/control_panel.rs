//! Office control panel
//!
//! Side panel with the room controls: lighting brightness, privacy glass,
//! meeting screens, and the curtain transport buttons.

use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::controls::{ControlState, Motion};

const ACCENT: Color32 = Color32::from_rgb(0, 255, 136);
const WARNING: Color32 = Color32::from_rgb(255, 149, 0);

/// The office control panel.
pub struct ControlPanel;

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    /// Create the control panel.
    pub fn new() -> Self {
        Self
    }

    /// Show the panel and apply edits to the control state.
    pub fn show(&mut self, ui: &mut Ui, controls: &mut ControlState) {
        ui.heading(RichText::new("Office Controls").color(ACCENT));
        ui.separator();

        self.show_lights(ui, controls);
        ui.add_space(12.0);
        self.show_privacy(ui, controls);
        ui.add_space(12.0);
        self.show_meeting(ui, controls);
        ui.add_space(12.0);
        self.show_curtain(ui, controls);
    }

    fn show_lights(&mut self, ui: &mut Ui, controls: &mut ControlState) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Lights").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{:.0}%", controls.lights.brightness())).color(ACCENT),
                );
            });
        });

        let mut brightness = controls.lights.brightness();
        if ui
            .add(Slider::new(&mut brightness, 0.0..=100.0).show_value(false))
            .changed()
        {
            controls.lights.set_brightness(brightness);
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(controls.lights.is_off(), egui::Button::new("On"))
                .clicked()
            {
                controls.lights.turn_on();
            }
            if ui
                .add_enabled(!controls.lights.is_off(), egui::Button::new("Off"))
                .clicked()
            {
                controls.lights.turn_off();
            }
        });
    }

    fn show_privacy(&mut self, ui: &mut Ui, controls: &mut ControlState) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Privacy").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (label, color) = if controls.privacy {
                    ("ON", WARNING)
                } else {
                    ("OFF", ACCENT)
                };
                if ui
                    .add(egui::Button::new(RichText::new(label).color(color)))
                    .clicked()
                {
                    controls.privacy = !controls.privacy;
                }
            });
        });
        ui.label(if controls.privacy {
            "Glass: Frosted"
        } else {
            "Glass: Transparent"
        });
    }

    fn show_meeting(&mut self, ui: &mut Ui, controls: &mut ControlState) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Meeting").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (label, color) = if controls.meeting {
                    ("ON", ACCENT)
                } else {
                    ("OFF", Color32::from_gray(120))
                };
                if ui
                    .add(egui::Button::new(RichText::new(label).color(color)))
                    .clicked()
                {
                    controls.meeting = !controls.meeting;
                }
            });
        });
        ui.label(if controls.meeting {
            "Status: Meeting Active"
        } else {
            "Status: No Meeting"
        });
    }

    fn show_curtain(&mut self, ui: &mut Ui, controls: &mut ControlState) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Curtain").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{:.0}%", controls.curtain.position())).color(ACCENT),
                );
            });
        });

        let motion = controls.curtain.motion();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(motion != Motion::Up, egui::Button::new("Up"))
                .clicked()
            {
                controls.curtain.up();
            }
            if ui
                .add_enabled(motion != Motion::Stopped, egui::Button::new("Stop"))
                .clicked()
            {
                controls.curtain.stop();
            }
            if ui
                .add_enabled(motion != Motion::Down, egui::Button::new("Down"))
                .clicked()
            {
                controls.curtain.down();
            }
        });
        ui.label(format!("Status: {}", motion.name()));
    }
}
