//! Loading screen overlay
//!
//! Full-window spinner while the scene loads; error or timeout message
//! with the auto-retry countdown and a manual retry button on failure.

use eframe::egui::{Color32, ProgressBar, RichText, Ui};

use crate::loading::LoadPhase;

const ACCENT: Color32 = Color32::from_rgb(0, 255, 136);

/// What the overlay needs to render one frame.
#[derive(Debug, Clone, Copy)]
pub struct LoadingView {
    pub phase: LoadPhase,
    /// Fetch progress in [0, 1]
    pub progress: f32,
    /// Seconds until the automatic retry, in a failure phase
    pub countdown: Option<u64>,
    pub retry_count: u32,
}

/// The loading/failure overlay.
pub struct LoadingScreen;

impl Default for LoadingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingScreen {
    /// Create the loading screen.
    pub fn new() -> Self {
        Self
    }

    /// Show the overlay. Returns true when the user asked to retry now.
    pub fn show(&mut self, ui: &mut Ui, view: LoadingView) -> bool {
        let mut retry_clicked = false;

        ui.vertical_centered(|ui| {
            let spacing = ui.available_height() * 0.3;
            ui.add_space(spacing);

            ui.heading(
                RichText::new("Smart Office")
                    .color(ACCENT)
                    .size(32.0)
                    .strong(),
            );
            ui.add_space(20.0);

            match view.phase {
                LoadPhase::Loading | LoadPhase::Ready => {
                    ui.spinner();
                    ui.add_space(10.0);
                    ui.label("Loading 3D Environment...");
                    ui.add_space(10.0);
                    ui.add(
                        ProgressBar::new(view.progress)
                            .desired_width(240.0)
                            .fill(ACCENT),
                    );
                }
                LoadPhase::Error => {
                    ui.label(
                        RichText::new("Something went wrong while loading the office.")
                            .color(Color32::LIGHT_RED),
                    );
                    retry_clicked = self.show_retry(ui, view);
                }
                LoadPhase::TimedOut => {
                    ui.label(
                        RichText::new("Loading is taking longer than expected.")
                            .color(Color32::LIGHT_RED),
                    );
                    retry_clicked = self.show_retry(ui, view);
                }
            }
        });

        retry_clicked
    }

    fn show_retry(&mut self, ui: &mut Ui, view: LoadingView) -> bool {
        ui.add_space(10.0);
        if let Some(seconds) = view.countdown {
            ui.label(format!("Retrying automatically in {} s", seconds));
        }
        if view.retry_count > 0 {
            ui.label(
                RichText::new(format!("Attempt {}", view.retry_count))
                    .color(Color32::from_gray(140)),
            );
        }
        ui.add_space(10.0);
        ui.button(RichText::new("Retry Now").color(ACCENT)).clicked()
    }
}
