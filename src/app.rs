//! Main application state and frame loop
//!
//! Wires the pipeline together: the scene host feeds the load controller,
//! the load controller decides which surface is visible and when to reload,
//! and the per-frame step advances the curtain and hands the frame to the
//! render backend. Animation repaints are scheduled only while something is
//! actually in motion.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::camera::FixedCamera;
use crate::controls::ControlState;
use crate::device::{self, TierConfig};
use crate::lighting::LightRig;
use crate::loading::{LoadAction, LoadController, LoadTimings};
use crate::render::{FrameInput, HeadlessBackend, RenderBackend, RenderSettings, SKY_COLOR};
use crate::scene::{
    BuiltinSource, Color, FileSource, ModelSource, SceneFailure, SceneHost, SceneSignal,
};
use crate::ui::{ControlPanel, LoadingScreen, LoadingView, Viewport, ViewportInfo};

/// Environment variable pointing at a scene manifest file. Without it the
/// bundled demo office is used.
pub const SCENE_ENV: &str = "WALKTHROUGH_SCENE";

/// Poll interval while the loading overlay is up.
const OVERLAY_POLL: Duration = Duration::from_millis(100);

/// Main application state.
pub struct OfficeApp {
    config: TierConfig,
    controller: LoadController,
    host: SceneHost,
    backend: HeadlessBackend,

    controls: ControlState,
    camera: FixedCamera,

    // UI panels
    control_panel: ControlPanel,
    loading_screen: LoadingScreen,
    viewport: Viewport,

    asset_path: Option<PathBuf>,
    /// Control state last written into the live scene
    applied_privacy: bool,
    applied_meeting: bool,

    last_update: Instant,
}

impl OfficeApp {
    /// Create the application and start the first load attempt.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing Office Walkthrough...");

        let config = device::detect();
        let asset_path = std::env::var_os(SCENE_ENV).map(PathBuf::from);
        let now = Instant::now();

        let mut host = SceneHost::new(&config);
        host.begin_load(Self::source_for(&asset_path), now);

        let app = Self {
            controller: LoadController::new(Self::timings(&config), now),
            host,
            backend: HeadlessBackend::new(RenderSettings::from_tier(&config)),
            controls: ControlState::new(),
            camera: FixedCamera::new(config.pointer_sensitivity),
            control_panel: ControlPanel::new(),
            loading_screen: LoadingScreen::new(),
            viewport: Viewport::new(),
            asset_path,
            applied_privacy: false,
            applied_meeting: false,
            last_update: now,
            config,
        };
        log::info!("Office Walkthrough initialized");
        app
    }

    fn timings(config: &TierConfig) -> LoadTimings {
        LoadTimings {
            min_display: config.min_display,
            load_timeout: config.load_timeout,
            ..LoadTimings::default()
        }
    }

    fn source_for(asset_path: &Option<PathBuf>) -> Box<dyn ModelSource> {
        match asset_path {
            Some(path) => Box::new(FileSource::new(path.clone())),
            None => Box::new(BuiltinSource::new()),
        }
    }

    /// Feed scene signals into the load controller and act on its decisions.
    fn drive_pipeline(&mut self, now: Instant) {
        for signal in self.host.poll(now) {
            match signal {
                SceneSignal::Loaded => {
                    if let Some((graph, _)) = self.host.scene() {
                        self.backend.prepare(self.host.epoch(), graph);
                    }
                    // A fresh scene starts from the current panel state
                    self.host.set_privacy(self.controls.privacy);
                    self.host.set_meeting(self.controls.meeting);
                    self.applied_privacy = self.controls.privacy;
                    self.applied_meeting = self.controls.meeting;
                    self.controller.on_loaded(now);
                }
                SceneSignal::Failed(SceneFailure::Timeout) => {
                    self.controller.on_timeout(now);
                }
                SceneSignal::Failed(SceneFailure::Asset(message))
                | SceneSignal::Failed(SceneFailure::Init(message)) => {
                    log::error!("Scene pipeline failed: {}", message);
                    self.controller.on_error(now);
                }
            }
        }

        if let Some(LoadAction::Reload) = self.controller.tick(now) {
            self.restart_pipeline(now);
        }
    }

    /// In-process pipeline reset: release the stale scene, drop in-session
    /// control state, and start a fresh load attempt.
    fn restart_pipeline(&mut self, now: Instant) {
        self.backend.release(self.host.epoch());
        self.controls.reset();
        self.camera.reset();
        self.applied_privacy = false;
        self.applied_meeting = false;
        self.host.begin_load(Self::source_for(&self.asset_path), now);
    }

    fn show_loading(&mut self, ctx: &egui::Context, now: Instant) {
        let view = LoadingView {
            phase: self.controller.phase(),
            progress: self.host.progress(),
            countdown: self.controller.countdown_remaining(now),
            retry_count: self.controller.retry_count(),
        };

        let mut retry_clicked = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            retry_clicked = self.loading_screen.show(ui, view);
        });

        if retry_clicked {
            if let Some(LoadAction::Reload) = self.controller.retry_now(now) {
                self.restart_pipeline(now);
            }
        }

        // Deferred ready-commits and the retry countdown advance on a
        // coarse poll interval
        ctx.request_repaint_after(OVERLAY_POLL);
    }

    fn show_scene(&mut self, ctx: &egui::Context, now: Instant, delta: f32) {
        egui::SidePanel::left("office_controls")
            .default_width(260.0)
            .show(ctx, |ui| {
                self.control_panel.show(ui, &mut self.controls);
            });

        let info = ViewportInfo {
            tier: self.config.tier.name(),
            mesh_count: self
                .host
                .scene()
                .map(|(graph, _)| graph.mesh_count())
                .unwrap_or(0),
            curtain_percent: self.controls.curtain.position(),
            brightness_percent: self.controls.lights.brightness(),
            frames_drawn: self.backend.frames_drawn(),
        };
        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.show(ui, &mut self.camera, info);
        });

        // The command handlers above have run to completion; the animation
        // step below observes their final state.
        if self.controls.privacy != self.applied_privacy {
            self.host.set_privacy(self.controls.privacy);
            self.applied_privacy = self.controls.privacy;
        }
        if self.controls.meeting != self.applied_meeting {
            self.host.set_meeting(self.controls.meeting);
            self.applied_meeting = self.controls.meeting;
        }

        let drive_moved = self.controls.curtain.advance(delta);
        let mesh_moving = self
            .host
            .ease_curtain(self.controls.curtain.position(), delta);

        let lights = LightRig::for_brightness(self.controls.lights.brightness());
        if let Some((graph, _)) = self.host.scene() {
            self.backend.draw(
                self.host.epoch(),
                FrameInput {
                    scene: graph,
                    camera: self.camera.pose(),
                    lights: &lights,
                    background: Color::from_hex(SKY_COLOR),
                },
            );
        }
        self.camera.log_pose(now);

        // Animation frames are scheduled only while something is in motion;
        // a stopped curtain costs nothing per frame
        if drive_moved || mesh_moving || self.controls.curtain.is_moving() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for OfficeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.drive_pipeline(now);

        if self.controller.overlay_visible() {
            self.show_loading(ctx, now);
        } else {
            self.show_scene(ctx, now, delta);
        }
    }
}
