//! Office Walkthrough - interactive 3D virtual office
//!
//! Main entry point for the application.

use office_walkthrough::OfficeApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting Office Walkthrough v{}", env!("CARGO_PKG_VERSION"));

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Office Walkthrough"),
        vsync: true,
        multisampling: 0,
        ..Default::default()
    };

    // Run the app
    eframe::run_native(
        "Office Walkthrough",
        native_options,
        Box::new(|cc| Box::new(OfficeApp::new(cc))),
    )
}
