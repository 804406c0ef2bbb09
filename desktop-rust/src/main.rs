mod app;
mod io;
mod model;

use app::DesktopApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Review Batch",
        options,
        Box::new(|_cc| Box::new(DesktopApp::default())),
    )
}
