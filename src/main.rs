#![warn(clippy::all, rust_2018_idioms)]

use doodle::sensor::spawn_line_feed;
use doodle::shake::{DialogGuard, ShakeDetector, ShakeMonitor};
use doodle::{DoodleApp, DoodleConfig};

/// Set to read `x y z` accelerometer lines from stdin.
const SENSOR_STDIN_ENV: &str = "DOODLE_SENSOR_STDIN";

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = DoodleConfig::from_env();
    let guard = DialogGuard::new();
    let (monitor, erase_requests) =
        ShakeMonitor::channel(ShakeDetector::new(config.shake_threshold), guard.clone());

    if std::env::var_os(SENSOR_STDIN_ENV).is_some() {
        let stdin = std::io::BufReader::new(std::io::stdin());
        if let Err(err) = spawn_line_feed(stdin, monitor) {
            log::error!("Could not start accelerometer feed: {}", err);
        }
    } else {
        log::debug!("No accelerometer feed, shake-to-erase disabled");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([200.0, 200.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Doodle",
        native_options,
        Box::new(|cc| Ok(Box::new(DoodleApp::new(cc, config, guard, erase_requests)))),
    )
}
