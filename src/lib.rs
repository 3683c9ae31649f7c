#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod dialogs;
pub mod error;
pub mod export;
pub mod frame;
pub mod input;
pub mod renderer;
pub mod sensor;
pub mod shake;
pub mod stroke;
pub mod surface;
pub mod tracker;
pub mod util;

pub use app::DoodleApp;
pub use canvas::{Canvas, TouchEvent};
pub use config::DoodleConfig;
pub use error::{DoodleError, DoodleResult};
pub use frame::Frame;
pub use stroke::{PaintStyle, StrokePath};
pub use surface::Surface;
pub use tracker::{ContactId, ReleasePolicy, StrokeTracker, TouchSample};
