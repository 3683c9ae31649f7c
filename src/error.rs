use thiserror::Error;

/// Errors surfaced by the parts of the app that talk to the outside world.
///
/// The drawing core itself never fails: stale contact ids and empty paths are
/// silently ignored, so nothing in `tracker` or `surface` returns this type.
#[derive(Error, Debug)]
pub enum DoodleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("export worker stopped before reporting a result")]
    ExportCancelled,
}

pub type DoodleResult<T> = Result<T, DoodleError>;
