use std::io::Write;
use std::path::PathBuf;

use futures::channel::oneshot;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::{DoodleError, DoodleResult};
use crate::util::time;

/// Destination for exported canvas images.
pub trait ImageSink: Send + 'static {
    /// Stores the image and reports where it went.
    fn save(&mut self, image: &RgbImage) -> DoodleResult<PathBuf>;
}

/// Encodes an image as JPEG into `out`. `quality` is clamped to 1..=100.
pub fn encode_jpeg<W: Write>(image: &RgbImage, quality: u8, out: W) -> DoodleResult<()> {
    let mut encoder = JpegEncoder::new_with_quality(out, quality.clamp(1, 100));
    encoder.encode_image(image)?;
    Ok(())
}

/// Writes `Doodle<millis>.jpg` files into a directory.
#[derive(Debug, Clone)]
pub struct JpegFileSink {
    dir: PathBuf,
    quality: u8,
}

impl JpegFileSink {
    pub fn new(dir: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            dir: dir.into(),
            quality,
        }
    }

    pub fn file_name(timestamp_millis: u128) -> String {
        format!("Doodle{}.jpg", timestamp_millis)
    }
}

impl ImageSink for JpegFileSink {
    fn save(&mut self, image: &RgbImage) -> DoodleResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(time::timestamp_millis()));
        let file = std::fs::File::create(&path)?;
        let mut writer = std::io::BufWriter::new(file);
        encode_jpeg(image, self.quality, &mut writer)?;
        writer.flush()?;
        Ok(path)
    }
}

/// Result of a finished export, as shown to the user.
pub type ExportOutcome = DoodleResult<PathBuf>;

/// An export running on a worker thread.
#[derive(Debug)]
pub struct PendingExport {
    receiver: oneshot::Receiver<ExportOutcome>,
}

impl PendingExport {
    /// Returns the outcome once the worker is done, without blocking.
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        match self.receiver.try_recv() {
            Ok(Some(outcome)) => Some(outcome),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(DoodleError::ExportCancelled)),
        }
    }

    /// Blocks until the worker reports.
    pub fn wait(self) -> ExportOutcome {
        futures::executor::block_on(self.receiver).unwrap_or(Err(DoodleError::ExportCancelled))
    }
}

/// Saves `image` through `sink` on a worker thread.
pub fn spawn_export<S: ImageSink>(image: RgbImage, mut sink: S) -> PendingExport {
    let (sender, receiver) = oneshot::channel();
    let worker = std::thread::Builder::new()
        .name("export".to_owned())
        .spawn(move || {
            let outcome = sink.save(&image);
            match &outcome {
                Ok(path) => log::info!("Saved image to {}", path.display()),
                Err(err) => log::error!("Failed to save image: {}", err),
            }
            let _ = sender.send(outcome);
        });
    if let Err(err) = worker {
        log::error!("Could not start export worker: {}", err);
    }
    PendingExport { receiver }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl ImageSink for FailingSink {
        fn save(&mut self, _image: &RgbImage) -> DoodleResult<PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[test]
    fn test_encode_jpeg_writes_jpeg() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        encode_jpeg(&image, 100, &mut bytes).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(JpegFileSink::file_name(1234), "Doodle1234.jpg");
    }

    #[test]
    fn test_failure_is_reported() {
        let image = RgbImage::new(2, 2);
        let outcome = spawn_export(image, FailingSink).wait();
        assert!(matches!(outcome, Err(DoodleError::Io(_))));
    }

    #[test]
    fn test_file_sink_writes_file() {
        let dir = std::env::temp_dir().join(format!("doodle-export-{}", std::process::id()));
        let image = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));

        let path = spawn_export(image, JpegFileSink::new(&dir, 90)).wait().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
