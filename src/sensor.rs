use std::io::BufRead;
use std::thread::JoinHandle;

use crate::shake::{AccelSample, ShakeMonitor};

/// Parses an `x y z` reading. Commas are accepted as separators too.
pub fn parse_sample(line: &str) -> Option<AccelSample> {
    let mut values = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f32>);
    let x = values.next()?.ok()?;
    let y = values.next()?.ok()?;
    let z = values.next()?.ok()?;
    if values.next().is_some() {
        return None;
    }
    Some(AccelSample::new(x, y, z))
}

/// Feeds accelerometer readings from a line-oriented source (for instance a
/// device bridge piped into stdin) on a background thread.
///
/// Blank lines are skipped, malformed ones are logged. The thread ends when
/// the source does.
pub fn spawn_line_feed<R>(reader: R, mut monitor: ShakeMonitor) -> std::io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name("accelerometer".to_owned())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log::error!("Accelerometer feed failed: {}", err);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_sample(&line) {
                    Some(sample) => {
                        monitor.feed(sample);
                    }
                    None => log::warn!("Skipping malformed accelerometer line: {:?}", line),
                }
            }
            log::debug!("Accelerometer feed ended");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shake::{drain_requests, DialogGuard, ShakeDetector};
    use std::io::Cursor;

    #[test]
    fn test_parse_sample() {
        assert_eq!(parse_sample("1 2.5 -3"), Some(AccelSample::new(1.0, 2.5, -3.0)));
        assert_eq!(parse_sample(" 0.1,0.2, 9.8 "), Some(AccelSample::new(0.1, 0.2, 9.8)));
        assert_eq!(parse_sample("1 2"), None);
        assert_eq!(parse_sample("1 2 3 4"), None);
        assert_eq!(parse_sample("a b c"), None);
    }

    #[test]
    fn test_line_feed_raises_request() {
        let guard = DialogGuard::new();
        let (monitor, mut receiver) = ShakeMonitor::channel(ShakeDetector::default(), guard.clone());
        let input = Cursor::new("0 0 9.8\n\ngarbage\n30 0 0\n");

        spawn_line_feed(input, monitor).unwrap().join().unwrap();

        assert!(drain_requests(&mut receiver));
        assert!(guard.is_visible());
    }
}
