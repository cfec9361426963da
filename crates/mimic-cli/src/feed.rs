//! Stand-ins for the camera and the classifier.
//!
//! Without real hardware the "face" is whatever label a [`Feed`] says the
//! player is showing: typed on stdin, or replayed from a script. The
//! simulated camera paces the perception loop; the simulated classifier
//! reports the feed's label in the classifier's own vocabulary so the
//! runtime's label mapping and region scaling are exercised as with a real
//! model.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use mimic_core::{EmotionLabel, FaceRegion};
use mimic_runtime::{CaptureDevice, CaptureError, Classification, Frame, PerceptionMiss, PerceptionSource};

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

/// What the player is currently showing.
pub trait Feed: Send + Sync {
    fn current(&self) -> Option<EmotionLabel>;
}

/// Label typed on stdin, one per line. `none` clears it; `quit` or end of
/// input cancels `quit`.
pub struct LiveFeed {
    label: Mutex<Option<EmotionLabel>>,
}

impl LiveFeed {
    /// Start reading stdin on its own thread. The thread is detached: a
    /// blocked read must not hold up process exit.
    pub fn spawn_stdin(quit: CancellationToken) -> std::io::Result<Arc<Self>> {
        let feed = Arc::new(Self {
            label: Mutex::new(None),
        });
        let reader = feed.clone();
        std::thread::Builder::new()
            .name("mimic-stdin".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if !reader.apply(&line) {
                        break;
                    }
                }
                tracing::info!("stdin feed closed");
                quit.cancel();
            })?;
        Ok(feed)
    }

    /// Apply one input line. Returns false when the player asked to quit.
    fn apply(&self, line: &str) -> bool {
        let word = line.trim();
        match word {
            "" => {}
            "quit" | "exit" => return false,
            w if w.eq_ignore_ascii_case("none") => *self.label.lock() = None,
            w => match w.parse::<EmotionLabel>() {
                Ok(label) => *self.label.lock() = Some(label),
                Err(err) => tracing::warn!("{err}"),
            },
        }
        true
    }
}

impl Feed for LiveFeed {
    fn current(&self) -> Option<EmotionLabel> {
        *self.label.lock()
    }
}

/// Blank frames at a fixed cadence.
pub struct SimCamera {
    interval: Duration,
    seq: u64,
    pixels: Arc<[u8]>,
}

impl SimCamera {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            seq: 0,
            pixels: Arc::from(Vec::new()),
        }
    }
}

impl CaptureDevice for SimCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "simulated camera opened");
        Ok(())
    }

    fn acquire(&mut self) -> Result<Frame, CaptureError> {
        std::thread::sleep(self.interval);
        self.seq += 1;
        Ok(Frame {
            seq: self.seq,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            pixels: self.pixels.clone(),
        })
    }

    fn release(&mut self) {
        tracing::debug!(frames = self.seq, "simulated camera released");
    }
}

/// Reports the feed's label on a half-size analysis copy, the way the real
/// detector downsamples before searching for faces.
pub struct SimClassifier {
    feed: Arc<dyn Feed>,
}

impl SimClassifier {
    pub fn new(feed: Arc<dyn Feed>) -> Self {
        Self { feed }
    }
}

impl PerceptionSource for SimClassifier {
    fn classify(&self, frame: &Frame) -> Result<Classification, PerceptionMiss> {
        let label = self.feed.current().ok_or(PerceptionMiss::NoFace)?;
        let (w, h) = (frame.width / 2, frame.height / 2);
        Ok(Classification {
            raw_label: label.classifier_name().to_string(),
            region: FaceRegion::new((w / 3) as i32, (h / 4) as i32, (w / 3) as i32, (h / 2) as i32),
            analysed_width: w,
            analysed_height: h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_feed_lines() {
        let feed = LiveFeed {
            label: Mutex::new(None),
        };
        assert!(feed.apply("happy"));
        assert_eq!(feed.current(), Some(EmotionLabel::Joy));
        assert!(feed.apply("  bliss "));
        assert_eq!(feed.current(), Some(EmotionLabel::Joy));
        assert!(feed.apply("NONE"));
        assert_eq!(feed.current(), None);
        assert!(!feed.apply("quit"));
    }

    struct Fixed(Option<EmotionLabel>);

    impl Feed for Fixed {
        fn current(&self) -> Option<EmotionLabel> {
            self.0
        }
    }

    #[test]
    fn test_classifier_speaks_classifier_vocabulary() {
        let frame = SimCamera::new(Duration::ZERO).acquire().unwrap();
        let c = SimClassifier::new(Arc::new(Fixed(Some(EmotionLabel::Sadness))))
            .classify(&frame)
            .unwrap();
        assert_eq!(c.raw_label, "sad");
        assert_eq!((c.analysed_width, c.analysed_height), (320, 240));
        let (label, region) = c.resolve(&frame).unwrap();
        assert_eq!(label, Some(EmotionLabel::Sadness));
        assert_eq!(region, FaceRegion::new(212, 120, 212, 240));
    }

    #[test]
    fn test_no_label_is_no_face() {
        let frame = SimCamera::new(Duration::ZERO).acquire().unwrap();
        let miss = SimClassifier::new(Arc::new(Fixed(None)))
            .classify(&frame)
            .unwrap_err();
        assert_eq!(miss, PerceptionMiss::NoFace);
    }
}
