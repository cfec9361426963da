//! The perception loop: capture, classify, publish, annotate, hand off.
//!
//! The classifier blocks, so the loop owns a dedicated OS thread for the
//! lifetime of the process. Nothing a single cycle does can end the loop;
//! only the stop token does.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::board::SessionBoard;
use crate::channel::FrameSender;
use crate::error::RuntimeError;
use crate::frame::{AnnotatedFrame, Frame, Overlay};
use crate::perception::{PerceptionSnapshot, PerceptionWriter};
use crate::source::{CaptureDevice, PerceptionSource};

/// Counters kept by the perception loop.
#[derive(Debug, Default)]
pub struct PerceptionStats {
    cycles: AtomicU64,
    capture_failures: AtomicU64,
    misses: AtomicU64,
    evicted: AtomicU64,
}

/// Point-in-time copy of [`PerceptionStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cycles: u64,
    pub capture_failures: u64,
    pub misses: u64,
    pub evicted: u64,
}

impl PerceptionStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            capture_failures: self.capture_failures.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct PerceptionLoop {
    capture: Box<dyn CaptureDevice>,
    source: Box<dyn PerceptionSource>,
    writer: PerceptionWriter,
    frames: FrameSender<AnnotatedFrame>,
    board: SessionBoard,
    stats: Arc<PerceptionStats>,
}

impl PerceptionLoop {
    pub fn new(
        capture: Box<dyn CaptureDevice>,
        source: Box<dyn PerceptionSource>,
        writer: PerceptionWriter,
        frames: FrameSender<AnnotatedFrame>,
        board: SessionBoard,
    ) -> Self {
        Self {
            capture,
            source,
            writer,
            frames,
            board,
            stats: Arc::new(PerceptionStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<PerceptionStats> {
        self.stats.clone()
    }

    /// Open the capture device, then start the loop thread. An open failure
    /// is returned as-is and never retried.
    pub fn spawn(mut self) -> Result<PerceptionHandle, RuntimeError> {
        self.capture
            .open()
            .map_err(RuntimeError::ResourceUnavailable)?;

        let stop = CancellationToken::new();
        let stats = self.stats.clone();
        let token = stop.clone();
        let thread = thread::Builder::new()
            .name("mimic-perception".into())
            .spawn(move || self.run(token))
            .map_err(RuntimeError::Thread)?;

        Ok(PerceptionHandle {
            stop,
            thread: Some(thread),
            stats,
        })
    }

    fn run(mut self, stop: CancellationToken) {
        info!("perception loop started");
        while !stop.is_cancelled() {
            match self.capture.acquire() {
                Ok(frame) => {
                    self.cycle(frame);
                }
                Err(err) => {
                    PerceptionStats::bump(&self.stats.capture_failures);
                    trace!("capture skipped: {err}");
                }
            }
        }
        self.capture.release();
        info!(
            cycles = self.stats.cycles.load(Ordering::Relaxed),
            "perception loop stopped"
        );
    }

    /// One full cycle for an already acquired frame.
    pub fn cycle(&mut self, frame: Frame) -> PerceptionSnapshot {
        let snapshot = match self
            .source
            .classify(&frame)
            .and_then(|c| c.resolve(&frame))
        {
            Ok((label, region)) => self.writer.publish(label, Some(region)),
            Err(miss) => {
                PerceptionStats::bump(&self.stats.misses);
                trace!("perception miss: {miss}");
                self.writer.clear()
            }
        };
        PerceptionStats::bump(&self.stats.cycles);

        let overlay = Overlay::compose(&snapshot, &self.board.snapshot());
        if self.frames.put(AnnotatedFrame { frame, overlay }) {
            PerceptionStats::bump(&self.stats.evicted);
        }
        snapshot
    }
}

/// Owner of the running loop thread. Stopping joins the thread; the thread
/// releases the capture device on its way out.
pub struct PerceptionHandle {
    stop: CancellationToken,
    thread: Option<JoinHandle<()>>,
    stats: Arc<PerceptionStats>,
}

impl PerceptionHandle {
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        self.stop.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("perception thread panicked");
            }
        }
    }
}

impl Drop for PerceptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::frame_channel;
    use crate::error::{CaptureError, PerceptionMiss};
    use crate::perception::perception_state;
    use crate::source::Classification;
    use mimic_core::{EmotionLabel, FaceRegion, Mode};

    struct StillCamera;

    impl CaptureDevice for StillCamera {
        fn open(&mut self) -> Result<(), CaptureError> {
            Ok(())
        }
        fn acquire(&mut self) -> Result<Frame, CaptureError> {
            Ok(Frame::new(0, 640, 480, Vec::new()))
        }
        fn release(&mut self) {}
    }

    struct Fixed(Result<Classification, PerceptionMiss>);

    impl PerceptionSource for Fixed {
        fn classify(&self, _frame: &Frame) -> Result<Classification, PerceptionMiss> {
            self.0.clone()
        }
    }

    fn happy_half_size() -> Fixed {
        Fixed(Ok(Classification {
            raw_label: "happy".into(),
            region: FaceRegion::new(5, 5, 10, 10),
            analysed_width: 320,
            analysed_height: 240,
        }))
    }

    #[test]
    fn test_cycle_publishes_scaled_reading_and_frame() {
        let (writer, reader) = perception_state();
        let (tx, rx) = frame_channel();
        let board = SessionBoard::new();
        board.begin(1, Mode::PromptMatch);
        board.update(1, |b| {
            b.target = Some(crate::board::TargetDisplay::Emotion(EmotionLabel::Joy))
        });
        let mut pl = PerceptionLoop::new(
            Box::new(StillCamera),
            Box::new(happy_half_size()),
            writer,
            tx,
            board,
        );

        let snap = pl.cycle(Frame::new(1, 640, 480, Vec::new()));
        assert_eq!(snap.label, Some(EmotionLabel::Joy));
        assert_eq!(snap.region, Some(FaceRegion::new(10, 10, 20, 20)));
        assert_eq!(reader.snapshot(), snap);

        let annotated = rx.try_take().unwrap();
        assert_eq!(annotated.frame.seq, 1);
        assert_eq!(annotated.overlay.face, snap.region);
        assert!(annotated.overlay.target.is_some());
    }

    #[test]
    fn test_miss_publishes_absent_and_counts() {
        let (writer, reader) = perception_state();
        let (tx, _rx) = frame_channel();
        let mut pl = PerceptionLoop::new(
            Box::new(StillCamera),
            Box::new(Fixed(Err(PerceptionMiss::NoFace))),
            writer,
            tx,
            SessionBoard::new(),
        );
        pl.cycle(Frame::new(1, 640, 480, Vec::new()));
        pl.cycle(Frame::new(2, 640, 480, Vec::new()));

        let s = reader.snapshot();
        assert_eq!((s.label, s.region), (None, None));
        let stats = pl.stats().snapshot();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.evicted, 1);
    }
}
