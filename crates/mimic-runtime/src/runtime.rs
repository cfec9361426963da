use std::sync::Arc;

use tracing::{info, warn};

use mimic_core::{QuestGraph, StatusSink, Timing};

use crate::board::SessionBoard;
use crate::channel::{FrameReceiver, frame_channel};
use crate::error::RuntimeError;
use crate::frame::AnnotatedFrame;
use crate::perception::{PerceptionReader, perception_state};
use crate::pipeline::{PerceptionHandle, PerceptionLoop, StatsSnapshot};
use crate::session::GameSession;
use crate::source::{CaptureDevice, PerceptionSource};

/// External collaborators the runtime drives.
pub struct Collaborators {
    pub capture: Box<dyn CaptureDevice>,
    pub source: Box<dyn PerceptionSource>,
    pub sink: Arc<dyn StatusSink>,
}

/// The running game: one perception loop plus one session.
pub struct Runtime {
    session: GameSession,
    perception: Option<PerceptionHandle>,
    frames: Option<FrameReceiver<AnnotatedFrame>>,
    reader: PerceptionReader,
    sink: Arc<dyn StatusSink>,
    shut_down: bool,
}

impl Runtime {
    /// Open the capture device and start perceiving. Must be called inside a
    /// tokio runtime.
    pub fn start(
        parts: Collaborators,
        timing: Timing,
        quest: Arc<QuestGraph>,
    ) -> Result<Self, RuntimeError> {
        let (writer, reader) = perception_state();
        let (frame_tx, frame_rx) = frame_channel();
        let board = SessionBoard::new();

        let perception = PerceptionLoop::new(
            parts.capture,
            parts.source,
            writer,
            frame_tx,
            board.clone(),
        )
        .spawn()?;

        let session = GameSession::new(
            reader.clone(),
            parts.sink.clone(),
            board,
            timing,
            quest,
        );
        info!("runtime started");
        Ok(Self {
            session,
            perception: Some(perception),
            frames: Some(frame_rx),
            reader,
            sink: parts.sink,
            shut_down: false,
        })
    }

    pub fn session(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn perception(&self) -> &PerceptionReader {
        &self.reader
    }

    /// Hand the display end of the frame channel to its consumer. Only the
    /// first call returns it.
    pub fn frames(&mut self) -> Option<FrameReceiver<AnnotatedFrame>> {
        self.frames.take()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.perception
            .as_ref()
            .map(PerceptionHandle::stats)
            .unwrap_or_default()
    }

    /// Retire the active run, stop perception and release the camera, close
    /// the scene surface. Idempotent.
    pub async fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.session.close().await;

        if let Some(mut perception) = self.perception.take() {
            let stats = perception.stats();
            if let Err(err) = tokio::task::spawn_blocking(move || perception.stop()).await {
                warn!("perception stop failed: {err}");
            }
            info!(
                cycles = stats.cycles,
                misses = stats.misses,
                capture_failures = stats.capture_failures,
                evicted = stats.evicted,
                "perception stopped"
            );
        }
        self.sink.close_scene();
        info!("runtime shut down");
    }
}
