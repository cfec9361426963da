//! The five game loops.
//!
//! Every engine polls the perception reading, applies its mode's rules via
//! `mimic-core`, and reports through the [`StatusSink`]. All waiting goes
//! through [`EngineContext`], which races each sleep against the run's
//! cancellation token, so a retired run stops at its next suspension point.

mod duel;
mod hold;
mod max_unique;
mod prompt;
mod quest;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use mimic_core::{EmotionLabel, Mode, ModeReport, RunOutcome, StatusSink, Timing};

use crate::board::{BoardState, SessionBoard};
use crate::perception::PerceptionReader;

pub use duel::Duel;
pub use hold::Hold;
pub use max_unique::MaxUnique;
pub use prompt::PromptMatch;
pub use quest::Quest;

/// The run was cancelled before it reached its own end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cancelled;

/// Everything a running engine may touch.
pub struct EngineContext {
    perception: PerceptionReader,
    sink: Arc<dyn StatusSink>,
    board: SessionBoard,
    timing: Arc<Timing>,
    cancel: CancellationToken,
    epoch: u64,
}

impl EngineContext {
    pub fn new(
        perception: PerceptionReader,
        sink: Arc<dyn StatusSink>,
        board: SessionBoard,
        timing: Arc<Timing>,
        cancel: CancellationToken,
        epoch: u64,
    ) -> Self {
        Self {
            perception,
            sink,
            board,
            timing,
            cancel,
            epoch,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn sink(&self) -> &dyn StatusSink {
        self.sink.as_ref()
    }

    /// Current perception label.
    pub fn reading(&self) -> Option<EmotionLabel> {
        self.perception.label()
    }

    /// Write to the board if this run still owns it.
    pub fn board(&self, f: impl FnOnce(&mut BoardState)) {
        self.board.update(self.epoch, f);
    }

    /// Post a run's closing line. A run that lost the board to a newer one
    /// stays quiet so it cannot overwrite the newer run's status.
    pub fn final_status(&self, text: &str) {
        if self.board.is_owned_by(self.epoch) {
            self.sink.set_status(text);
        }
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `d` unless cancelled first.
    pub async fn pause(&self, d: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(d) => Ok(()),
        }
    }

    /// One polling interval.
    pub async fn poll(&self) -> Result<(), Cancelled> {
        self.pause(self.timing.poll_interval).await
    }

    /// Poll the reading until `accept` returns a value or `window` runs out.
    ///
    /// `accept` sees every reading first, so a match present at entry ends
    /// the window without waiting. `on_tick` runs after each non-matching
    /// poll with the elapsed time. `Ok(None)` means the window expired.
    pub async fn wait_for<T>(
        &self,
        window: Duration,
        mut accept: impl FnMut(Option<EmotionLabel>) -> Option<T>,
        mut on_tick: impl FnMut(Duration),
    ) -> Result<Option<T>, Cancelled> {
        let start = Instant::now();
        loop {
            self.check()?;
            let elapsed = start.elapsed();
            if elapsed >= window {
                return Ok(None);
            }
            if let Some(hit) = accept(self.reading()) {
                return Ok(Some(hit));
            }
            on_tick(elapsed);
            self.poll().await?;
        }
    }
}

/// One game run, ready to be driven to completion.
#[derive(Debug)]
pub enum ModeEngine {
    MaxUnique(MaxUnique),
    PromptMatch(PromptMatch),
    Hold(Hold),
    Duel(Duel),
    Quest(Quest),
}

impl ModeEngine {
    pub fn mode(&self) -> Mode {
        match self {
            ModeEngine::MaxUnique(_) => Mode::MaxUnique,
            ModeEngine::PromptMatch(_) => Mode::PromptMatch,
            ModeEngine::Hold(_) => Mode::Hold,
            ModeEngine::Duel(_) => Mode::Duel,
            ModeEngine::Quest(_) => Mode::Quest,
        }
    }

    /// Drive the run until it ends on its own or `ctx` is cancelled. The
    /// board is marked inactive either way.
    pub async fn run(self, ctx: EngineContext) -> RunOutcome {
        let mode = self.mode();
        info!("{mode} run started");
        let result: Result<ModeReport, Cancelled> = match self {
            ModeEngine::MaxUnique(e) => e.run(&ctx).await,
            ModeEngine::PromptMatch(e) => e.run(&ctx).await,
            ModeEngine::Hold(e) => e.run(&ctx).await,
            ModeEngine::Duel(e) => e.run(&ctx).await,
            ModeEngine::Quest(e) => e.run(&ctx).await,
        };
        ctx.board(|b| b.active = false);
        match result {
            Ok(report) => {
                info!(?report, "{mode} run finished");
                report.into()
            }
            Err(Cancelled) => {
                info!("{mode} run cancelled");
                RunOutcome::Cancelled
            }
        }
    }
}
