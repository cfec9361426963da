//! Start, stop and replace game runs. At most one run is active at a time.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use mimic_core::{EmotionLabel, Mode, QuestGraph, RunOutcome, StatusSink, TargetDeck, Timing, status};

use crate::board::SessionBoard;
use crate::engine::{Duel, EngineContext, Hold, MaxUnique, ModeEngine, PromptMatch, Quest};
use crate::error::SessionError;
use crate::perception::PerceptionReader;

struct ActiveRun {
    id: Uuid,
    mode: Mode,
    cancel: CancellationToken,
    handle: JoinHandle<RunOutcome>,
}

/// A stopped run still owns the board and may post its final status. A
/// replaced run loses the board before it exits.
#[derive(Clone, Copy, Debug)]
enum Retire {
    Stop,
    Replace,
}

pub struct GameSession {
    perception: PerceptionReader,
    sink: Arc<dyn StatusSink>,
    board: SessionBoard,
    timing: Arc<Timing>,
    quest: Arc<QuestGraph>,
    rng: SmallRng,
    scripted: Option<Vec<EmotionLabel>>,
    active: Option<ActiveRun>,
    pending_hold: bool,
    epoch: u64,
    closed: bool,
}

impl GameSession {
    pub fn new(
        perception: PerceptionReader,
        sink: Arc<dyn StatusSink>,
        board: SessionBoard,
        timing: Timing,
        quest: Arc<QuestGraph>,
    ) -> Self {
        Self {
            perception,
            sink,
            board,
            timing: Arc::new(timing),
            quest,
            rng: SmallRng::from_os_rng(),
            scripted: None,
            active: None,
            pending_hold: false,
            epoch: 0,
            closed: false,
        }
    }

    /// Make target draws reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Targets for the next PromptMatch or Duel run, in order. Random draws
    /// take over once they run out.
    pub fn script_targets(&mut self, targets: Vec<EmotionLabel>) {
        self.scripted = Some(targets);
    }

    pub fn board(&self) -> &SessionBoard {
        &self.board
    }

    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|r| !r.handle.is_finished())
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.active.as_ref().map(|r| r.mode)
    }

    /// Hold was started and is waiting for [`select_target`](Self::select_target).
    pub fn awaiting_target(&self) -> bool {
        self.pending_hold
    }

    /// Retire whatever is running and start `mode`.
    ///
    /// Hold does not start yet: it waits for a target selection.
    pub async fn start_mode(&mut self, mode: Option<Mode>) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        let Some(mode) = mode else {
            self.sink.set_status(status::CHOOSE_MODE_FIRST);
            return Err(SessionError::InvalidSelection);
        };

        self.retire(Retire::Replace).await;
        self.pending_hold = false;

        let engine = match mode {
            Mode::MaxUnique => ModeEngine::MaxUnique(MaxUnique),
            Mode::PromptMatch => ModeEngine::PromptMatch(PromptMatch::new(self.deck())),
            Mode::Hold => {
                self.pending_hold = true;
                self.sink.set_status(status::CHOOSE_HOLD_TARGET);
                info!("hold selected, waiting for a target");
                return Ok(());
            }
            Mode::Duel => {
                let targets = self.deck().draw_distinct(self.timing.duel_rounds);
                ModeEngine::Duel(Duel::new(targets))
            }
            Mode::Quest => ModeEngine::Quest(Quest::new(self.quest.clone())),
        };
        self.launch(engine);
        Ok(())
    }

    /// Complete a pending Hold start.
    pub async fn select_target(&mut self, target: EmotionLabel) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if !self.pending_hold {
            return Err(SessionError::NoPendingSelection);
        }
        self.pending_hold = false;
        self.launch(ModeEngine::Hold(Hold::new(target)));
        Ok(())
    }

    /// Cancel the active run and wait for it to exit.
    pub async fn stop_active(&mut self) -> Option<RunOutcome> {
        self.pending_hold = false;
        self.retire(Retire::Stop).await
    }

    /// Wait for the active run to end on its own.
    ///
    /// Cancel-safe: if this future is dropped the run stays active.
    pub async fn wait(&mut self) -> Option<RunOutcome> {
        let run = self.active.as_mut()?;
        let joined = (&mut run.handle).await;
        let run = self.active.take()?;
        Self::joined(run.id, joined)
    }

    /// Retire the run and refuse further starts. Idempotent.
    pub async fn close(&mut self) -> Option<RunOutcome> {
        self.closed = true;
        self.stop_active().await
    }

    fn deck(&mut self) -> TargetDeck {
        match self.scripted.take() {
            Some(targets) => TargetDeck::scripted(targets),
            None => TargetDeck::Random(SmallRng::from_rng(&mut self.rng)),
        }
    }

    fn launch(&mut self, engine: ModeEngine) {
        self.epoch += 1;
        let mode = engine.mode();
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        self.board.begin(self.epoch, mode);

        let ctx = EngineContext::new(
            self.perception.clone(),
            self.sink.clone(),
            self.board.clone(),
            self.timing.clone(),
            cancel.clone(),
            self.epoch,
        );
        let span = info_span!("run", %mode, run_id = %id, epoch = self.epoch);
        let handle = tokio::spawn(engine.run(ctx).instrument(span));
        self.active = Some(ActiveRun {
            id,
            mode,
            cancel,
            handle,
        });
    }

    async fn retire(&mut self, how: Retire) -> Option<RunOutcome> {
        let run = self.active.take()?;
        run.cancel.cancel();
        match how {
            Retire::Stop => self.board.deactivate(),
            Retire::Replace => self.board.release(),
        }
        info!(run_id = %run.id, mode = %run.mode, "retiring run");
        let joined = run.handle.await;
        Self::joined(run.id, joined)
    }

    fn joined(
        id: Uuid,
        joined: Result<RunOutcome, tokio::task::JoinError>,
    ) -> Option<RunOutcome> {
        match joined {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(run_id = %id, "run ended abnormally: {err}");
                None
            }
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel.cancel();
        }
    }
}
