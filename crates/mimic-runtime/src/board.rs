//! What the active run wants drawn on top of each frame.
//!
//! Engines write, the perception loop reads. Every write carries the epoch
//! of the run that made it; writes from a retired run are dropped.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use mimic_core::status::SHOW_DIFFERENT;
use mimic_core::{DuelState, EmotionLabel, Mode, Player, SceneId};

/// Target line of the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetDisplay {
    Emotion(EmotionLabel),
    /// MaxUnique: any label not yet shown.
    AnyDistinct,
}

impl fmt::Display for TargetDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDisplay::Emotion(label) => write!(f, "Target: {}", label.shout()),
            TargetDisplay::AnyDistinct => f.write_str(SHOW_DIFFERENT),
        }
    }
}

/// Duel scoreboard as drawn on the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DuelBoard {
    pub player: Player,
    pub round: usize,
    pub rounds: usize,
    pub scores: [u32; 2],
}

impl From<&DuelState> for DuelBoard {
    fn from(duel: &DuelState) -> Self {
        Self {
            player: duel.current_player(),
            round: duel.round(),
            rounds: duel.rounds(),
            scores: duel.scores(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardState {
    pub epoch: u64,
    pub mode: Option<Mode>,
    pub active: bool,
    pub target: Option<TargetDisplay>,
    pub duel: Option<DuelBoard>,
    pub quest_scene: Option<SceneId>,
}

#[derive(Clone, Debug)]
pub struct SessionBoard {
    tx: Arc<watch::Sender<BoardState>>,
}

impl Default for SessionBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    /// Whether `epoch` is the run the board currently belongs to.
    pub fn is_owned_by(&self, epoch: u64) -> bool {
        self.tx.borrow().epoch == epoch
    }

    /// Reset to a fresh active board owned by `epoch`.
    pub fn begin(&self, epoch: u64, mode: Mode) {
        self.tx.send_replace(BoardState {
            epoch,
            mode: Some(mode),
            active: true,
            ..BoardState::default()
        });
    }

    /// Apply `f` if `epoch` still owns the board. Returns whether it did.
    pub fn update(&self, epoch: u64, f: impl FnOnce(&mut BoardState)) -> bool {
        self.tx.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            f(state);
            true
        })
    }

    /// Mark whatever run owns the board as no longer active.
    pub fn deactivate(&self) {
        self.tx.send_if_modified(|state| std::mem::replace(&mut state.active, false));
    }

    /// Take the board away from its run, ahead of a replacement. Writes
    /// from the released run are dropped from here on.
    pub fn release(&self) {
        self.tx.send_replace(BoardState::default());
    }
}
