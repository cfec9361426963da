//! Rules and data model for the mimic emotion games.
//!
//! Five modes ask players to match facial-emotion labels reported by an
//! external classifier: collect distinct emotions, imitate prompts, hold one
//! emotion, duel another player, or steer a branching quest. This crate holds
//! everything about those games that does not depend on time passing or on
//! threads: labels and face regions, the validated quest graph, per-mode
//! scoring rules, target decks, and the status wording.
//!
//! Zero I/O. The async orchestration lives in `mimic-runtime`.

pub mod constants;
pub mod deck;
pub mod duel;
pub mod emotion;
pub mod mode;
pub mod quest;
pub mod sink;
pub mod status;
pub mod tally;
pub mod timing;

pub use deck::TargetDeck;
pub use duel::{DuelState, DuelVerdict, Player};
pub use emotion::{EmotionLabel, FaceRegion, UnknownLabel};
pub use mode::{Mode, ModeReport, RunOutcome};
pub use quest::{QuestGraph, QuestGraphError, QuestOutcome, QuestScene, QuestWalker, SceneId, Step};
pub use sink::{NullSink, StatusSink};
pub use tally::{HoldStep, HoldTracker, PromptTally, UniqueTally};
pub use timing::{Timing, whole_secs_left};
