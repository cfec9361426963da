//! Concurrent side of mimic.
//!
//! A dedicated thread runs the perception loop: it pulls frames from a
//! [`CaptureDevice`], asks a [`PerceptionSource`] for an emotion, publishes
//! the reading through a watch-style [`PerceptionReader`], and hands the
//! annotated frame to a display consumer through a single-slot
//! [`FrameReceiver`]. Game runs are tokio tasks owned by a [`GameSession`];
//! each polls the latest reading and reports through a `StatusSink`.

pub mod board;
pub mod channel;
pub mod engine;
pub mod error;
pub mod frame;
pub mod perception;
pub mod pipeline;
pub mod runtime;
pub mod session;
pub mod source;

pub use board::{BoardState, DuelBoard, SessionBoard, TargetDisplay};
pub use channel::{FrameReceiver, FrameSender, frame_channel};
pub use engine::{Cancelled, EngineContext, ModeEngine};
pub use error::{CaptureError, PerceptionMiss, RuntimeError, SessionError};
pub use frame::{AnnotatedFrame, Frame, Overlay};
pub use perception::{PerceptionReader, PerceptionSnapshot, PerceptionWriter, perception_state};
pub use pipeline::{PerceptionHandle, PerceptionLoop, PerceptionStats, StatsSnapshot};
pub use runtime::{Collaborators, Runtime};
pub use session::GameSession;
pub use source::{CaptureDevice, Classification, PerceptionSource};
