use std::sync::Arc;

use mimic_core::status::current_reading;
use mimic_core::{EmotionLabel, FaceRegion, Mode};

use crate::board::{BoardState, DuelBoard, TargetDisplay};
use crate::perception::PerceptionSnapshot;

/// One raw image from the capture device. Pixel data is shared, so cloning
/// a frame is cheap and never copies the image.
#[derive(Clone, Debug)]
pub struct Frame {
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl Frame {
    pub fn new(seq: u64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            seq,
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

/// Annotations a renderer draws over a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
    pub face: Option<FaceRegion>,
    pub current: Option<EmotionLabel>,
    pub target: Option<TargetDisplay>,
    pub duel: Option<DuelBoard>,
}

impl Overlay {
    /// Target and scoreboard are only shown while a run is active; the
    /// scoreboard only for a duel.
    pub fn compose(snapshot: &PerceptionSnapshot, board: &BoardState) -> Self {
        let target = if board.active { board.target } else { None };
        let duel = if board.active && board.mode == Some(Mode::Duel) {
            board.duel
        } else {
            None
        };
        Self {
            face: snapshot.region,
            current: snapshot.label,
            target,
            duel,
        }
    }

    /// Text lines in drawing order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        if let Some(target) = self.target {
            lines.push(target.to_string());
        }
        lines.push(current_reading(self.current));
        if let Some(duel) = &self.duel {
            lines.push(format!(
                "{} | Round {}/{}",
                duel.player, duel.round, duel.rounds
            ));
            lines.push(format!("Score: {} - {}", duel.scores[0], duel.scores[1]));
        }
        lines
    }
}

/// A frame together with the annotations captured for it. The source frame
/// is left untouched.
#[derive(Clone, Debug)]
pub struct AnnotatedFrame {
    pub frame: Frame,
    pub overlay: Overlay,
}
