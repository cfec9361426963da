//! Scoring rules for the single-player modes.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::emotion::EmotionLabel;

/// Distinct labels collected during one MaxUnique run.
#[derive(Clone, Debug, Default)]
pub struct UniqueTally {
    seen: BTreeSet<EmotionLabel>,
}

impl UniqueTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. Returns the label if it was new this run.
    pub fn observe(&mut self, label: Option<EmotionLabel>) -> Option<EmotionLabel> {
        let label = label?;
        self.seen.insert(label).then_some(label)
    }

    pub fn count(&self) -> usize {
        self.seen.len()
    }

    pub fn contains(&self, label: EmotionLabel) -> bool {
        self.seen.contains(&label)
    }
}

/// Successes across the PromptMatch trials.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptTally {
    successes: u32,
    played: u32,
}

impl PromptTally {
    pub fn record(&mut self, matched: bool) {
        self.played += 1;
        if matched {
            self.successes += 1;
        }
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn played(&self) -> u32 {
        self.played
    }
}

/// What one Hold poll decided.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoldStep {
    Holding { current: Duration, best: Duration },
    /// The target was lost; the current hold is over and reads as zero.
    Broken { best: Duration },
}

/// Tracks how long a single target label has been held continuously.
///
/// There is no grace period: the first poll whose label differs from the
/// target (an absent label included) ends the hold.
#[derive(Clone, Debug)]
pub struct HoldTracker {
    target: EmotionLabel,
    current: Duration,
    best: Duration,
    broken: bool,
}

impl HoldTracker {
    pub fn new(target: EmotionLabel) -> Self {
        Self {
            target,
            current: Duration::ZERO,
            best: Duration::ZERO,
            broken: false,
        }
    }

    pub fn target(&self) -> EmotionLabel {
        self.target
    }

    /// Feed one reading taken `elapsed` after the hold timer started.
    pub fn observe(&mut self, label: Option<EmotionLabel>, elapsed: Duration) -> HoldStep {
        if self.broken || label != Some(self.target) {
            self.broken = true;
            self.current = Duration::ZERO;
            return HoldStep::Broken { best: self.best };
        }
        self.current = elapsed;
        self.best = self.best.max(elapsed);
        HoldStep::Holding {
            current: self.current,
            best: self.best,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn best(&self) -> Duration {
        self.best
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }
}
