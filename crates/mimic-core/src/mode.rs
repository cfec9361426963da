use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::duel::DuelVerdict;
use crate::quest::{QuestOutcome, SceneId};

/// The five playable game modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Show as many distinct emotions as possible in a fixed window.
    MaxUnique,
    /// Imitate randomly prompted emotions.
    PromptMatch,
    /// Keep one chosen emotion on your face for as long as possible.
    Hold,
    /// Two players take turns matching the same prompts.
    Duel,
    /// Branching story driven by your expressions.
    Quest,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::MaxUnique,
        Mode::PromptMatch,
        Mode::Hold,
        Mode::Duel,
        Mode::Quest,
    ];

    /// Short name used on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Mode::MaxUnique => "max",
            Mode::PromptMatch => "prompt",
            Mode::Hold => "hold",
            Mode::Duel => "duel",
            Mode::Quest => "quest",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::MaxUnique => "Maximum emotions",
            Mode::PromptMatch => "Emotion imitation",
            Mode::Hold => "Emotion hold",
            Mode::Duel => "Emotion duel (2 players)",
            Mode::Quest => "Emotional quest",
        }
    }

    /// Hold needs a target chosen before the engine can start.
    pub fn needs_target(&self) -> bool {
        matches!(self, Mode::Hold)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

/// Final result of a run that reached its own end.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeReport {
    MaxUnique {
        distinct: usize,
    },
    PromptMatch {
        successes: u32,
        trials: u32,
    },
    Hold {
        best_secs: f64,
    },
    Duel {
        scores: [u32; 2],
        verdict: DuelVerdict,
    },
    Quest {
        scene: SceneId,
        outcome: QuestOutcome,
    },
}

impl ModeReport {
    pub fn mode(&self) -> Mode {
        match self {
            ModeReport::MaxUnique { .. } => Mode::MaxUnique,
            ModeReport::PromptMatch { .. } => Mode::PromptMatch,
            ModeReport::Hold { .. } => Mode::Hold,
            ModeReport::Duel { .. } => Mode::Duel,
            ModeReport::Quest { .. } => Mode::Quest,
        }
    }
}

/// How a mode run ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { report: ModeReport },
    Cancelled,
}

impl RunOutcome {
    pub fn report(&self) -> Option<&ModeReport> {
        match self {
            RunOutcome::Completed { report } => Some(report),
            RunOutcome::Cancelled => None,
        }
    }
}

impl From<ModeReport> for RunOutcome {
    fn from(report: ModeReport) -> Self {
        RunOutcome::Completed { report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys_roundtrip() {
        for m in Mode::ALL {
            assert_eq!(m.key().parse::<Mode>(), Ok(m));
        }
        assert!("chess".parse::<Mode>().is_err());
    }

    #[test]
    fn test_only_hold_needs_target() {
        let needing: Vec<Mode> = Mode::ALL.into_iter().filter(|m| m.needs_target()).collect();
        assert_eq!(needing, vec![Mode::Hold]);
    }

    #[test]
    fn test_report_json_shape() {
        let out: RunOutcome = ModeReport::PromptMatch {
            successes: 2,
            trials: 3,
        }
        .into();
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["outcome"], "completed");
        assert_eq!(v["report"]["mode"], "prompt_match");
        assert_eq!(v["report"]["successes"], 2);
        assert_eq!(out.report().map(|r| r.mode()), Some(Mode::PromptMatch));
    }
}
