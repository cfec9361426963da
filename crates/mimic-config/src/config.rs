use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use mimic_core::constants::*;
use mimic_core::{EmotionLabel, QuestGraph, Timing};

use crate::error::{ConfigError, Result};
use crate::scenes::{builtin_quest, load_scenes};

/// Simulated camera cadence when no real device paces the loop (ms)
pub const FRAME_INTERVAL_MS: u64 = 33;

/// How often the display consumer drains the frame channel (ms)
pub const DISPLAY_REFRESH_MS: u64 = 15;

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    timing: TimingSection,
    perception: PerceptionSection,
    quest: QuestSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimingSection {
    poll_interval_ms: u64,
    max_unique_window_ms: u64,
    prompt_window_ms: u64,
    prompt_trials: u32,
    hold_countdown: u32,
    hold_countdown_step_ms: u64,
    duel_rounds: usize,
    duel_turn_window_ms: u64,
    duel_intro_ms: u64,
    duel_success_pause_ms: u64,
    duel_failure_pause_ms: u64,
    quest_read_delay_ms: u64,
    quest_reaction_window_ms: u64,
    quest_urgent_below_ms: u64,
    quest_advance_pause_ms: u64,
    quest_reset_pause_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            max_unique_window_ms: MAX_UNIQUE_WINDOW_MS,
            prompt_window_ms: PROMPT_WINDOW_MS,
            prompt_trials: PROMPT_TRIALS,
            hold_countdown: HOLD_COUNTDOWN,
            hold_countdown_step_ms: HOLD_COUNTDOWN_STEP_MS,
            duel_rounds: DUEL_ROUNDS,
            duel_turn_window_ms: DUEL_TURN_WINDOW_MS,
            duel_intro_ms: DUEL_INTRO_MS,
            duel_success_pause_ms: DUEL_SUCCESS_PAUSE_MS,
            duel_failure_pause_ms: DUEL_FAILURE_PAUSE_MS,
            quest_read_delay_ms: QUEST_READ_DELAY_MS,
            quest_reaction_window_ms: QUEST_REACTION_WINDOW_MS,
            quest_urgent_below_ms: QUEST_URGENT_BELOW_MS,
            quest_advance_pause_ms: QUEST_ADVANCE_PAUSE_MS,
            quest_reset_pause_ms: QUEST_RESET_PAUSE_MS,
        }
    }
}

impl TimingSection {
    fn into_timing(self) -> Result<Timing> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timing.poll_interval_ms must be positive".into(),
            ));
        }
        if self.prompt_trials == 0 {
            return Err(ConfigError::Invalid(
                "timing.prompt_trials must be at least 1".into(),
            ));
        }
        if !(1..=EmotionLabel::ALL.len()).contains(&self.duel_rounds) {
            return Err(ConfigError::Invalid(format!(
                "timing.duel_rounds must be between 1 and {}, got {}",
                EmotionLabel::ALL.len(),
                self.duel_rounds
            )));
        }
        let ms = Duration::from_millis;
        Ok(Timing {
            poll_interval: ms(self.poll_interval_ms),
            max_unique_window: ms(self.max_unique_window_ms),
            prompt_window: ms(self.prompt_window_ms),
            prompt_trials: self.prompt_trials,
            hold_countdown: self.hold_countdown,
            hold_countdown_step: ms(self.hold_countdown_step_ms),
            duel_rounds: self.duel_rounds,
            duel_turn_window: ms(self.duel_turn_window_ms),
            duel_intro: ms(self.duel_intro_ms),
            duel_success_pause: ms(self.duel_success_pause_ms),
            duel_failure_pause: ms(self.duel_failure_pause_ms),
            quest_read_delay: ms(self.quest_read_delay_ms),
            quest_reaction_window: ms(self.quest_reaction_window_ms),
            quest_urgent_below: ms(self.quest_urgent_below_ms),
            quest_advance_pause: ms(self.quest_advance_pause_ms),
            quest_reset_pause: ms(self.quest_reset_pause_ms),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PerceptionSection {
    frame_interval_ms: u64,
    display_refresh_ms: u64,
}

impl Default for PerceptionSection {
    fn default() -> Self {
        Self {
            frame_interval_ms: FRAME_INTERVAL_MS,
            display_refresh_ms: DISPLAY_REFRESH_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct QuestSection {
    scenes: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct PerceptionSettings {
    pub frame_interval: Duration,
    pub display_refresh: Duration,
}

/// Where the quest graph came from.
#[derive(Clone, Debug, PartialEq)]
pub enum QuestSource {
    Builtin,
    File(PathBuf),
}

/// Fully resolved, validated game configuration.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: Timing,
    pub perception: PerceptionSettings,
    pub quest: Arc<QuestGraph>,
    pub quest_source: QuestSource,
}

impl GameConfig {
    /// Defaults with the built-in quest.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str("", None)
    }

    /// Load from a TOML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str_with_origin(
            &content,
            path.parent(),
            &path.display().to_string(),
        )?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text. A relative `quest.scenes` path is resolved
    /// against `base_dir` when given.
    pub fn from_toml_str(content: &str, base_dir: Option<&Path>) -> Result<Self> {
        Self::from_toml_str_with_origin(content, base_dir, "config")
    }

    fn from_toml_str_with_origin(
        content: &str,
        base_dir: Option<&Path>,
        origin: &str,
    ) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        let timing = file.timing.into_timing()?;
        if file.perception.display_refresh_ms == 0 {
            return Err(ConfigError::Invalid(
                "perception.display_refresh_ms must be positive".into(),
            ));
        }
        let perception = PerceptionSettings {
            frame_interval: Duration::from_millis(file.perception.frame_interval_ms),
            display_refresh: Duration::from_millis(file.perception.display_refresh_ms),
        };

        let (quest, quest_source) = match file.quest.scenes {
            Some(p) => {
                let p = match base_dir {
                    Some(base) if p.is_relative() => base.join(p),
                    _ => p,
                };
                (load_scenes(&p)?, QuestSource::File(p))
            }
            None => (builtin_quest()?, QuestSource::Builtin),
        };

        Ok(Self {
            timing,
            perception,
            quest: Arc::new(quest),
            quest_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_defaults() {
        let c = GameConfig::builtin().unwrap();
        assert_eq!(c.timing, Timing::default());
        assert_eq!(c.quest_source, QuestSource::Builtin);
        assert_eq!(c.perception.display_refresh, Duration::from_millis(15));
    }

    #[test]
    fn test_partial_timing_override() {
        let c = GameConfig::from_toml_str(
            "[timing]\nmax_unique_window_ms = 500\npoll_interval_ms = 10\n",
            None,
        )
        .unwrap();
        assert_eq!(c.timing.max_unique_window, Duration::from_millis(500));
        assert_eq!(c.timing.poll_interval, Duration::from_millis(10));
        assert_eq!(c.timing.prompt_window, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_poll_rejected() {
        let err = GameConfig::from_toml_str("[timing]\npoll_interval_ms = 0\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_duel_rounds_bounded_by_label_set() {
        let err = GameConfig::from_toml_str("[timing]\nduel_rounds = 7\n", None).unwrap_err();
        assert!(err.to_string().contains("duel_rounds"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GameConfig::from_toml_str("[timing]\npol_interval_ms = 5\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
