use std::time::Duration;

use crate::constants::*;

/// Every duration the mode engines wait on.
///
/// Defaults reproduce the shipped game; tests and the CLI shrink them
/// through configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub max_unique_window: Duration,
    pub prompt_window: Duration,
    pub prompt_trials: u32,
    pub hold_countdown: u32,
    pub hold_countdown_step: Duration,
    pub duel_rounds: usize,
    pub duel_turn_window: Duration,
    pub duel_intro: Duration,
    pub duel_success_pause: Duration,
    pub duel_failure_pause: Duration,
    pub quest_read_delay: Duration,
    pub quest_reaction_window: Duration,
    pub quest_urgent_below: Duration,
    pub quest_advance_pause: Duration,
    pub quest_reset_pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_unique_window: Duration::from_millis(MAX_UNIQUE_WINDOW_MS),
            prompt_window: Duration::from_millis(PROMPT_WINDOW_MS),
            prompt_trials: PROMPT_TRIALS,
            hold_countdown: HOLD_COUNTDOWN,
            hold_countdown_step: Duration::from_millis(HOLD_COUNTDOWN_STEP_MS),
            duel_rounds: DUEL_ROUNDS,
            duel_turn_window: Duration::from_millis(DUEL_TURN_WINDOW_MS),
            duel_intro: Duration::from_millis(DUEL_INTRO_MS),
            duel_success_pause: Duration::from_millis(DUEL_SUCCESS_PAUSE_MS),
            duel_failure_pause: Duration::from_millis(DUEL_FAILURE_PAUSE_MS),
            quest_read_delay: Duration::from_millis(QUEST_READ_DELAY_MS),
            quest_reaction_window: Duration::from_millis(QUEST_REACTION_WINDOW_MS),
            quest_urgent_below: Duration::from_millis(QUEST_URGENT_BELOW_MS),
            quest_advance_pause: Duration::from_millis(QUEST_ADVANCE_PAUSE_MS),
            quest_reset_pause: Duration::from_millis(QUEST_RESET_PAUSE_MS),
        }
    }
}

/// Whole seconds left in a window, rounded down. Matches what the
/// status line shows: 9.95s left reads as "9".
pub fn whole_secs_left(window: Duration, elapsed: Duration) -> u64 {
    window.saturating_sub(elapsed).as_secs()
}
