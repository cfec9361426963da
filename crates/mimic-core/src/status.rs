//! Status lines shown to players. Kept here so every front-end and every
//! test sees the same wording.

use std::time::Duration;

use crate::duel::{DuelVerdict, Player};
use crate::emotion::EmotionLabel;
use crate::quest::QuestOutcome;

pub const CHOOSE_MODE_FIRST: &str = "Choose a mode first!";
pub const CHOOSE_HOLD_TARGET: &str = "Choose an emotion to hold!";
pub const SHOW_DIFFERENT: &str = "Show different emotions!";
pub const HOLD_GO: &str = "Go! Hold the emotion!";
pub const DUEL_INTRO: &str = "Duel begins! Get ready!";
pub const QUEST_SUCCESS_STEP: &str = "Success! Moving to the next scene...";
pub const QUEST_TIMEOUT: &str = "Time's up! Starting the quest over.";
pub const NO_FACE: &str = "No face detected";

pub fn max_unique_progress(secs_left: u64, distinct: usize) -> String {
    format!("Time left: {secs_left}s | Unique emotions: {distinct}")
}

pub fn max_unique_final(distinct: usize) -> String {
    format!("Game over! You showed {distinct} different emotions!")
}

pub fn prompt_show(target: EmotionLabel) -> String {
    format!("Show: {}!", target.shout())
}

pub fn prompt_final(successes: u32, trials: u32) -> String {
    format!("Correct answers: {successes} of {trials}")
}

pub fn hold_countdown(tick: u32) -> String {
    format!("Get ready... {tick}")
}

pub fn hold_progress(current: Duration, best: Duration) -> String {
    format!(
        "Held: {:.1}s | Best: {:.1}s",
        current.as_secs_f64(),
        best.as_secs_f64()
    )
}

pub fn hold_final(best: Duration) -> String {
    format!("Final result: {:.1} seconds!", best.as_secs_f64())
}

pub fn duel_turn(round: usize, player: Player, target: EmotionLabel) -> String {
    format!("Round {round} | {player} | Show: {}!", target.shout())
}

pub fn duel_turn_result(player: Player, matched: bool) -> String {
    if matched {
        format!("{player}: Success!")
    } else {
        format!("{player}: Time's up!")
    }
}

pub fn duel_final(verdict: DuelVerdict, scores: [u32; 2]) -> String {
    format!(
        "Duel finished! {verdict} Score: {} - {}",
        scores[0], scores[1]
    )
}

pub fn quest_get_ready(read_delay: Duration) -> String {
    format!(
        "Get ready... reacting starts in {} seconds",
        read_delay.as_secs()
    )
}

pub fn quest_react_now(window: Duration) -> String {
    format!("Show the emotion! You have {} seconds", window.as_secs())
}

pub fn quest_time_left(secs_left: u64) -> String {
    format!("Time left: {secs_left}s")
}

pub fn quest_final(outcome: QuestOutcome) -> &'static str {
    match outcome {
        QuestOutcome::Success => "Quest complete! Start again to replay.",
        QuestOutcome::Failure => "Mission failed! Start again to try another way.",
    }
}

/// Overlay text for the current reading.
pub fn current_reading(label: Option<EmotionLabel>) -> String {
    match label {
        Some(l) => format!("Current: {}", l.shout()),
        None => format!("Current: {}", NO_FACE.to_uppercase()),
    }
}
