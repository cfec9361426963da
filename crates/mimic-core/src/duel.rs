use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DUEL_PLAYERS;
use crate::emotion::EmotionLabel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const TURN_ORDER: [Player; DUEL_PLAYERS] = [Player::One, Player::Two];

    pub fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// 1-based number shown to the players.
    pub fn number(&self) -> usize {
        self.index() + 1
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelVerdict {
    Winner(Player),
    Draw,
}

impl DuelVerdict {
    /// Strict score comparison; equal scores draw.
    pub fn from_scores(scores: [u32; 2]) -> Self {
        use std::cmp::Ordering;
        match scores[0].cmp(&scores[1]) {
            Ordering::Greater => DuelVerdict::Winner(Player::One),
            Ordering::Less => DuelVerdict::Winner(Player::Two),
            Ordering::Equal => DuelVerdict::Draw,
        }
    }
}

impl fmt::Display for DuelVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelVerdict::Winner(p) => write!(f, "{p} wins!"),
            DuelVerdict::Draw => f.write_str("Draw!"),
        }
    }
}

/// Scoreboard of a two-player duel.
///
/// Rounds are played in target order; inside a round players go in
/// [`Player::TURN_ORDER`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuelState {
    targets: Vec<EmotionLabel>,
    scores: [u32; 2],
    current: Player,
    /// 1-based; 0 before the first turn.
    round: usize,
    turns_played: usize,
}

impl DuelState {
    pub fn new(targets: Vec<EmotionLabel>) -> Self {
        Self {
            targets,
            scores: [0, 0],
            current: Player::One,
            round: 0,
            turns_played: 0,
        }
    }

    pub fn targets(&self) -> &[EmotionLabel] {
        &self.targets
    }

    pub fn rounds(&self) -> usize {
        self.targets.len()
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Make `player` active for the 1-based `round`.
    pub fn begin_turn(&mut self, round: usize, player: Player) {
        self.round = round;
        self.current = player;
    }

    /// Record the active player's turn. Returns the updated score.
    pub fn finish_turn(&mut self, matched: bool) -> u32 {
        self.turns_played += 1;
        let slot = &mut self.scores[self.current.index()];
        if matched {
            *slot += 1;
        }
        *slot
    }

    pub fn is_complete(&self) -> bool {
        self.turns_played >= self.targets.len() * DUEL_PLAYERS
    }

    pub fn verdict(&self) -> DuelVerdict {
        DuelVerdict::from_scores(self.scores)
    }
}
