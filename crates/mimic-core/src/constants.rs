/// Poll cadence of every mode loop (ms)
pub const POLL_INTERVAL_MS: u64 = 100;

/// MaxUnique: length of the collection window (ms)
pub const MAX_UNIQUE_WINDOW_MS: u64 = 30_000;

/// PromptMatch: reaction window per trial (ms)
pub const PROMPT_WINDOW_MS: u64 = 10_000;

/// PromptMatch: trials per run
pub const PROMPT_TRIALS: u32 = 3;

/// Hold: countdown ticks before the timer starts
pub const HOLD_COUNTDOWN: u32 = 3;

/// Hold: length of one countdown tick (ms)
pub const HOLD_COUNTDOWN_STEP_MS: u64 = 1_000;

/// Duel: rounds per duel. Targets are drawn without replacement,
/// so this can never exceed the label set.
pub const DUEL_ROUNDS: usize = 3;

/// Duel: reaction window per player turn (ms)
pub const DUEL_TURN_WINDOW_MS: u64 = 10_000;

/// Duel: pause after the intro message (ms)
pub const DUEL_INTRO_MS: u64 = 2_000;

/// Duel: presentation pause after a matched turn (ms)
pub const DUEL_SUCCESS_PAUSE_MS: u64 = 2_000;

/// Duel: presentation pause after a forfeited turn (ms)
pub const DUEL_FAILURE_PAUSE_MS: u64 = 1_000;

/// Quest: reading time before the reaction window opens (ms)
pub const QUEST_READ_DELAY_MS: u64 = 3_000;

/// Quest: reaction window per scene (ms)
pub const QUEST_REACTION_WINDOW_MS: u64 = 10_000;

/// Quest: timer turns urgent below this many remaining ms
pub const QUEST_URGENT_BELOW_MS: u64 = 5_000;

/// Quest: pause before the next scene after a match (ms)
pub const QUEST_ADVANCE_PAUSE_MS: u64 = 2_000;

/// Quest: pause before restarting from the entry scene after a timeout (ms)
pub const QUEST_RESET_PAUSE_MS: u64 = 3_000;

/// Entry and reset node of every quest graph
pub const QUEST_ENTRY_SCENE: u32 = 0;

/// Players in a duel
pub const DUEL_PLAYERS: usize = 2;
