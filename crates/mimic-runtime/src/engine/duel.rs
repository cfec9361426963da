use tracing::debug;

use mimic_core::{DuelState, EmotionLabel, ModeReport, Player, status};

use super::{Cancelled, EngineContext};
use crate::board::{DuelBoard, TargetDisplay};

/// Two players take turns on the same targets, one round per target.
#[derive(Debug)]
pub struct Duel {
    targets: Vec<EmotionLabel>,
}

impl Duel {
    /// `targets` should be distinct; one round is played per target.
    pub fn new(targets: Vec<EmotionLabel>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[EmotionLabel] {
        &self.targets
    }

    pub async fn run(self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        let timing = ctx.timing();
        let mut duel = DuelState::new(self.targets.clone());

        ctx.sink().set_status(status::DUEL_INTRO);
        ctx.pause(timing.duel_intro).await?;

        for (i, &target) in self.targets.iter().enumerate() {
            let round = i + 1;
            for player in Player::TURN_ORDER {
                ctx.check()?;
                duel.begin_turn(round, player);
                let board = DuelBoard::from(&duel);
                ctx.board(|b| {
                    b.target = Some(TargetDisplay::Emotion(target));
                    b.duel = Some(board);
                });
                ctx.sink()
                    .set_status(&status::duel_turn(round, player, target));

                let matched = ctx
                    .wait_for(
                        timing.duel_turn_window,
                        |l| (l == Some(target)).then_some(()),
                        |_| {},
                    )
                    .await?
                    .is_some();
                let score = duel.finish_turn(matched);
                debug!(round, %player, %target, matched, score, "turn finished");

                let board = DuelBoard::from(&duel);
                ctx.board(|b| b.duel = Some(board));
                ctx.sink()
                    .set_status(&status::duel_turn_result(player, matched));
                let pause = if matched {
                    timing.duel_success_pause
                } else {
                    timing.duel_failure_pause
                };
                ctx.pause(pause).await?;
            }
        }

        debug_assert!(duel.is_complete());
        let scores = duel.scores();
        let verdict = duel.verdict();
        ctx.sink().set_status(&status::duel_final(verdict, scores));
        Ok(ModeReport::Duel { scores, verdict })
    }
}
