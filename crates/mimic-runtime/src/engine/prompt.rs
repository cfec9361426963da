use tracing::debug;

use mimic_core::{ModeReport, PromptTally, TargetDeck, status};

use super::{Cancelled, EngineContext};
use crate::board::TargetDisplay;

/// Imitate prompted emotions over a fixed number of trials.
#[derive(Debug)]
pub struct PromptMatch {
    deck: TargetDeck,
}

impl PromptMatch {
    pub fn new(deck: TargetDeck) -> Self {
        Self { deck }
    }

    pub async fn run(mut self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        let trials = ctx.timing().prompt_trials;
        let window = ctx.timing().prompt_window;
        let mut tally = PromptTally::default();
        let mut target = self.deck.draw();

        for trial in 1..=trials {
            ctx.check()?;
            ctx.board(|b| b.target = Some(TargetDisplay::Emotion(target)));
            ctx.sink().set_status(&status::prompt_show(target));

            let matched = ctx
                .wait_for(window, |l| (l == Some(target)).then_some(()), |_| {})
                .await?
                .is_some();
            tally.record(matched);
            debug!(trial, %target, matched, "trial finished");

            // A missed target carries over to the next trial.
            if matched {
                target = self.deck.draw();
            }
        }

        let (successes, played) = (tally.successes(), tally.played());
        ctx.sink().set_status(&status::prompt_final(successes, played));
        Ok(ModeReport::PromptMatch {
            successes,
            trials: played,
        })
    }
}
