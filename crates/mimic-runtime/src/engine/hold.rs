use tokio::time::Instant;
use tracing::debug;

use mimic_core::{EmotionLabel, HoldStep, HoldTracker, ModeReport, status};

use super::{Cancelled, EngineContext};
use crate::board::TargetDisplay;

/// Keep one chosen emotion for as long as possible.
#[derive(Debug)]
pub struct Hold {
    target: EmotionLabel,
}

impl Hold {
    pub fn new(target: EmotionLabel) -> Self {
        Self { target }
    }

    pub fn target(&self) -> EmotionLabel {
        self.target
    }

    pub async fn run(self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        ctx.board(|b| b.target = Some(TargetDisplay::Emotion(self.target)));

        let mut hold = HoldTracker::new(self.target);
        let played = self.play(ctx, &mut hold).await;

        // Announced on a stop too, countdown included.
        let best = hold.best();
        ctx.final_status(&status::hold_final(best));
        played?;
        Ok(ModeReport::Hold {
            best_secs: best.as_secs_f64(),
        })
    }

    async fn play(&self, ctx: &EngineContext, hold: &mut HoldTracker) -> Result<(), Cancelled> {
        let timing = ctx.timing();
        for tick in (1..=timing.hold_countdown).rev() {
            ctx.check()?;
            ctx.sink().set_status(&status::hold_countdown(tick));
            ctx.pause(timing.hold_countdown_step).await?;
        }

        ctx.check()?;
        ctx.sink().set_status(status::HOLD_GO);
        let start = Instant::now();
        loop {
            ctx.check()?;
            match hold.observe(ctx.reading(), start.elapsed()) {
                HoldStep::Holding { current, best } => {
                    ctx.sink().set_status(&status::hold_progress(current, best));
                }
                HoldStep::Broken { best } => {
                    debug!(target = %self.target, best_secs = best.as_secs_f64(), "hold broken");
                    return Ok(());
                }
            }
            ctx.poll().await?;
        }
    }
}
