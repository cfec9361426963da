use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use mimic_core::{EmotionLabel, ModeReport, UniqueTally, status, whole_secs_left};

use super::{Cancelled, EngineContext};
use crate::board::TargetDisplay;

/// Show as many distinct emotions as possible before the window closes.
#[derive(Debug, Default)]
pub struct MaxUnique;

impl MaxUnique {
    pub async fn run(self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        let window = ctx.timing().max_unique_window;
        ctx.board(|b| b.target = Some(TargetDisplay::AnyDistinct));
        for label in EmotionLabel::ALL {
            ctx.sink().set_emotion_achieved(label, false);
        }

        let mut tally = UniqueTally::new();
        let played = collect(ctx, &mut tally, window).await;

        // Announced on a stop too.
        let distinct = tally.count();
        ctx.final_status(&status::max_unique_final(distinct));
        played?;
        Ok(ModeReport::MaxUnique { distinct })
    }
}

async fn collect(
    ctx: &EngineContext,
    tally: &mut UniqueTally,
    window: Duration,
) -> Result<(), Cancelled> {
    let start = Instant::now();
    loop {
        ctx.check()?;
        let elapsed = start.elapsed();
        if elapsed >= window {
            return Ok(());
        }
        if let Some(label) = tally.observe(ctx.reading()) {
            debug!(%label, distinct = tally.count(), "new emotion");
            ctx.sink().set_emotion_achieved(label, true);
        }
        ctx.sink().set_status(&status::max_unique_progress(
            whole_secs_left(window, elapsed),
            tally.count(),
        ));
        ctx.poll().await?;
    }
}
