use std::sync::Arc;

use tracing::debug;

use mimic_core::{ModeReport, QuestGraph, QuestWalker, Step, status, whole_secs_left};

use super::{Cancelled, EngineContext};

/// Walk the quest graph, one reaction window per scene.
#[derive(Debug)]
pub struct Quest {
    graph: Arc<QuestGraph>,
}

impl Quest {
    pub fn new(graph: Arc<QuestGraph>) -> Self {
        Self { graph }
    }

    pub async fn run(self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        let result = self.walk(ctx).await;
        if result.is_err() {
            ctx.sink().close_scene();
        }
        result
    }

    async fn walk(&self, ctx: &EngineContext) -> Result<ModeReport, Cancelled> {
        let timing = ctx.timing();
        let window = timing.quest_reaction_window;
        let mut walker = QuestWalker::new(&self.graph);

        loop {
            ctx.check()?;
            let scene = walker.scene();
            ctx.board(|b| b.quest_scene = Some(scene.id));
            ctx.sink().display_scene(&scene.text, &scene.image);
            ctx.sink()
                .update_timer(&status::quest_get_ready(timing.quest_read_delay), false);
            ctx.pause(timing.quest_read_delay).await?;

            ctx.sink()
                .update_timer(&status::quest_react_now(window), false);
            let step = ctx
                .wait_for(
                    window,
                    |l| match walker.react(l) {
                        Step::Stay => None,
                        moved => Some(moved),
                    },
                    |elapsed| {
                        let urgent = window.saturating_sub(elapsed) < timing.quest_urgent_below;
                        ctx.sink().update_timer(
                            &status::quest_time_left(whole_secs_left(window, elapsed)),
                            urgent,
                        );
                    },
                )
                .await?;

            match step {
                Some(Step::Finished(id, outcome)) => {
                    debug!(scene = %id, ?outcome, "quest finished");
                    let scene = walker.scene();
                    ctx.board(|b| b.quest_scene = Some(id));
                    ctx.sink().display_scene(&scene.text, &scene.image);
                    ctx.sink().set_status(status::quest_final(outcome));
                    return Ok(ModeReport::Quest { scene: id, outcome });
                }
                Some(Step::Advanced(id)) => {
                    debug!(from = %scene.id, to = %id, "scene advanced");
                    ctx.sink().set_status(status::QUEST_SUCCESS_STEP);
                    ctx.pause(timing.quest_advance_pause).await?;
                }
                Some(Step::Stay) => {}
                None => {
                    debug!(scene = %scene.id, "reaction window expired");
                    ctx.sink().set_status(status::QUEST_TIMEOUT);
                    walker.reset();
                    ctx.pause(timing.quest_reset_pause).await?;
                }
            }
        }
    }
}
