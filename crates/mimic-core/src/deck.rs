use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::emotion::EmotionLabel;

/// Source of target labels for the prompting modes.
///
/// `Scripted` replays a fixed sequence (then falls back to random draws),
/// which lets callers reproduce a game exactly.
#[derive(Debug)]
pub enum TargetDeck {
    Random(SmallRng),
    Scripted {
        queue: VecDeque<EmotionLabel>,
        rng: SmallRng,
    },
}

impl TargetDeck {
    pub fn seeded(seed: u64) -> Self {
        TargetDeck::Random(SmallRng::seed_from_u64(seed))
    }

    pub fn scripted(targets: impl IntoIterator<Item = EmotionLabel>) -> Self {
        TargetDeck::Scripted {
            queue: targets.into_iter().collect(),
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Draw one label; repeats across draws are allowed.
    pub fn draw(&mut self) -> EmotionLabel {
        match self {
            TargetDeck::Random(rng) => pick(rng),
            TargetDeck::Scripted { queue, rng } => queue.pop_front().unwrap_or_else(|| pick(rng)),
        }
    }

    /// Draw `n` distinct labels (capped at the label set size).
    pub fn draw_distinct(&mut self, n: usize) -> Vec<EmotionLabel> {
        let n = n.min(EmotionLabel::ALL.len());
        let mut out = Vec::with_capacity(n);
        if let TargetDeck::Scripted { queue, .. } = self {
            while out.len() < n {
                match queue.pop_front() {
                    Some(l) if !out.contains(&l) => out.push(l),
                    Some(_) => {}
                    None => break,
                }
            }
        }
        let rng = match self {
            TargetDeck::Random(rng) => rng,
            TargetDeck::Scripted { rng, .. } => rng,
        };
        let rest: Vec<EmotionLabel> = EmotionLabel::ALL
            .iter()
            .filter(|l| !out.contains(l))
            .copied()
            .collect();
        out.extend(rest.choose_multiple(rng, n - out.len()).copied());
        out
    }
}

fn pick(rng: &mut impl Rng) -> EmotionLabel {
    let i = rng.random_range(0..EmotionLabel::ALL.len());
    EmotionLabel::ALL[i]
}
