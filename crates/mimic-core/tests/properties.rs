//! Property tests for the scoring rules: hold arbitrary reading sequences
//! against the invariants every front-end relies on.

use std::time::Duration;

use mimic_core::{
    DuelState, DuelVerdict, EmotionLabel, HoldStep, HoldTracker, Player, QuestGraph,
    QuestOutcome, QuestScene, QuestWalker, SceneId, Step, UniqueTally,
};
use proptest::prelude::*;

fn reading() -> impl Strategy<Value = Option<EmotionLabel>> {
    prop_oneof![
        1 => Just(None),
        6 => (0usize..6).prop_map(|i| Some(EmotionLabel::ALL[i])),
    ]
}

fn two_scene_quest() -> QuestGraph {
    QuestGraph::new(vec![
        QuestScene {
            id: SceneId(0),
            text: "A guard blocks the door.".into(),
            image: "door.jpg".into(),
            transitions: [
                (EmotionLabel::Joy, SceneId(2)),
                (EmotionLabel::Anger, SceneId(1)),
            ]
            .into_iter()
            .collect(),
            outcome: None,
        },
        QuestScene {
            id: SceneId(1),
            text: "The guard reaches for the alarm.".into(),
            image: "alarm.jpg".into(),
            transitions: [(EmotionLabel::Neutral, SceneId(0))].into_iter().collect(),
            outcome: None,
        },
        QuestScene {
            id: SceneId(2),
            text: "You are in.".into(),
            image: "success.jpg".into(),
            transitions: Default::default(),
            outcome: Some(QuestOutcome::Success),
        },
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn unique_count_bounded_and_monotonic(readings in prop::collection::vec(reading(), 0..200)) {
        let mut tally = UniqueTally::new();
        let mut last = 0;
        for r in readings {
            tally.observe(r);
            prop_assert!(tally.count() >= last);
            prop_assert!(tally.count() <= EmotionLabel::ALL.len());
            last = tally.count();
        }
    }

    #[test]
    fn hold_best_monotonic_and_resets_on_miss(
        target in (0usize..6).prop_map(|i| EmotionLabel::ALL[i]),
        readings in prop::collection::vec(reading(), 1..100),
    ) {
        let mut hold = HoldTracker::new(target);
        let mut best = Duration::ZERO;
        let mut broke_at = None;
        for (i, r) in readings.iter().enumerate() {
            let step = hold.observe(*r, Duration::from_millis(100 * i as u64));
            match step {
                HoldStep::Holding { current, best: b } => {
                    prop_assert!(broke_at.is_none());
                    prop_assert!(b >= best);
                    prop_assert!(current <= b);
                    best = b;
                }
                HoldStep::Broken { best: b } => {
                    if broke_at.is_none() {
                        prop_assert_ne!(*r, Some(target));
                        broke_at = Some(i);
                    }
                    prop_assert_eq!(b, best);
                    prop_assert_eq!(hold.current(), Duration::ZERO);
                }
            }
        }
    }

    #[test]
    fn duel_score_equals_matches(results in prop::collection::vec((any::<bool>(), any::<bool>()), 3)) {
        let mut duel = DuelState::new(vec![EmotionLabel::Anger, EmotionLabel::Joy, EmotionLabel::Fear]);
        let mut expected = [0u32; 2];
        for (round, (a, b)) in results.iter().enumerate() {
            for (player, hit) in Player::TURN_ORDER.into_iter().zip([*a, *b]) {
                duel.begin_turn(round + 1, player);
                duel.finish_turn(hit);
                expected[player.index()] += hit as u32;
            }
        }
        prop_assert!(duel.is_complete());
        prop_assert_eq!(duel.scores(), expected);
        let verdict = duel.verdict();
        match expected[0].cmp(&expected[1]) {
            std::cmp::Ordering::Equal => prop_assert_eq!(verdict, DuelVerdict::Draw),
            std::cmp::Ordering::Greater => prop_assert_eq!(verdict, DuelVerdict::Winner(Player::One)),
            std::cmp::Ordering::Less => prop_assert_eq!(verdict, DuelVerdict::Winner(Player::Two)),
        }
    }

    #[test]
    fn quest_without_qualifying_label_never_leaves_entry(
        readings in prop::collection::vec(
            prop_oneof![
                Just(None),
                Just(Some(EmotionLabel::Fear)),
                Just(Some(EmotionLabel::Sadness)),
                Just(Some(EmotionLabel::Surprise)),
            ],
            0..100,
        ),
    ) {
        let graph = two_scene_quest();
        let mut walker = QuestWalker::new(&graph);
        for r in readings {
            prop_assert_eq!(walker.react(r), Step::Stay);
            walker.reset();
            prop_assert_eq!(walker.current(), SceneId::ENTRY);
        }
    }
}

#[test]
fn quest_joy_from_entry_finishes_in_success() {
    let graph = two_scene_quest();
    let mut walker = QuestWalker::new(&graph);
    assert_eq!(
        walker.react(Some(EmotionLabel::Joy)),
        Step::Finished(SceneId(2), QuestOutcome::Success)
    );
}

#[test]
fn duel_sweep_reports_player_one() {
    let mut duel = DuelState::new(vec![EmotionLabel::Anger, EmotionLabel::Joy, EmotionLabel::Fear]);
    for round in 1..=3 {
        duel.begin_turn(round, Player::One);
        duel.finish_turn(true);
        duel.begin_turn(round, Player::Two);
        duel.finish_turn(false);
    }
    assert_eq!(duel.scores(), [3, 0]);
    assert_eq!(duel.verdict(), DuelVerdict::Winner(Player::One));
}
