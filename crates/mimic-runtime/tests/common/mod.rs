#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use mimic_core::{
    EmotionLabel, FaceRegion, Mode, QuestGraph, QuestOutcome, QuestScene, SceneId, StatusSink,
    Timing,
};
use mimic_runtime::{
    CaptureDevice, CaptureError, Classification, EngineContext, Frame, PerceptionMiss,
    PerceptionSource, PerceptionWriter, SessionBoard, perception_state,
};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// One call made on a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Status(String),
    Achieved(EmotionLabel, bool),
    Scene { text: String, image: String },
    Timer { text: String, urgent: bool },
    CloseScene,
}

/// Sink that keeps every call for inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Status(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses().pop()
    }

    /// Scene texts in display order.
    pub fn scenes(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Scene { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn timers(&self) -> Vec<(String, bool)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Timer { text, urgent } => Some((text.clone(), *urgent)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().push(event);
    }
}

impl StatusSink for RecordingSink {
    fn set_status(&self, text: &str) {
        self.push(SinkEvent::Status(text.to_string()));
    }

    fn set_emotion_achieved(&self, label: EmotionLabel, achieved: bool) {
        self.push(SinkEvent::Achieved(label, achieved));
    }

    fn display_scene(&self, text: &str, image: &str) {
        self.push(SinkEvent::Scene {
            text: text.to_string(),
            image: image.to_string(),
        });
    }

    fn update_timer(&self, text: &str, urgent: bool) {
        self.push(SinkEvent::Timer {
            text: text.to_string(),
            urgent,
        });
    }

    fn close_scene(&self) {
        self.push(SinkEvent::CloseScene);
    }
}

/// Engine wiring with a recording sink and a board owned by epoch 1.
pub struct Rig {
    pub writer: PerceptionWriter,
    pub sink: Arc<RecordingSink>,
    pub board: SessionBoard,
    pub cancel: CancellationToken,
}

impl Rig {
    pub fn new(mode: Mode) -> (Self, EngineContext) {
        Self::with_timing(mode, Timing::default())
    }

    pub fn with_timing(mode: Mode, timing: Timing) -> (Self, EngineContext) {
        let (writer, reader) = perception_state();
        let sink = Arc::new(RecordingSink::new());
        let board = SessionBoard::new();
        board.begin(1, mode);
        let cancel = CancellationToken::new();
        let ctx = EngineContext::new(
            reader,
            sink.clone(),
            board.clone(),
            Arc::new(timing),
            cancel.clone(),
            1,
        );
        (
            Self {
                writer,
                sink,
                board,
                cancel,
            },
            ctx,
        )
    }
}

/// Publish each `(offset_ms, label)` at its offset from now.
pub fn feed(
    mut writer: PerceptionWriter,
    script: Vec<(u64, Option<EmotionLabel>)>,
) -> JoinHandle<PerceptionWriter> {
    tokio::spawn(async move {
        let start = Instant::now();
        for (at, label) in script {
            tokio::time::sleep_until(start + ms(at)).await;
            writer.publish(label, None);
        }
        writer
    })
}

fn scene(
    id: u32,
    text: &str,
    transitions: &[(EmotionLabel, u32)],
    outcome: Option<QuestOutcome>,
) -> QuestScene {
    QuestScene {
        id: SceneId(id),
        text: text.to_string(),
        image: format!("scene{id}.jpg"),
        transitions: transitions
            .iter()
            .map(|&(l, to)| (l, SceneId(to)))
            .collect::<BTreeMap<_, _>>(),
        outcome,
    }
}

/// 0 --joy--> 2 (success), 0 --anger--> 1 --neutral--> 0
pub fn small_quest() -> Arc<QuestGraph> {
    use EmotionLabel::*;
    Arc::new(
        QuestGraph::new(vec![
            scene(0, "gate", &[(Joy, 2), (Anger, 1)], None),
            scene(1, "guard", &[(Neutral, 0)], None),
            scene(2, "treasure", &[], Some(QuestOutcome::Success)),
        ])
        .unwrap(),
    )
}

/// Camera that produces blank frames at a steady pace.
pub struct FakeCamera {
    pub released: Arc<AtomicBool>,
    pub fail_open: bool,
    seq: u64,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        (
            Self {
                released: released.clone(),
                fail_open: false,
                seq: 0,
            },
            released,
        )
    }

    pub fn broken() -> Self {
        let (mut cam, _) = Self::new();
        cam.fail_open = true;
        cam
    }
}

impl CaptureDevice for FakeCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        if self.fail_open {
            Err(CaptureError::Unavailable("no device".into()))
        } else {
            Ok(())
        }
    }

    fn acquire(&mut self) -> Result<Frame, CaptureError> {
        std::thread::sleep(ms(2));
        self.seq += 1;
        Ok(Frame::new(self.seq, 64, 48, vec![0; 16]))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Classifier that always sees a happy face on a half-size copy.
pub struct AlwaysHappy;

impl PerceptionSource for AlwaysHappy {
    fn classify(&self, _frame: &Frame) -> Result<Classification, PerceptionMiss> {
        Ok(Classification {
            raw_label: "happy".into(),
            region: FaceRegion::new(4, 4, 8, 8),
            analysed_width: 32,
            analysed_height: 24,
        })
    }
}
