//! Terminal presentation of game progress: plain lines for people, one JSON
//! object per line for scripts.

use std::io::Write;

use parking_lot::Mutex;
use serde::Serialize;

use mimic_core::{EmotionLabel, FaceRegion, RunOutcome, StatusSink};
use mimic_runtime::AnnotatedFrame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Console,
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Status {
        text: &'a str,
    },
    Achieved {
        label: EmotionLabel,
        achieved: bool,
    },
    Scene {
        text: &'a str,
        image: &'a str,
    },
    Timer {
        text: &'a str,
        urgent: bool,
    },
    CloseScene,
    Frame {
        seq: u64,
        face: Option<FaceRegion>,
        lines: Vec<String>,
    },
    Result {
        result: &'a RunOutcome,
    },
}

#[derive(Default)]
struct Seen {
    status: Option<String>,
    timer: Option<String>,
}

/// Writes to stdout. Repeated status and timer lines are collapsed, since
/// the engines re-post them on every poll.
pub struct Terminal {
    format: Format,
    seen: Mutex<Seen>,
}

impl Terminal {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            seen: Mutex::new(Seen::default()),
        }
    }

    pub fn frame(&self, frame: &AnnotatedFrame) {
        let lines = frame.overlay.lines();
        match self.format {
            Format::Json => self.emit(&Event::Frame {
                seq: frame.frame.seq,
                face: frame.overlay.face,
                lines,
            }),
            Format::Console => self.line(&format!("[frame {}] {}", frame.frame.seq, lines.join(" | "))),
        }
    }

    pub fn result(&self, outcome: &RunOutcome) {
        match self.format {
            Format::Json => self.emit(&Event::Result { result: outcome }),
            Format::Console => self.line(&console_result(outcome)),
        }
    }

    fn emit(&self, event: &Event<'_>) {
        match serde_json::to_string(event) {
            Ok(json) => self.line(&json),
            Err(e) => tracing::warn!("failed to encode event: {e}"),
        }
    }

    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed pipe must not take the game down with it.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

fn console_result(outcome: &RunOutcome) -> String {
    use mimic_core::ModeReport;

    let Some(report) = outcome.report() else {
        return "result: cancelled".to_string();
    };
    match report {
        ModeReport::MaxUnique { distinct } => format!("result: {distinct} distinct emotions"),
        ModeReport::PromptMatch { successes, trials } => {
            format!("result: {successes} of {trials} prompts matched")
        }
        ModeReport::Hold { best_secs } => format!("result: best hold {best_secs:.1}s"),
        ModeReport::Duel { scores, .. } => {
            format!("result: duel {} - {}", scores[0], scores[1])
        }
        ModeReport::Quest { scene, outcome } => {
            format!("result: quest ended at scene {scene} ({outcome:?})")
        }
    }
}

impl StatusSink for Terminal {
    fn set_status(&self, text: &str) {
        {
            let mut seen = self.seen.lock();
            if seen.status.as_deref() == Some(text) {
                return;
            }
            seen.status = Some(text.to_string());
        }
        match self.format {
            Format::Json => self.emit(&Event::Status { text }),
            Format::Console => self.line(text),
        }
    }

    fn set_emotion_achieved(&self, label: EmotionLabel, achieved: bool) {
        match self.format {
            Format::Json => self.emit(&Event::Achieved { label, achieved }),
            Format::Console if achieved => self.line(&format!("  + {}", label.shout())),
            Format::Console => {}
        }
    }

    fn display_scene(&self, text: &str, image: &str) {
        self.seen.lock().timer = None;
        match self.format {
            Format::Json => self.emit(&Event::Scene { text, image }),
            Format::Console => {
                self.line("");
                self.line(text);
                if !image.is_empty() {
                    self.line(&format!("  ({image})"));
                }
            }
        }
    }

    fn update_timer(&self, text: &str, urgent: bool) {
        {
            let mut seen = self.seen.lock();
            if seen.timer.as_deref() == Some(text) {
                return;
            }
            seen.timer = Some(text.to_string());
        }
        match self.format {
            Format::Json => self.emit(&Event::Timer { text, urgent }),
            Format::Console if urgent => self.line(&format!("  {text} !")),
            Format::Console => self.line(&format!("  {text}")),
        }
    }

    fn close_scene(&self) {
        self.seen.lock().timer = None;
        if self.format == Format::Json {
            self.emit(&Event::CloseScene);
        }
    }
}
