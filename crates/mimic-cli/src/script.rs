//! Timed label scripts for non-interactive play.
//!
//! One entry per line: `<offset_ms> <label|none>`. Blank lines and `#`
//! comments are ignored. The label in effect is the last entry whose offset
//! is not after the elapsed time.

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use mimic_core::EmotionLabel;

use crate::feed::Feed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptEntry {
    pub at: Duration,
    pub label: Option<EmotionLabel>,
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEntry>> {
    let mut entries = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let lineno = i + 1;
        let mut parts = line.split_whitespace();
        let (Some(offset), Some(label), None) = (parts.next(), parts.next(), parts.next()) else {
            bail!("line {lineno}: expected '<offset_ms> <label|none>', got '{line}'");
        };
        let ms: u64 = offset
            .parse()
            .with_context(|| format!("line {lineno}: bad offset '{offset}'"))?;
        let label = if label.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(
                label
                    .parse::<EmotionLabel>()
                    .with_context(|| format!("line {lineno}: bad label"))?,
            )
        };
        entries.push(ScriptEntry {
            at: Duration::from_millis(ms),
            label,
        });
    }
    entries.sort_by_key(|e| e.at);
    Ok(entries)
}

/// Plays a parsed script against the wall clock. Offsets count from the
/// first read, not from loading.
pub struct ScriptFeed {
    entries: Vec<ScriptEntry>,
    start: OnceLock<Instant>,
}

impl ScriptFeed {
    pub fn new(entries: Vec<ScriptEntry>) -> Self {
        Self {
            entries,
            start: OnceLock::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let entries = parse_script(&content)
            .with_context(|| format!("invalid script {}", path.display()))?;
        tracing::info!("loaded {} script entries from {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    fn label_at(&self, elapsed: Duration) -> Option<EmotionLabel> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.at <= elapsed)
            .and_then(|e| e.label)
    }
}

impl Feed for ScriptFeed {
    fn current(&self) -> Option<EmotionLabel> {
        let start = self.start.get_or_init(Instant::now);
        self.label_at(start.elapsed())
    }
}
