use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use mimic_core::{EmotionLabel, QuestGraph, QuestOutcome, QuestScene, SceneId};

use crate::error::{ConfigError, Result};

/// The quest shipped with the game.
pub const BUILTIN_SCENES: &str = include_str!("../scenes/lab_heist.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default)]
    scene: Vec<SceneEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneEntry {
    id: u32,
    text: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    transitions: BTreeMap<String, u32>,
    outcome: Option<QuestOutcome>,
}

impl SceneEntry {
    fn into_scene(self) -> Result<QuestScene> {
        let mut transitions = BTreeMap::new();
        for (raw, to) in self.transitions {
            let label: EmotionLabel = raw.parse().map_err(|source| ConfigError::UnknownLabel {
                scene: self.id,
                source,
            })?;
            transitions.insert(label, SceneId(to));
        }
        Ok(QuestScene {
            id: SceneId(self.id),
            text: self.text.trim().to_string(),
            image: self.image,
            transitions,
            outcome: self.outcome,
        })
    }
}

/// Parse and validate a scene file. `origin` names the source in errors.
pub fn parse_scenes(content: &str, origin: &str) -> Result<QuestGraph> {
    let file: SceneFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    let scenes = file
        .scene
        .into_iter()
        .map(SceneEntry::into_scene)
        .collect::<Result<Vec<_>>>()?;
    let graph = QuestGraph::new(scenes)?;

    let unreachable = graph.unreachable();
    if !unreachable.is_empty() {
        tracing::warn!(
            "{origin}: {} scene(s) unreachable from the entry: {unreachable:?}",
            unreachable.len()
        );
    }
    Ok(graph)
}

pub fn load_scenes(path: &Path) -> Result<QuestGraph> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_scenes(&content, &path.display().to_string())?;
    tracing::info!("loaded {} quest scenes from {}", graph.len(), path.display());
    Ok(graph)
}

pub fn builtin_quest() -> Result<QuestGraph> {
    parse_scenes(BUILTIN_SCENES, "built-in quest")
}
