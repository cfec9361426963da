//! Quest narrative graph: scenes connected by emotion-keyed transitions.
//!
//! The graph is validated once, when it is built, so the quest engine can
//! never stall on a scene it cannot leave or jump to a scene that does not
//! exist.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::QUEST_ENTRY_SCENE;
use crate::emotion::EmotionLabel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub u32);

impl SceneId {
    pub const ENTRY: SceneId = SceneId(QUEST_ENTRY_SCENE);
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a terminal scene ends the quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestOutcome {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestScene {
    pub id: SceneId,
    pub text: String,
    /// Artwork reference, resolved by whoever displays the scene.
    pub image: String,
    pub transitions: BTreeMap<EmotionLabel, SceneId>,
    /// Set on terminal scenes only.
    pub outcome: Option<QuestOutcome>,
}

impl QuestScene {
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Scene reached by showing `label` here, if the scene reacts to it.
    pub fn next(&self, label: EmotionLabel) -> Option<SceneId> {
        self.transitions.get(&label).copied()
    }

    /// Labels this scene reacts to, in label order.
    pub fn accepted(&self) -> impl Iterator<Item = EmotionLabel> + '_ {
        self.transitions.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestGraphError {
    #[error("quest graph has no entry scene {}", SceneId::ENTRY)]
    MissingEntry,
    #[error("scene {0} is defined more than once")]
    DuplicateScene(SceneId),
    #[error("scene {0} is not terminal but has no transitions")]
    DeadEnd(SceneId),
    #[error("scene {from} sends {label} to undefined scene {to}")]
    DanglingTransition {
        from: SceneId,
        label: EmotionLabel,
        to: SceneId,
    },
    #[error("terminal scene {0} declares transitions")]
    TerminalWithTransitions(SceneId),
    #[error("entry scene {} is terminal", SceneId::ENTRY)]
    TerminalEntry,
}

/// Immutable, validated scene graph.
#[derive(Clone, Debug)]
pub struct QuestGraph {
    scenes: HashMap<SceneId, QuestScene>,
}

impl QuestGraph {
    /// Build and validate a graph.
    ///
    /// Rejects: a missing entry scene, duplicate ids, non-terminal scenes
    /// without transitions, transitions to undefined scenes, and terminal
    /// scenes that still declare transitions. The entry scene itself must
    /// not be terminal, since a quest that starts at its ending has nothing
    /// to react to.
    pub fn new(scenes: Vec<QuestScene>) -> Result<Self, QuestGraphError> {
        let mut map = HashMap::with_capacity(scenes.len());
        for scene in scenes {
            let id = scene.id;
            if map.insert(id, scene).is_some() {
                return Err(QuestGraphError::DuplicateScene(id));
            }
        }

        if !map.contains_key(&SceneId::ENTRY) {
            return Err(QuestGraphError::MissingEntry);
        }

        let mut ids: Vec<&SceneId> = map.keys().collect();
        ids.sort();
        for id in ids {
            let scene = &map[id];
            match (scene.is_terminal(), scene.transitions.is_empty()) {
                (true, false) => return Err(QuestGraphError::TerminalWithTransitions(*id)),
                (false, true) => return Err(QuestGraphError::DeadEnd(*id)),
                _ => {}
            }
            for (label, to) in &scene.transitions {
                if !map.contains_key(to) {
                    return Err(QuestGraphError::DanglingTransition {
                        from: *id,
                        label: *label,
                        to: *to,
                    });
                }
            }
        }

        if map[&SceneId::ENTRY].is_terminal() {
            return Err(QuestGraphError::TerminalEntry);
        }

        Ok(Self { scenes: map })
    }

    pub fn entry(&self) -> &QuestScene {
        &self.scenes[&SceneId::ENTRY]
    }

    pub fn scene(&self, id: SceneId) -> Option<&QuestScene> {
        self.scenes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scenes sorted by id.
    pub fn scenes(&self) -> Vec<&QuestScene> {
        let mut v: Vec<&QuestScene> = self.scenes.values().collect();
        v.sort_by_key(|s| s.id);
        v
    }

    pub fn terminal_count(&self, outcome: QuestOutcome) -> usize {
        self.scenes
            .values()
            .filter(|s| s.outcome == Some(outcome))
            .count()
    }

    /// Scenes no path from the entry can reach. Harmless to the engine but
    /// usually an authoring mistake.
    pub fn unreachable(&self) -> Vec<SceneId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([SceneId::ENTRY]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(scene) = self.scenes.get(&id) {
                queue.extend(scene.transitions.values().copied());
            }
        }
        let mut missing: Vec<SceneId> = self
            .scenes
            .keys()
            .filter(|id| !seen.contains(id))
            .copied()
            .collect();
        missing.sort();
        missing
    }
}

/// Result of feeding one reading to a [`QuestWalker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The label is not accepted here; keep waiting.
    Stay,
    /// Moved to a scene that continues the quest.
    Advanced(SceneId),
    /// Moved to a terminal scene.
    Finished(SceneId, QuestOutcome),
}

/// Position of one traversal through a [`QuestGraph`].
#[derive(Debug)]
pub struct QuestWalker<'g> {
    graph: &'g QuestGraph,
    current: SceneId,
}

impl<'g> QuestWalker<'g> {
    pub fn new(graph: &'g QuestGraph) -> Self {
        Self {
            graph,
            current: SceneId::ENTRY,
        }
    }

    pub fn current(&self) -> SceneId {
        self.current
    }

    pub fn scene(&self) -> &'g QuestScene {
        // Every id the walker can hold was checked by QuestGraph::new.
        self.graph
            .scene(self.current)
            .unwrap_or_else(|| self.graph.entry())
    }

    /// Apply one perception reading to the current scene.
    pub fn react(&mut self, label: Option<EmotionLabel>) -> Step {
        let Some(next) = label.and_then(|l| self.scene().next(l)) else {
            return Step::Stay;
        };
        self.current = next;
        match self.scene().outcome {
            Some(outcome) => Step::Finished(next, outcome),
            None => Step::Advanced(next),
        }
    }

    /// Reaction window ran out: progress is discarded.
    pub fn reset(&mut self) {
        self.current = SceneId::ENTRY;
    }
}
