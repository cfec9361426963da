//! Loading configuration and scene files from disk.

use std::time::Duration;

use mimic_config::{ConfigError, GameConfig, QuestSource};
use mimic_core::{EmotionLabel, QuestOutcome, SceneId};
use tempfile::TempDir;

const TINY_QUEST: &str = r#"
[[scene]]
id = 0
text = "A door."
image = "door.jpg"
transitions = { joy = 1, anger = 2 }

[[scene]]
id = 1
text = "It opens."
outcome = "success"

[[scene]]
id = 2
text = "It stays shut."
outcome = "failure"
"#;

#[test]
fn relative_scene_path_resolves_next_to_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tiny.toml"), TINY_QUEST).unwrap();
    let cfg_path = dir.path().join("mimic.toml");
    std::fs::write(
        &cfg_path,
        "[quest]\nscenes = \"tiny.toml\"\n\n[timing]\nquest_reaction_window_ms = 250\n",
    )
    .unwrap();

    let cfg = GameConfig::load(Some(cfg_path.as_path())).unwrap();
    assert_eq!(cfg.quest.len(), 3);
    assert_eq!(cfg.quest_source, QuestSource::File(dir.path().join("tiny.toml")));
    assert_eq!(cfg.timing.quest_reaction_window, Duration::from_millis(250));
    assert_eq!(
        cfg.quest.entry().next(EmotionLabel::Joy),
        Some(SceneId(1))
    );
    assert_eq!(cfg.quest.terminal_count(QuestOutcome::Failure), 1);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = GameConfig::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn missing_scene_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let cfg_path = dir.path().join("mimic.toml");
    std::fs::write(&cfg_path, "[quest]\nscenes = \"absent.toml\"\n").unwrap();
    let err = GameConfig::load(Some(cfg_path.as_path())).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn no_path_means_builtin() {
    let cfg = GameConfig::load(None).unwrap();
    assert_eq!(cfg.quest_source, QuestSource::Builtin);
    assert!(cfg.quest.len() > 10);
}
