pub mod config;
pub mod error;
pub mod scenes;

pub use config::{GameConfig, PerceptionSettings, QuestSource};
pub use error::{ConfigError, Result};
pub use scenes::{BUILTIN_SCENES, builtin_quest, load_scenes, parse_scenes};
