use crate::emotion::EmotionLabel;

/// One-way progress channel to whatever presents the game.
///
/// Calls are best-effort and must not block the caller for long; engines
/// call these from their polling loops.
pub trait StatusSink: Send + Sync {
    /// Replace the main status line.
    fn set_status(&self, text: &str);

    /// Light or clear the per-emotion indicator.
    fn set_emotion_achieved(&self, label: EmotionLabel, achieved: bool);

    /// Show a quest scene, replacing any scene already shown.
    fn display_scene(&self, text: &str, image: &str);

    /// Update the countdown shown with the current scene.
    fn update_timer(&self, text: &str, urgent: bool);

    /// Tear down the scene surface, if one is open.
    fn close_scene(&self);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn set_status(&self, _text: &str) {}
    fn set_emotion_achieved(&self, _label: EmotionLabel, _achieved: bool) {}
    fn display_scene(&self, _text: &str, _image: &str) {}
    fn update_timer(&self, _text: &str, _urgent: bool) {}
    fn close_scene(&self) {}
}
