use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of facial-expression categories a game can ask for.
///
/// "No face" and "face seen but expression not in this set" are both
/// represented as `Option::<EmotionLabel>::None` by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Fear,
    Joy,
    Sadness,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    /// All labels, in indicator-panel order.
    pub const ALL: [EmotionLabel; 6] = [
        EmotionLabel::Anger,
        EmotionLabel::Fear,
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Anger => "anger",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// Name the external classifier uses for this category.
    pub fn classifier_name(&self) -> &'static str {
        match self {
            EmotionLabel::Anger => "angry",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Joy => "happy",
            EmotionLabel::Sadness => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// Map a raw classifier label onto the closed set.
    ///
    /// Anything outside the vocabulary (e.g. "disgust") yields `None`:
    /// the face was seen but no playable emotion is asserted.
    pub fn from_classifier(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.classifier_name().eq_ignore_ascii_case(raw))
    }

    /// Upper-case form used in prompts and overlays.
    pub fn shout(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for EmotionLabel {
    type Err = UnknownLabel;

    /// Accepts canonical names and classifier names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(t))
            .or_else(|| Self::from_classifier(t))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Axis-aligned face rectangle in source-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale a region found on a resized copy back to source coordinates.
    /// Each component is truncated toward zero after scaling.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            x: (self.x as f64 * sx) as i32,
            y: (self.y as f64 * sy) as i32,
            width: (self.width as f64 * sx) as i32,
            height: (self.height as f64 * sy) as i32,
        }
    }

    /// Opposite corner, for drawing.
    pub fn corner(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_vocabulary_maps_onto_labels() {
        assert_eq!(EmotionLabel::from_classifier("happy"), Some(EmotionLabel::Joy));
        assert_eq!(EmotionLabel::from_classifier("angry"), Some(EmotionLabel::Anger));
        assert_eq!(EmotionLabel::from_classifier("SAD"), Some(EmotionLabel::Sadness));
        assert_eq!(EmotionLabel::from_classifier("disgust"), None);
        assert_eq!(EmotionLabel::from_classifier(""), None);
    }

    #[test]
    fn test_parse_accepts_both_vocabularies() {
        assert_eq!("joy".parse::<EmotionLabel>(), Ok(EmotionLabel::Joy));
        assert_eq!("Happy".parse::<EmotionLabel>(), Ok(EmotionLabel::Joy));
        assert_eq!(" neutral ".parse::<EmotionLabel>(), Ok(EmotionLabel::Neutral));
        assert!("bliss".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn test_display_and_shout() {
        assert_eq!(EmotionLabel::Surprise.to_string(), "surprise");
        assert_eq!(EmotionLabel::Surprise.shout(), "SURPRISE");
    }

    #[test]
    fn test_all_is_closed_and_distinct() {
        let mut all = EmotionLabel::ALL.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_region_scaling_truncates() {
        let r = FaceRegion::new(10, 21, 33, 40);
        let s = r.scaled(2.0, 2.0);
        assert_eq!(s, FaceRegion::new(20, 42, 66, 80));

        let odd = FaceRegion::new(3, 3, 3, 3).scaled(1.5, 1.5);
        assert_eq!(odd, FaceRegion::new(4, 4, 4, 4));
        assert_eq!(odd.corner(), (8, 8));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&EmotionLabel::Sadness).unwrap();
        assert_eq!(json, "\"sadness\"");
    }
}
