//! Seams to the camera and the emotion classifier.

use mimic_core::{EmotionLabel, FaceRegion};

use crate::error::{CaptureError, PerceptionMiss};
use crate::frame::Frame;

/// Produces raw frames. Owned by the perception thread once started.
pub trait CaptureDevice: Send {
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Block until the next frame is available.
    fn acquire(&mut self) -> Result<Frame, CaptureError>;

    fn release(&mut self);
}

/// Wraps the external classifier. Stateless between calls.
pub trait PerceptionSource: Send {
    fn classify(&self, frame: &Frame) -> Result<Classification, PerceptionMiss>;
}

/// Raw classifier answer. `region` is in the coordinates of the image the
/// classifier analysed, which may be a downscaled copy of the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub raw_label: String,
    pub region: FaceRegion,
    pub analysed_width: u32,
    pub analysed_height: u32,
}

impl Classification {
    /// Map the raw label and scale the region back to `frame` coordinates.
    ///
    /// An unrecognised label still means a face was seen: the label is absent
    /// but the region is kept.
    pub fn resolve(
        &self,
        frame: &Frame,
    ) -> Result<(Option<EmotionLabel>, FaceRegion), PerceptionMiss> {
        if self.analysed_width == 0 || self.analysed_height == 0 {
            return Err(PerceptionMiss::Malformed(format!(
                "analysed size {}x{}",
                self.analysed_width, self.analysed_height
            )));
        }
        let sx = f64::from(frame.width) / f64::from(self.analysed_width);
        let sy = f64::from(frame.height) / f64::from(self.analysed_height);
        let label = EmotionLabel::from_classifier(&self.raw_label);
        Ok((label, self.region.scaled(sx, sy)))
    }
}
