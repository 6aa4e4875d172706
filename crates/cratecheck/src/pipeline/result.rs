use image::RgbImage;

use crate::report::{HealthStatus, QualityReport};

/// Full outcome of one inspection call.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Crate verdict, aggregated from `report`.
    pub verdict: HealthStatus,
    /// Per-slot classification in segmentation order.
    pub report: QualityReport,
    /// Working-size copy of the input with the verdict overlay.
    pub annotated: RgbImage,
}

impl Inspection {
    /// Working image size `[width, height]`.
    pub fn image_size(&self) -> [u32; 2] {
        let (w, h) = self.annotated.dimensions();
        [w, h]
    }
}
