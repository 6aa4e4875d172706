//! Image-analysis stages: intensity conversion, slot segmentation, circle
//! detection and per-slot health.

pub(crate) mod circle;
pub(crate) mod preprocess;
pub(crate) mod segment;
pub(crate) mod slot_health;

pub use circle::detect_circle;
pub use preprocess::preprocess;
pub use segment::segment;
pub use slot_health::evaluate;
