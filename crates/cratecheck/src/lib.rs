//! cratecheck: visual quality control for crates of bottles.
//!
//! One image of a crate with a fixed `rows x cols` slot layout is checked
//! against a reference template of a known-good slot. The pipeline stages are:
//!
//! 1. **Preprocess** – resize to the working size, convert to intensity.
//! 2. **Segment** – Canny edges → outer contours → crate bounding box →
//!    feathered region → column-major grid of slots.
//! 3. **Circle** – per slot: mask, crop, normalize to template size, Otsu
//!    binarize, median filter, Hough-gradient circle search.
//! 4. **Health** – symmetric radius difference to the template circle versus
//!    the match tolerance; any faulty slot fails the crate.
//! 5. **Annotate** – cross markers or fault icons blended over the image,
//!    plus an `OK !` / `BAD !` banner.
//!
//! # Public API
//! - [`Analyzer`] built from an [`InspectionConfig`] and a template image
//! - [`Analyzer::inspect`] for the verdict and annotated image,
//!   [`Analyzer::inspect_detailed`] for the full [`QualityReport`]
//! - the individual stages ([`preprocess`], [`segment`], [`detect_circle`],
//!   [`evaluate`], [`aggregate`], [`annotate`]) for tooling and tests

mod annotate;
mod api;
mod config;
mod detector;
mod error;
mod geometry;
mod pipeline;
mod report;
mod template;

#[cfg(test)]
pub(crate) mod test_utils;

pub use annotate::annotate;
pub use api::Analyzer;
pub use config::{
    CircleConfig, FeatherConfig, GridConfig, ImageSize, InspectionConfig, MatchConfig,
    TemplateConfig, EDGE_UPPER_THRESHOLD, SETTINGS_SCHEMA_V1,
};
pub use detector::{detect_circle, evaluate, preprocess, segment};
pub use error::{ConfigError, InspectError, SegmentationError};
pub use geometry::{Circle, Rectangle, Slot};
pub use pipeline::Inspection;
pub use report::{aggregate, classify, radius_error_percent, HealthStatus, QualityReport, SlotReport};
pub use template::{FaultIcon, Template};
