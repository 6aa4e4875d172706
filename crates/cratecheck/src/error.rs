//! Error taxonomy.
//!
//! Configuration problems abort construction, geometry problems abort a single
//! inspection call. A slot without a detectable circle is not an error: it is
//! classified as faulty.

use std::path::PathBuf;

// ── Configuration ──────────────────────────────────────────────────────────

/// Errors raised while loading or validating the analyzer configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Settings text is not valid JSON for the schema.
    Parse(serde_json::Error),
    /// `schema` tag names a layout this build does not understand.
    UnsupportedSchema { found: String, expected: &'static str },
    /// A numeric field lies outside its documented domain.
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// Template image could not be opened or decoded.
    TemplateImage {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Fault icon could not be opened or decoded.
    IconImage {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, .. } => {
                write!(f, "cannot read settings file {}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed settings: {}", err),
            Self::UnsupportedSchema { found, expected } => write!(
                f,
                "unsupported settings schema '{}' (expected '{}')",
                found, expected
            ),
            Self::InvalidField { field, reason } => {
                write!(f, "invalid setting `{}`: {}", field, reason)
            }
            Self::TemplateImage { path, .. } => {
                write!(f, "cannot load template image {}", path.display())
            }
            Self::IconImage { path, .. } => {
                write!(f, "cannot load fault icon {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::TemplateImage { source, .. } | Self::IconImage { source, .. } => Some(source),
            Self::UnsupportedSchema { .. } | Self::InvalidField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

// ── Inspection ─────────────────────────────────────────────────────────────

/// Failure to locate the crate region in the working image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// Edge detection produced no contours (blank or uniform input).
    NoContours,
}

impl std::fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoContours => write!(f, "no contours found; cannot locate crate region"),
        }
    }
}

impl std::error::Error for SegmentationError {}

/// Errors that abort a single inspection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// Crate region could not be located.
    Segmentation(SegmentationError),
    /// Feathering or grid partitioning produced a non-positive size.
    DegenerateGeometry {
        reason: &'static str,
        width: i64,
        height: i64,
    },
}

impl std::fmt::Display for InspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segmentation(err) => write!(f, "segmentation failed: {}", err),
            Self::DegenerateGeometry {
                reason,
                width,
                height,
            } => write!(f, "degenerate geometry ({}): {}x{}", reason, width, height),
        }
    }
}

impl std::error::Error for InspectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Segmentation(err) => Some(err),
            Self::DegenerateGeometry { .. } => None,
        }
    }
}

impl From<SegmentationError> for InspectError {
    fn from(err: SegmentationError) -> Self {
        Self::Segmentation(err)
    }
}
