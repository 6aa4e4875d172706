//! High-level inspection API.
//!
//! [`Analyzer`] is the primary entry point. It owns the validated
//! configuration, the template feature cache and the fault icon; build it
//! once and inspect many images, from any number of threads.

use std::path::Path;

use image::{DynamicImage, RgbImage};

use crate::config::InspectionConfig;
use crate::error::{ConfigError, InspectError};
use crate::pipeline::{self, Inspection};
use crate::report::HealthStatus;
use crate::template::{FaultIcon, Template};

/// Crate quality analyzer.
///
/// # Examples
///
/// ```no_run
/// use cratecheck::{Analyzer, InspectionConfig};
/// use std::path::Path;
///
/// let config = InspectionConfig::from_json_file(Path::new("config/settings.json")).unwrap();
/// let analyzer = Analyzer::from_config(config).unwrap();
/// let image = image::open("crate.png").unwrap();
/// let (verdict, _annotated) = analyzer.inspect(&image).unwrap();
/// println!("Crate quality: {}", verdict);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: InspectionConfig,
    template: Template,
    icon: FaultIcon,
}

impl Analyzer {
    /// Validate `config` and build the template cache from an already
    /// decoded reference image.
    pub fn new(config: InspectionConfig, template_image: &DynamicImage) -> Result<Self, ConfigError> {
        config.validate()?;
        let template = Template::new(template_image, &config)?;
        Ok(Self::assemble(config, template, FaultIcon::default()))
    }

    /// Validate `config` and load the template from `config.template.path`.
    pub fn from_config(config: InspectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let template = Template::from_path(&config.template.path, &config)?;
        Ok(Self::assemble(config, template, FaultIcon::default()))
    }

    /// Load settings JSON and the template it names.
    pub fn from_settings_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_config(InspectionConfig::from_json_file(path)?)
    }

    /// Replace the built-in fault icon.
    pub fn with_fault_icon(self, icon: FaultIcon) -> Self {
        let Self {
            config, template, ..
        } = self;
        Self::assemble(config, template, icon)
    }

    fn assemble(config: InspectionConfig, template: Template, icon: FaultIcon) -> Self {
        let (tw, th) = template.dimensions();
        let icon = FaultIcon::new(icon.resized(tw, th));
        Self {
            config,
            template,
            icon,
        }
    }

    /// Access the validated configuration.
    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    /// Access the template feature cache.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Inspect one image; returns the crate verdict and the annotated image.
    pub fn inspect(&self, image: &DynamicImage) -> Result<(HealthStatus, RgbImage), InspectError> {
        let inspection = self.inspect_detailed(image)?;
        Ok((inspection.verdict, inspection.annotated))
    }

    /// Inspect one image, keeping the per-slot report.
    pub fn inspect_detailed(&self, image: &DynamicImage) -> Result<Inspection, InspectError> {
        pipeline::inspect(image, &self.config, &self.template, &self.icon)
    }
}
