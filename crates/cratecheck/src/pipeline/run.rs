//! Single-image orchestration.

use image::DynamicImage;

use super::Inspection;
use crate::annotate::annotate;
use crate::config::InspectionConfig;
use crate::detector::preprocess::{preprocess, to_working_rgb};
use crate::detector::segment::segment;
use crate::detector::slot_health::evaluate;
use crate::error::InspectError;
use crate::report::{aggregate, QualityReport};
use crate::template::{FaultIcon, Template};

/// Run every stage on `image`. Intermediate buffers are local to the call.
pub(crate) fn inspect(
    image: &DynamicImage,
    config: &InspectionConfig,
    template: &Template,
    icon: &FaultIcon,
) -> Result<Inspection, InspectError> {
    let working = to_working_rgb(image, config.image);
    let gray = preprocess(&working);

    let slots = segment(&gray, config)?;
    let report = QualityReport {
        slots: slots
            .iter()
            .map(|slot| evaluate(slot, &gray, template, config))
            .collect(),
    };

    let verdict = aggregate(&report);
    tracing::info!(
        "{} slots inspected, {} faulty, crate {}",
        report.len(),
        report.n_faulty(),
        verdict
    );

    let annotated = annotate(&working, &report, verdict, icon);
    Ok(Inspection {
        verdict,
        report,
        annotated,
    })
}
