//! Health classification and per-crate aggregation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Slot};

/// Health of a slot or of the whole crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Ok,
    Faulty,
}

impl HealthStatus {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Faulty => f.write_str("FAULTY"),
        }
    }
}

/// Classification of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotReport {
    pub slot: Slot,
    pub status: HealthStatus,
    /// Circle found in the normalized slot crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<Circle>,
    /// Symmetric radius difference to the template, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_percent: Option<f64>,
}

/// Per-slot classifications in segmentation order.
///
/// Entry `i` always describes the slot with `id == i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub slots: Vec<SlotReport>,
}

impl QualityReport {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotReport> + '_ {
        self.slots.iter()
    }

    /// Number of slots classified faulty.
    pub fn n_faulty(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.status == HealthStatus::Faulty)
            .count()
    }
}

/// Reduce slot classifications to a crate verdict.
///
/// Faulty if any slot is faulty. An empty report is OK.
pub fn aggregate(report: &QualityReport) -> HealthStatus {
    if report.iter().any(|s| s.status == HealthStatus::Faulty) {
        HealthStatus::Faulty
    } else {
        HealthStatus::Ok
    }
}

/// Symmetric percentage difference between two radii.
///
/// `100 * |a - b| / (0.5 * (a + b))`; zero when both radii are zero.
pub fn radius_error_percent(r_slot: u32, r_template: u32) -> f64 {
    let a = r_slot as f64;
    let b = r_template as f64;
    let mean = 0.5 * (a + b);
    if mean == 0.0 {
        return 0.0;
    }
    100.0 * (a - b).abs() / mean
}

/// Classify a slot from its circle and the template circle.
///
/// Returns the status together with the error percentage when both circles
/// are present.
pub fn classify(
    slot_circle: Option<Circle>,
    template_circle: Option<Circle>,
    error_threshold: f64,
) -> (HealthStatus, Option<f64>) {
    let (Some(slot), Some(template)) = (slot_circle, template_circle) else {
        return (HealthStatus::Faulty, None);
    };
    let err = radius_error_percent(slot.r, template.r);
    let status = if err <= error_threshold {
        HealthStatus::Ok
    } else {
        HealthStatus::Faulty
    };
    (status, Some(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use approx::assert_relative_eq;

    fn report_of(statuses: &[HealthStatus]) -> QualityReport {
        QualityReport {
            slots: statuses
                .iter()
                .enumerate()
                .map(|(id, &status)| SlotReport {
                    slot: Slot {
                        id,
                        rect: Rectangle::from_origin_size(id as u32 * 10, 0, 10, 10),
                    },
                    status,
                    circle: None,
                    error_percent: None,
                })
                .collect(),
        }
    }

    fn circle(r: u32) -> Option<Circle> {
        Some(Circle { x: 45, y: 45, r })
    }

    #[test]
    fn error_percent_is_symmetric() {
        assert_relative_eq!(radius_error_percent(20, 20), 0.0);
        assert_relative_eq!(radius_error_percent(18, 22), 20.0);
        assert_relative_eq!(radius_error_percent(22, 18), 20.0);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // |18 - 22| / 20 = exactly 20%.
        let (status, err) = classify(circle(18), circle(22), 20.0);
        assert_eq!(status, HealthStatus::Ok);
        assert_relative_eq!(err.expect("error present"), 20.0);

        let (status, _) = classify(circle(18), circle(22), 19.999);
        assert_eq!(status, HealthStatus::Faulty);
    }

    #[test]
    fn missing_circle_is_faulty_regardless_of_threshold() {
        assert_eq!(classify(None, circle(20), 1000.0).0, HealthStatus::Faulty);
        assert_eq!(classify(circle(20), None, 1000.0).0, HealthStatus::Faulty);
        assert_eq!(classify(None, None, 1000.0), (HealthStatus::Faulty, None));
    }

    #[test]
    fn aggregate_is_or_over_faulty() {
        use HealthStatus::{Faulty, Ok};
        assert_eq!(aggregate(&report_of(&[Ok, Ok, Ok])), Ok);
        assert_eq!(aggregate(&report_of(&[Faulty, Faulty])), Faulty);
        assert_eq!(aggregate(&report_of(&[Ok, Faulty, Ok])), Faulty);
        assert_eq!(aggregate(&report_of(&[Ok, Ok, Faulty])), Faulty);
    }

    #[test]
    fn empty_report_aggregates_to_ok() {
        assert_eq!(aggregate(&QualityReport::default()), HealthStatus::Ok);
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&HealthStatus::Faulty).expect("serialize");
        assert_eq!(json, "\"FAULTY\"");
        assert_eq!(HealthStatus::Ok.to_string(), "OK");
    }

    #[test]
    fn n_faulty_counts_faulty_slots() {
        use HealthStatus::{Faulty, Ok};
        let report = report_of(&[Ok, Faulty, Faulty, Ok]);
        assert_eq!(report.n_faulty(), 2);
        assert_eq!(report.len(), 4);
    }
}
