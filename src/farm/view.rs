//! Pure view helpers over a farm snapshot
//!
//! These back the dashboard widgets; their edge-case policy is part of the
//! platform contract, so they live here rather than in any UI layer.

use chrono::NaiveDate;

use crate::store::{Crop, HealthStatus, IrrigationSchedule};

/// How many upcoming schedules the dashboard shows
pub const UPCOMING_WINDOW: usize = 5;

/// Signed calendar days from `today` until `harvest`, at UTC midnight
/// boundaries. Zero or negative means the harvest is due or overdue.
pub fn days_until_harvest(today: NaiveDate, harvest: NaiveDate) -> i64 {
    (harvest - today).num_days()
}

/// Dashboard label for a days-until-harvest value
pub fn harvest_label(days: i64) -> String {
    if days > 0 {
        format!("{} days until harvest", days)
    } else {
        "Ready to harvest".to_string()
    }
}

/// Growth progress as a percentage of the planting-to-harvest span,
/// clamped to 0-100.
///
/// A non-positive total span (planting on or after harvest) reads as fully
/// grown rather than an error; the recorded season has no extent left.
pub fn growth_progress(planting: NaiveDate, harvest: NaiveDate, today: NaiveDate) -> f64 {
    let total = (harvest - planting).num_days();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (today - planting).num_days();
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Incomplete schedules, soonest first, at most [`UPCOMING_WINDOW`]
pub fn upcoming_schedules(schedules: &[IrrigationSchedule]) -> Vec<&IrrigationSchedule> {
    let mut upcoming: Vec<&IrrigationSchedule> =
        schedules.iter().filter(|s| !s.completed).collect();
    upcoming.sort_by_key(|s| s.scheduled_date);
    upcoming.truncate(UPCOMING_WINDOW);
    upcoming
}

/// Crop counts by health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthSummary {
    pub healthy: usize,
    pub at_risk: usize,
    pub diseased: usize,
}

/// Tally crops by health status for the overview widget
pub fn health_summary(crops: &[Crop]) -> HealthSummary {
    let mut summary = HealthSummary::default();
    for crop in crops {
        match crop.health_status {
            HealthStatus::Healthy => summary.healthy += 1,
            HealthStatus::AtRisk => summary.at_risk += 1,
            HealthStatus::Diseased => summary.diseased += 1,
        }
    }
    summary
}
