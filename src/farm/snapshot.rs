//! Farm snapshot aggregation
//!
//! One aggregation call fans out three independent store reads, joins on
//! completion of all of them, and reconciles the result into a single
//! consistent [`FarmSnapshot`]. There is no partial-result path: any
//! failed read fails the whole aggregation and the caller retries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::error::Error;
use crate::store::{Crop, FarmStore, IrrigationSchedule, Notification};

/// How many notifications one aggregation fetches
pub const NOTIFICATION_WINDOW: i32 = 20;

/// The aggregated, read-only bundle of a farmer's state
#[derive(Debug, Clone, Serialize)]
pub struct FarmSnapshot {
    /// The farmer's crops, newest first
    pub crops: Vec<Crop>,
    /// The most recent notifications, newest first
    pub notifications: Vec<Notification>,
    /// Irrigation schedules for the farmer's own crops, ascending by date
    pub schedules: Vec<IrrigationSchedule>,
    /// When this snapshot was assembled
    pub loaded_at: DateTime<Utc>,
}

/// Load a consistent snapshot of a farmer's crops, notifications and
/// irrigation schedules.
///
/// The three reads run in parallel; results are consumed only once every
/// branch has resolved. Read-only and idempotent; every call re-fetches.
pub async fn load_farm_snapshot(
    store: &FarmStore,
    farmer_id: Uuid,
) -> Result<FarmSnapshot, Error> {
    debug!(%farmer_id, "aggregating farm snapshot");

    let (crops, notifications, schedules) = tokio::try_join!(
        store.crops_for(farmer_id),
        store.recent_notifications(farmer_id, NOTIFICATION_WINDOW),
        store.schedules_by_date(),
    )?;

    let schedules = owned_schedules(&crops, schedules);
    debug!(
        crops = crops.len(),
        notifications = notifications.len(),
        schedules = schedules.len(),
        "snapshot assembled"
    );

    Ok(FarmSnapshot {
        crops,
        notifications,
        schedules,
        loaded_at: Utc::now(),
    })
}

/// Keep only schedules whose crop belongs to the given crop set.
///
/// The store does not enforce the schedule-to-owned-crop join, so this
/// filter is where the ownership invariant is established.
pub fn owned_schedules(
    crops: &[Crop],
    schedules: Vec<IrrigationSchedule>,
) -> Vec<IrrigationSchedule> {
    let owned: HashSet<Uuid> = crops.iter().map(|c| c.id).collect();
    schedules
        .into_iter()
        .filter(|s| owned.contains(&s.crop_id))
        .collect()
}
