//! Farm operations: snapshot access, mutations and the advisory bridge
//!
//! [`FarmClient`] is the one entry point the presentation layer talks to.
//! It owns an explicit per-farmer snapshot cache: reads serve the last
//! good snapshot, and every successful mutation invalidates the owning
//! farmer's entry so the next read re-aggregates.

mod snapshot;
mod view;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::advisory::{AdvisoryClient, AdvisoryContext};
use crate::error::Error;
use crate::store::{
    ChatMessage, Crop, DiseaseRecord, FarmStore, Farmer, HealthStatus, IrrigationSchedule,
    MarketPrice, NewChatMessage, NewCrop, NewDiseaseRecord, NewIrrigationSchedule,
    NewNotification, NotificationType, Priority, Severity, TreatmentStatus,
};
use crate::weather::CurrentWeather;

pub use snapshot::{load_farm_snapshot, owned_schedules, FarmSnapshot, NOTIFICATION_WINDOW};
pub use view::{
    days_until_harvest, growth_progress, harvest_label, health_summary, upcoming_schedules,
    HealthSummary, UPCOMING_WINDOW,
};

/// A disease or pest observation to record against a crop
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseReport {
    pub crop_id: Uuid,
    pub disease_name: String,
    pub severity: Severity,
    pub notes: Option<String>,
}

/// An irrigation task to schedule against a crop
#[derive(Debug, Clone, Deserialize)]
pub struct IrrigationRequest {
    pub crop_id: Uuid,
    pub scheduled_date: chrono::NaiveDate,
    pub water_amount: f64,
    pub soil_moisture_level: f64,
    pub notes: Option<String>,
}

/// Farm-facing client: snapshots, mutations, advisory chat
pub struct FarmClient {
    store: FarmStore,
    cache: Mutex<HashMap<Uuid, Arc<FarmSnapshot>>>,
}

impl FarmClient {
    /// Create a new FarmClient over a store gateway
    pub(crate) fn new(store: FarmStore) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store gateway
    pub fn store(&self) -> &FarmStore {
        &self.store
    }

    /// The farmer's snapshot, served from cache when one is present
    pub async fn snapshot(&self, farmer_id: Uuid) -> Result<Arc<FarmSnapshot>, Error> {
        if let Some(snap) = self.cache.lock().await.get(&farmer_id) {
            debug!(%farmer_id, "snapshot cache hit");
            return Ok(Arc::clone(snap));
        }
        self.refresh(farmer_id).await
    }

    /// Re-aggregate the farmer's snapshot and repopulate the cache
    pub async fn refresh(&self, farmer_id: Uuid) -> Result<Arc<FarmSnapshot>, Error> {
        let snap = Arc::new(load_farm_snapshot(&self.store, farmer_id).await?);
        self.cache
            .lock()
            .await
            .insert(farmer_id, Arc::clone(&snap));
        Ok(snap)
    }

    /// Drop the farmer's cached snapshot; the next read re-aggregates
    pub async fn invalidate(&self, farmer_id: Uuid) {
        if self.cache.lock().await.remove(&farmer_id).is_some() {
            debug!(%farmer_id, "snapshot invalidated");
        }
    }

    /// Register a new crop.
    ///
    /// Validations run before any write: non-empty name, positive area,
    /// harvest strictly after planting.
    pub async fn add_crop(&self, input: NewCrop) -> Result<Crop, Error> {
        if input.crop_name.trim().is_empty() {
            return Err(Error::validation("crop name is required"));
        }
        if !(input.area.is_finite() && input.area > 0.0) {
            return Err(Error::validation("area must be a positive number of acres"));
        }
        if input.expected_harvest_date <= input.planting_date {
            return Err(Error::validation(
                "expected harvest date must be after the planting date",
            ));
        }

        let farmer_id = input.farmer_id;
        let crop = self.store.insert_crop(&input).await?;
        self.invalidate(farmer_id).await;
        Ok(crop)
    }

    /// Record a disease observation against one of the farmer's crops.
    ///
    /// Three dependent writes run in sequence: the disease record, the
    /// crop health transition (low severity puts the crop at risk, any
    /// other severity marks it diseased) and a disease notification whose
    /// priority is high only for high severity. A failure after the first
    /// write unwinds the completed steps before the error is returned, so
    /// a half-applied recording does not linger.
    pub async fn record_disease(
        &self,
        farmer_id: Uuid,
        report: DiseaseReport,
    ) -> Result<DiseaseRecord, Error> {
        if report.disease_name.trim().is_empty() {
            return Err(Error::validation("disease name is required"));
        }

        let crop = self
            .store
            .crop_owned_by(report.crop_id, farmer_id)
            .await?
            .ok_or_else(|| Error::validation("crop not found for this farmer"))?;
        let prior_health = crop.health_status;

        let record = self
            .store
            .insert_disease_record(&NewDiseaseRecord {
                crop_id: report.crop_id,
                disease_name: report.disease_name.clone(),
                severity: report.severity,
                notes: report.notes.clone(),
                treatment_status: TreatmentStatus::Pending,
            })
            .await?;

        let new_health = match report.severity {
            Severity::Low => HealthStatus::AtRisk,
            Severity::Medium | Severity::High => HealthStatus::Diseased,
        };

        if let Err(err) = self.store.update_crop_health(report.crop_id, new_health).await {
            warn!(%farmer_id, crop_id = %report.crop_id, "health update failed, unwinding disease record");
            if let Err(comp) = self.store.delete_disease_record(record.id).await {
                warn!(record_id = %record.id, error = %comp, "could not unwind disease record");
            }
            return Err(err);
        }

        let notification = NewNotification {
            farmer_id,
            title: "Disease detected".to_string(),
            message: format!(
                "{} detected in your crop. Severity: {}",
                report.disease_name, report.severity
            ),
            kind: NotificationType::Disease,
            priority: match report.severity {
                Severity::High => Priority::High,
                _ => Priority::Medium,
            },
        };

        if let Err(err) = self.store.insert_notification(&notification).await {
            warn!(%farmer_id, crop_id = %report.crop_id, "notification insert failed, unwinding disease recording");
            if let Err(comp) = self
                .store
                .update_crop_health(report.crop_id, prior_health)
                .await
            {
                warn!(crop_id = %report.crop_id, error = %comp, "could not restore crop health");
            }
            if let Err(comp) = self.store.delete_disease_record(record.id).await {
                warn!(record_id = %record.id, error = %comp, "could not unwind disease record");
            }
            return Err(err);
        }

        self.invalidate(farmer_id).await;
        Ok(record)
    }

    /// Schedule irrigation for one of the farmer's crops
    pub async fn schedule_irrigation(
        &self,
        farmer_id: Uuid,
        request: IrrigationRequest,
    ) -> Result<IrrigationSchedule, Error> {
        if !(request.water_amount.is_finite() && request.water_amount > 0.0) {
            return Err(Error::validation(
                "water amount must be a positive number of liters",
            ));
        }
        if !(0.0..=100.0).contains(&request.soil_moisture_level) {
            return Err(Error::validation(
                "soil moisture level must be between 0 and 100",
            ));
        }
        self.store
            .crop_owned_by(request.crop_id, farmer_id)
            .await?
            .ok_or_else(|| Error::validation("crop not found for this farmer"))?;

        let created = self
            .store
            .insert_schedule(&NewIrrigationSchedule {
                crop_id: request.crop_id,
                scheduled_date: request.scheduled_date,
                water_amount: request.water_amount,
                soil_moisture_level: request.soil_moisture_level,
                completed: false,
                notes: request.notes,
            })
            .await?;
        self.invalidate(farmer_id).await;
        Ok(created)
    }

    /// Flip a schedule's completion flag from a known current value.
    ///
    /// The write is conditional on `expected_current`; when another
    /// session toggled the flag first the call fails with
    /// [`Error::Conflict`] and the caller refreshes before retrying.
    pub async fn set_schedule_completed(
        &self,
        farmer_id: Uuid,
        schedule_id: Uuid,
        expected_current: bool,
    ) -> Result<IrrigationSchedule, Error> {
        let updated = self
            .store
            .set_schedule_completed(schedule_id, expected_current, !expected_current)
            .await?;
        self.invalidate(farmer_id).await;
        Ok(updated)
    }

    /// Mark one of the farmer's notifications as read
    pub async fn mark_notification_read(
        &self,
        farmer_id: Uuid,
        notification_id: Uuid,
    ) -> Result<(), Error> {
        self.store.mark_notification_read(notification_id).await?;
        self.invalidate(farmer_id).await;
        Ok(())
    }

    /// The most recent market price snapshots
    pub async fn market_prices(&self) -> Result<Vec<MarketPrice>, Error> {
        self.store.latest_market_prices().await
    }

    /// The farmer's chat history, oldest first
    pub async fn chat_history(&self, farmer_id: Uuid) -> Result<Vec<ChatMessage>, Error> {
        self.store.chat_history(farmer_id).await
    }

    /// Ask the advisory backend a question on behalf of a farmer.
    ///
    /// The advisory context is assembled from the farmer's snapshot (first
    /// crop), profile (soil type, location, land size) and the current
    /// weather when the caller has one. The exchange is appended to chat
    /// history together with the serialized context it was answered with.
    pub async fn ask_advisor(
        &self,
        advisory: &AdvisoryClient,
        farmer: &Farmer,
        weather: Option<&CurrentWeather>,
        query: &str,
    ) -> Result<String, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("query must not be empty"));
        }

        let snapshot = self.snapshot(farmer.id).await?;
        let context = AdvisoryContext {
            crop_type: snapshot.crops.first().map(|c| c.crop_name.clone()),
            soil_type: farmer.soil_type.clone(),
            location: farmer.location,
            weather: weather.cloned(),
            farm_size: farmer.land_size,
        };

        let response = advisory.get_advisory(query, Some(&context)).await?;

        self.store
            .insert_chat_message(&NewChatMessage {
                farmer_id: farmer.id,
                message: query.to_string(),
                is_farmer: true,
                response: Some(response.clone()),
                context: Some(serde_json::to_value(&context)?),
            })
            .await?;

        Ok(response)
    }
}
