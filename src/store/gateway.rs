//! Typed accessors over the store's collections
//!
//! All reads and writes the rest of the crate performs go through here, so
//! the table names, column filters and orderings live in one place.

use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::store::models::*;
use crate::store::StoreClient;

/// How many market price rows a listing returns
pub const MARKET_PRICE_WINDOW: i32 = 50;

/// How many chat messages a history fetch returns
pub const CHAT_HISTORY_WINDOW: i32 = 50;

/// Typed gateway to the farm data collections
#[derive(Clone)]
pub struct FarmStore {
    url: String,
    key: String,
    schema: String,
    client: Client,
}

impl FarmStore {
    /// Create a new FarmStore
    pub(crate) fn new(url: &str, key: &str, options: &ClientOptions, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            schema: options.db_schema.clone(),
            client,
        }
    }

    fn from(&self, table: &str) -> StoreClient {
        StoreClient::new(&self.url, &self.key, &self.schema, table, self.client.clone())
    }

    /// Fetch the farmer profile linked to an identity-provider user
    pub async fn farmer_by_user(&self, user_id: Uuid) -> Result<Option<Farmer>, Error> {
        self.from("farmers")
            .select("*")
            .eq("user_id", user_id)
            .execute_one()
            .await
    }

    /// All crops owned by a farmer, newest first
    pub async fn crops_for(&self, farmer_id: Uuid) -> Result<Vec<Crop>, Error> {
        self.from("crops")
            .select("*")
            .eq("farmer_id", farmer_id)
            .order("created_at", false)
            .execute()
            .await
    }

    /// A crop by id, but only if the given farmer owns it
    pub async fn crop_owned_by(
        &self,
        crop_id: Uuid,
        farmer_id: Uuid,
    ) -> Result<Option<Crop>, Error> {
        self.from("crops")
            .select("*")
            .eq("id", crop_id)
            .eq("farmer_id", farmer_id)
            .execute_one()
            .await
    }

    /// The most recent notifications for a farmer, newest first
    pub async fn recent_notifications(
        &self,
        farmer_id: Uuid,
        limit: i32,
    ) -> Result<Vec<Notification>, Error> {
        self.from("notifications")
            .select("*")
            .eq("farmer_id", farmer_id)
            .order("created_at", false)
            .limit(limit)
            .execute()
            .await
    }

    /// All irrigation schedules, ascending by scheduled date.
    ///
    /// This read is store-wide: the store does not enforce the
    /// schedule-to-owned-crop join, so ownership filtering happens in the
    /// aggregator.
    pub async fn schedules_by_date(&self) -> Result<Vec<IrrigationSchedule>, Error> {
        self.from("irrigation_schedules")
            .select("*")
            .order("scheduled_date", true)
            .execute()
            .await
    }

    /// Insert a crop and return the created row
    pub async fn insert_crop(&self, row: &NewCrop) -> Result<Crop, Error> {
        let mut created = self.from("crops").insert(row).execute::<Crop>().await?;
        created
            .pop()
            .ok_or_else(|| Error::store("crop insert returned no representation"))
    }

    /// Insert a disease record and return the created row
    pub async fn insert_disease_record(
        &self,
        row: &NewDiseaseRecord,
    ) -> Result<DiseaseRecord, Error> {
        let mut created = self
            .from("disease_records")
            .insert(row)
            .execute::<DiseaseRecord>()
            .await?;
        created
            .pop()
            .ok_or_else(|| Error::store("disease record insert returned no representation"))
    }

    /// Delete a disease record; used only to unwind a failed recording sequence
    pub async fn delete_disease_record(&self, id: Uuid) -> Result<(), Error> {
        self.from("disease_records")
            .delete()
            .eq("id", id)
            .execute_no_return()
            .await
    }

    /// Set a crop's health status
    pub async fn update_crop_health(
        &self,
        crop_id: Uuid,
        status: HealthStatus,
    ) -> Result<(), Error> {
        self.from("crops")
            .update(json!({ "health_status": status }))
            .eq("id", crop_id)
            .execute_no_return()
            .await
    }

    /// Insert a notification and return the created row
    pub async fn insert_notification(
        &self,
        row: &NewNotification,
    ) -> Result<Notification, Error> {
        let mut created = self
            .from("notifications")
            .insert(row)
            .execute::<Notification>()
            .await?;
        created
            .pop()
            .ok_or_else(|| Error::store("notification insert returned no representation"))
    }

    /// Mark a notification as read
    pub async fn mark_notification_read(&self, id: Uuid) -> Result<(), Error> {
        self.from("notifications")
            .update(json!({ "read": true }))
            .eq("id", id)
            .execute_no_return()
            .await
    }

    /// Insert an irrigation schedule and return the created row
    pub async fn insert_schedule(
        &self,
        row: &NewIrrigationSchedule,
    ) -> Result<IrrigationSchedule, Error> {
        let mut created = self
            .from("irrigation_schedules")
            .insert(row)
            .execute::<IrrigationSchedule>()
            .await?;
        created
            .pop()
            .ok_or_else(|| Error::store("schedule insert returned no representation"))
    }

    /// Flip a schedule's completion flag, conditional on its expected
    /// current value.
    ///
    /// The PATCH is filtered by both id and the expected flag; when no row
    /// matches, another session toggled it first and the call fails with
    /// [`Error::Conflict`].
    pub async fn set_schedule_completed(
        &self,
        id: Uuid,
        expected_current: bool,
        value: bool,
    ) -> Result<IrrigationSchedule, Error> {
        let mut updated = self
            .from("irrigation_schedules")
            .update(json!({ "completed": value }))
            .eq("id", id)
            .eq("completed", expected_current)
            .execute::<IrrigationSchedule>()
            .await?;
        updated.pop().ok_or_else(|| {
            Error::conflict(format!(
                "schedule {} was not in the expected completion state",
                id
            ))
        })
    }

    /// The most recent market price snapshots, newest first
    pub async fn latest_market_prices(&self) -> Result<Vec<MarketPrice>, Error> {
        self.from("market_prices")
            .select("*")
            .order("recorded_at", false)
            .limit(MARKET_PRICE_WINDOW)
            .execute()
            .await
    }

    /// A farmer's chat history, oldest first
    pub async fn chat_history(&self, farmer_id: Uuid) -> Result<Vec<ChatMessage>, Error> {
        self.from("chat_history")
            .select("*")
            .eq("farmer_id", farmer_id)
            .order("created_at", true)
            .limit(CHAT_HISTORY_WINDOW)
            .execute()
            .await
    }

    /// Append a chat message and return the created row
    pub async fn insert_chat_message(&self, row: &NewChatMessage) -> Result<ChatMessage, Error> {
        let mut created = self
            .from("chat_history")
            .insert(row)
            .execute::<ChatMessage>()
            .await?;
        created
            .pop()
            .ok_or_else(|| Error::store("chat insert returned no representation"))
    }
}
