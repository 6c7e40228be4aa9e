//! Row types for the hosted relational store
//!
//! Every row is scoped to the owning farmer through a foreign key, except
//! [`MarketPrice`] which is region-global and populated out of band.
//! `New*` structs are the insert payloads; the store assigns `id` and
//! `created_at`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coordinate pair as stored on the farmer profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Enumerated crop category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Cereal,
    Vegetable,
    Fruit,
    Pulse,
    Oilseed,
    CashCrop,
    Spice,
    Fodder,
}

/// Crop health, driven by disease recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    AtRisk,
    Diseased,
}

/// Ordinal severity of a disease or pest observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentStatus {
    Pending,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Weather,
    Disease,
    Irrigation,
    Market,
    Advisory,
}

/// Notification priority; high and critical are flagged visually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Falling,
    Steady,
}

/// The primary account entity. Created at signup by the identity layer;
/// read-only from this crate's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub location: Option<GeoPoint>,
    /// Land size in acres
    pub land_size: Option<f64>,
    pub soil_type: Option<String>,
    pub language_preference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub crop_name: String,
    pub crop_type: CropType,
    pub current_stage: String,
    pub health_status: HealthStatus,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    /// Cultivated area in acres, positive
    pub area: f64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a crop. Health status and growth stage take their
/// store-side defaults.
#[derive(Debug, Clone, Serialize)]
pub struct NewCrop {
    pub farmer_id: Uuid,
    pub crop_name: String,
    pub crop_type: CropType,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationSchedule {
    pub id: Uuid,
    pub crop_id: Uuid,
    pub scheduled_date: NaiveDate,
    /// Water amount in liters, positive
    pub water_amount: f64,
    /// Soil moisture percentage, 0-100
    pub soil_moisture_level: f64,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewIrrigationSchedule {
    pub crop_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub water_amount: f64,
    pub soil_moisture_level: f64,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub id: Uuid,
    pub crop_id: Uuid,
    pub disease_name: String,
    pub severity: Severity,
    pub notes: Option<String>,
    pub treatment_status: TreatmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDiseaseRecord {
    pub crop_id: Uuid,
    pub disease_name: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub treatment_status: TreatmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub farmer_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
}

/// Region-scoped price snapshot, read-only here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub id: Uuid,
    pub crop_name: String,
    pub region: String,
    pub price_per_kg: f64,
    pub market_demand: DemandLevel,
    pub trend: PriceTrend,
    pub recorded_at: DateTime<Utc>,
}

/// One chat exchange; append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub message: String,
    pub is_farmer: bool,
    pub response: Option<String>,
    /// Serialized advisory context the response was produced with
    pub context: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChatMessage {
    pub farmer_id: Uuid,
    pub message: String,
    pub is_farmer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}
