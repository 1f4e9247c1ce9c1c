use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status labels.
///
/// The client treats these as an unordered label set: any status may be
/// submitted for any delivery and the server decides what is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    InTransit,
    Delivered,
    DoorLock,
    Damaged,
    Returned,
    PartiallyDelivered,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 7] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::DoorLock,
        DeliveryStatus::Damaged,
        DeliveryStatus::Returned,
        DeliveryStatus::PartiallyDelivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::DoorLock => "DOOR_LOCK",
            DeliveryStatus::Damaged => "DAMAGED",
            DeliveryStatus::Returned => "RETURNED",
            DeliveryStatus::PartiallyDelivered => "PARTIALLY_DELIVERED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::InTransit => "In Transit",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::DoorLock => "Door Lock",
            DeliveryStatus::Damaged => "Damaged",
            DeliveryStatus::Returned => "Returned",
            DeliveryStatus::PartiallyDelivered => "Partially Delivered",
        }
    }

    /// Still waiting on the agent (PENDING or IN_TRANSIT).
    pub fn is_open(&self) -> bool {
        matches!(self, DeliveryStatus::Pending | DeliveryStatus::InTransit)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        DeliveryStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| format!("unknown delivery status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl DeliveryPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryPriority::Low => "LOW",
            DeliveryPriority::Normal => "NORMAL",
            DeliveryPriority::High => "HIGH",
            DeliveryPriority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for DeliveryPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(DeliveryPriority::Low),
            "NORMAL" => Ok(DeliveryPriority::Normal),
            "HIGH" => Ok(DeliveryPriority::High),
            "URGENT" => Ok(DeliveryPriority::Urgent),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub damaged: bool,
    #[serde(default)]
    pub returned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damaged_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_quantity: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    #[serde(default)]
    pub delivery_agent_id: Option<String>,
    #[serde(default, alias = "deliveryItems")]
    pub items: Vec<DeliveryItem>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub priority: Option<DeliveryPriority>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivered_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_signature: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Delivery {
    /// First eight characters of the id, as shown in dialog titles.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_scheduled_on(&self, day: NaiveDate) -> bool {
        self.scheduled_date == Some(day)
    }
}

/// Body for creating a delivery (`POST /invteam/deliveries`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDelivery {
    pub delivery_agent_id: String,
    pub items: Vec<DeliveryItem>,
    pub customer_name: String,
    pub customer_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: DeliveryPriority,
    pub scheduled_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_priority() -> DeliveryPriority {
    DeliveryPriority::Normal
}

/// Body for a status change. Only the fields relevant to the outcome are sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<DeliveryItem>>,
}

impl StatusUpdate {
    pub fn new(status: DeliveryStatus) -> Self {
        Self {
            status,
            notes: None,
            customer_name: None,
            customer_signature: None,
            delivered_at: None,
            attempted_at: None,
            items: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Body for `PUT /dlteam/deliveries/{id}/complete`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub customer_name: String,
    pub customer_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
