use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Delivery, DeliveryPriority, DeliveryStatus};

const MAPS_DIRECTIONS: &str = "https://www.google.com/maps/dir/";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub urgent: usize,
    pub high: usize,
    pub normal: usize,
    pub low: usize,
}

/// Today's work for a delivery agent.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDashboard {
    pub deliveries: Vec<Delivery>,
    pub priorities: PriorityCounts,
    pub total_items: i64,
}

/// Finished outcomes drop off the agent's list; door-lock stays for a retry.
pub fn is_pending_today(delivery: &Delivery) -> bool {
    !matches!(
        delivery.status,
        DeliveryStatus::Delivered | DeliveryStatus::Returned | DeliveryStatus::Damaged
    )
}

impl AgentDashboard {
    pub fn from_today(deliveries: Vec<Delivery>) -> Self {
        let deliveries: Vec<Delivery> = deliveries.into_iter().filter(is_pending_today).collect();
        let mut priorities = PriorityCounts::default();
        for d in &deliveries {
            match d.priority {
                Some(DeliveryPriority::Urgent) => priorities.urgent += 1,
                Some(DeliveryPriority::High) => priorities.high += 1,
                Some(DeliveryPriority::Low) => priorities.low += 1,
                Some(DeliveryPriority::Normal) | None => priorities.normal += 1,
            }
        }
        let total_items = deliveries.iter().map(Delivery::total_quantity).sum();
        Self {
            deliveries,
            priorities,
            total_items,
        }
    }
}

pub fn completed(deliveries: &[Delivery]) -> Vec<&Delivery> {
    deliveries
        .iter()
        .filter(|d| d.status == DeliveryStatus::Delivered)
        .collect()
}

pub fn scheduled_on(deliveries: &[Delivery], day: NaiveDate) -> Vec<&Delivery> {
    deliveries.iter().filter(|d| d.is_scheduled_on(day)).collect()
}

/// Directions link for the delivery address.
pub fn directions_url(address: &str) -> Option<String> {
    reqwest::Url::parse_with_params(MAPS_DIRECTIONS, &[("api", "1"), ("destination", address)])
        .ok()
        .map(String::from)
}
