use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::http::ApiClient;
use crate::models::{
    CompletionRequest, Delivery, DeliveryItem, DeliveryStatus, NewDelivery, Role, StatusUpdate,
};
use crate::session::SessionManager;

const INVTEAM: &str = "/invteam/deliveries";
const DLTEAM: &str = "/dlteam/deliveries";
const FETCH_FAILED: &str = "Failed to fetch deliveries";

#[derive(Serialize)]
struct DoorLockBody<'a> {
    notes: &'a str,
}

pub struct DeliveryService {
    api: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl DeliveryService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Path prefix for the signed-in user's team.
    pub fn role_base(&self) -> Result<&'static str> {
        let user = self.session.current_user().ok_or(ClientError::NotAuthenticated)?;
        Ok(match user.role {
            Role::InvTeam => INVTEAM,
            Role::DlTeam => DLTEAM,
        })
    }

    // Inventory team

    pub async fn create(&self, delivery: &NewDelivery) -> Result<Delivery> {
        tracing::info!(customer = %delivery.customer_name, items = delivery.items.len(), "Creating delivery");
        self.api.post(INVTEAM, delivery, "Failed to create delivery").await
    }

    pub async fn all(&self) -> Result<Vec<Delivery>> {
        self.api.get(INVTEAM, FETCH_FAILED).await
    }

    pub async fn by_agent(&self, agent_id: &str) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/agent/{}", INVTEAM, agent_id), FETCH_FAILED)
            .await
    }

    pub async fn by_status(&self, status: DeliveryStatus) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/status/{}", INVTEAM, status), FETCH_FAILED)
            .await
    }

    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/date/{}", INVTEAM, date), FETCH_FAILED)
            .await
    }

    pub async fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Delivery>> {
        let query = [("startDate", start.to_string()), ("endDate", end.to_string())];
        self.api
            .get_with_query(
                &format!("{}/date-range", INVTEAM),
                &query,
                "Failed to fetch deliveries by date range",
            )
            .await
    }

    pub async fn by_sku(&self, sku: &str) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/sku/{}", INVTEAM, sku), FETCH_FAILED)
            .await
    }

    pub async fn damaged(&self) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/damaged", INVTEAM), "Failed to fetch damaged deliveries")
            .await
    }

    // Delivery team

    pub async fn my(&self) -> Result<Vec<Delivery>> {
        self.api.get(&format!("{}/my", DLTEAM), FETCH_FAILED).await
    }

    pub async fn my_today(&self) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/my/today", DLTEAM), "Failed to fetch today's deliveries")
            .await
    }

    pub async fn my_pending(&self) -> Result<Vec<Delivery>> {
        self.api
            .get(&format!("{}/my/pending", DLTEAM), "Failed to fetch pending deliveries")
            .await
    }

    pub async fn start(&self, id: &str) -> Result<Delivery> {
        self.api
            .put::<Delivery, ()>(&format!("{}/{}/start", DLTEAM, id), None, "Failed to start delivery")
            .await
    }

    pub async fn complete(&self, id: &str, request: &CompletionRequest) -> Result<Delivery> {
        self.api
            .put(
                &format!("{}/{}/complete", DLTEAM, id),
                Some(request),
                "Failed to complete delivery",
            )
            .await
    }

    pub async fn mark_door_lock(&self, id: &str, notes: &str) -> Result<Delivery> {
        self.api
            .put(
                &format!("{}/{}/door-lock", DLTEAM, id),
                Some(&DoorLockBody { notes }),
                "Failed to mark delivery as door lock",
            )
            .await
    }

    /// Sends `update` with its status forced to DAMAGED.
    pub async fn report_damage(&self, id: &str, mut update: StatusUpdate) -> Result<Delivery> {
        update.status = DeliveryStatus::Damaged;
        self.api
            .put(&format!("{}/{}/status", DLTEAM, id), Some(&update), "Failed to report damage")
            .await
    }

    pub async fn return_delivery(&self, id: &str, mut update: StatusUpdate) -> Result<Delivery> {
        update.status = DeliveryStatus::Returned;
        self.api
            .put(&format!("{}/{}/status", DLTEAM, id), Some(&update), "Failed to return delivery")
            .await
    }

    // Either team; the path follows the signed-in role.

    pub async fn get(&self, id: &str) -> Result<Delivery> {
        let base = self.role_base()?;
        self.api
            .get(&format!("{}/{}", base, id), "Failed to fetch delivery")
            .await
    }

    /// Any status may be sent for any delivery; the server decides what is legal.
    pub async fn update_status(&self, id: &str, update: &StatusUpdate) -> Result<Delivery> {
        let base = self.role_base()?;
        tracing::info!(delivery_id = %id, status = %update.status, "Updating delivery status");
        self.api
            .put(
                &format!("{}/{}/status", base, id),
                Some(update),
                "Failed to update delivery status",
            )
            .await
    }

    pub async fn update_items(&self, id: &str, items: &[DeliveryItem]) -> Result<Delivery> {
        let base = self.role_base()?;
        self.api
            .put(
                &format!("{}/{}/items", base, id),
                Some(items),
                "Failed to update delivery items",
            )
            .await
    }
}
