//! Delivery outcome dialogs: complete, door lock and damage report.
//!
//! Each step validates its form and then submits a status update through the
//! role-aware endpoint. No transition rules are applied here.

use chrono::Utc;

use crate::error::Result;
use crate::forms::{CompleteDeliveryForm, DamageReportForm, DoorLockForm, Validate};
use crate::models::{Delivery, DeliveryStatus, StatusUpdate};
use crate::services::DeliveryService;

pub fn completion_update(form: &CompleteDeliveryForm) -> StatusUpdate {
    let mut update = StatusUpdate::new(DeliveryStatus::Delivered);
    update.customer_name = Some(form.customer_name.trim().to_string());
    update.customer_signature = Some(form.signature.to_data_url());
    update.notes = form.notes();
    update.delivered_at = Some(Utc::now());
    update
}

pub fn door_lock_update(form: &DoorLockForm) -> StatusUpdate {
    let mut update = StatusUpdate::new(DeliveryStatus::DoorLock).with_notes(form.notes.trim());
    update.attempted_at = Some(form.attempted_at);
    update
}

pub fn damage_update(form: &DamageReportForm) -> StatusUpdate {
    let mut update = StatusUpdate::new(DeliveryStatus::Damaged).with_notes(form.notes.trim());
    update.items = Some(form.to_items());
    update
}

pub struct DeliveryWorkflow<'a> {
    deliveries: &'a DeliveryService,
}

impl<'a> DeliveryWorkflow<'a> {
    pub fn new(deliveries: &'a DeliveryService) -> Self {
        Self { deliveries }
    }

    pub async fn complete(&self, delivery: &Delivery, form: &CompleteDeliveryForm) -> Result<Delivery> {
        form.validate()?;
        let update = completion_update(form);
        tracing::info!(delivery_id = %delivery.short_id(), "Completing delivery");
        self.deliveries.update_status(&delivery.id, &update).await
    }

    pub async fn door_lock(&self, delivery: &Delivery, form: &DoorLockForm) -> Result<Delivery> {
        form.validate()?;
        let update = door_lock_update(form);
        tracing::info!(delivery_id = %delivery.short_id(), "Reporting door lock");
        self.deliveries.update_status(&delivery.id, &update).await
    }

    pub async fn damage_report(&self, delivery: &Delivery, form: &DamageReportForm) -> Result<Delivery> {
        form.validate()?;
        let update = damage_update(form);
        tracing::info!(delivery_id = %delivery.short_id(), "Reporting damaged or returned items");
        self.deliveries.update_status(&delivery.id, &update).await
    }
}
