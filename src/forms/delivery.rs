use chrono::{DateTime, Utc};

use super::{is_blank, FieldErrors, Validate};
use crate::models::{CompletionRequest, Delivery, DeliveryItem};
use crate::signature::Signature;

#[derive(Clone, Debug, Default)]
pub struct CompleteDeliveryForm {
    pub customer_name: String,
    pub signature: Signature,
    pub notes: String,
}

impl CompleteDeliveryForm {
    pub fn new(customer_name: impl Into<String>, signature: Signature) -> Self {
        Self {
            customer_name: customer_name.into(),
            signature,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Trimmed notes, or `None` when nothing was written.
    pub fn notes(&self) -> Option<String> {
        let notes = self.notes.trim();
        (!notes.is_empty()).then(|| notes.to_string())
    }

    /// Body for the delivery team's dedicated completion endpoint.
    pub fn completion_request(&self) -> CompletionRequest {
        CompletionRequest {
            customer_name: self.customer_name.trim().to_string(),
            customer_signature: self.signature.to_data_url(),
            notes: self.notes(),
        }
    }
}

impl Validate for CompleteDeliveryForm {
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.customer_name) {
            errors.add("customerName", "Customer name is required");
        }
        if self.signature.is_empty() {
            errors.add("customerSignature", "Customer signature is required");
        }
        errors
    }
}

#[derive(Clone, Debug)]
pub struct DoorLockForm {
    pub notes: String,
    pub attempted_at: DateTime<Utc>,
}

impl DoorLockForm {
    pub fn new(notes: impl Into<String>) -> Self {
        Self {
            notes: notes.into(),
            attempted_at: Utc::now(),
        }
    }

    pub fn attempted_at(mut self, at: DateTime<Utc>) -> Self {
        self.attempted_at = at;
        self
    }
}

impl Default for DoorLockForm {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Validate for DoorLockForm {
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.notes) {
            errors.add("notes", "Please provide details about the door lock situation");
        }
        errors
    }
}

/// Damage/return state of one line item in the report dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemMark {
    pub sku: String,
    pub product_name: String,
    pub ordered: i64,
    pub damaged: bool,
    pub returned: bool,
    pub damaged_quantity: i64,
    pub returned_quantity: i64,
}

impl ItemMark {
    fn counts(&self) -> bool {
        (self.damaged && self.damaged_quantity > 0) || (self.returned && self.returned_quantity > 0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DamageReportForm {
    pub items: Vec<ItemMark>,
    pub notes: String,
}

impl DamageReportForm {
    /// One unmarked row per delivery line.
    pub fn for_delivery(delivery: &Delivery) -> Self {
        let items = delivery
            .items
            .iter()
            .map(|item| ItemMark {
                sku: item.sku.clone(),
                product_name: item.product_name.clone(),
                ordered: item.quantity,
                damaged: false,
                returned: false,
                damaged_quantity: 0,
                returned_quantity: 0,
            })
            .collect();
        Self {
            items,
            notes: String::new(),
        }
    }

    fn find(&mut self, sku: &str) -> Option<&mut ItemMark> {
        self.items.iter_mut().find(|m| m.sku == sku)
    }

    /// Returns false when no line carries `sku`.
    pub fn mark_damaged(&mut self, sku: &str, damaged: bool) -> bool {
        match self.find(sku) {
            Some(mark) => {
                mark.damaged = damaged;
                mark.damaged_quantity = if damaged { 1 } else { 0 };
                true
            }
            None => false,
        }
    }

    pub fn mark_returned(&mut self, sku: &str, returned: bool) -> bool {
        match self.find(sku) {
            Some(mark) => {
                mark.returned = returned;
                mark.returned_quantity = if returned { 1 } else { 0 };
                true
            }
            None => false,
        }
    }

    /// Quantities are clamped to `0..=ordered`.
    pub fn set_damaged_quantity(&mut self, sku: &str, quantity: i64) -> bool {
        match self.find(sku) {
            Some(mark) if mark.damaged => {
                mark.damaged_quantity = quantity.clamp(0, mark.ordered.max(0));
                true
            }
            _ => false,
        }
    }

    pub fn set_returned_quantity(&mut self, sku: &str, quantity: i64) -> bool {
        match self.find(sku) {
            Some(mark) if mark.returned => {
                mark.returned_quantity = quantity.clamp(0, mark.ordered.max(0));
                true
            }
            _ => false,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Line items as sent with the DAMAGED status update.
    pub fn to_items(&self) -> Vec<DeliveryItem> {
        self.items
            .iter()
            .map(|mark| DeliveryItem {
                product_id: None,
                sku: mark.sku.clone(),
                product_name: mark.product_name.clone(),
                quantity: mark.ordered,
                damaged: mark.damaged,
                returned: mark.returned,
                damaged_quantity: Some(mark.damaged_quantity),
                returned_quantity: Some(mark.returned_quantity),
            })
            .collect()
    }
}

impl Validate for DamageReportForm {
    /// Reports the first problem only, item selection before notes.
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.items.iter().any(ItemMark::counts) {
            errors.add("items", "Please select at least one damaged or returned item");
        } else if is_blank(&self.notes) {
            errors.add("notes", "Please provide details about the damage or return");
        }
        errors
    }
}
