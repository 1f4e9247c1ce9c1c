use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::{check_length, is_blank, FieldErrors, Validate};
use crate::error::Result;
use crate::models::{Product, ProductCategory};

/// Raw product form input, as typed by the operator.
#[derive(Clone, Debug, Default)]
pub struct ProductForm {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: String,
    pub damaged: bool,
    pub perishable: bool,
    pub expiry_date: Option<NaiveDate>,
}

/// Body sent to `POST /products` and `PUT /products/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub quantity: i64,
    pub damaged: bool,
    pub perishable: bool,
    pub expiry_date: Option<NaiveDate>,
}

impl ProductForm {
    /// Prefill the edit form from an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.as_str().to_string(),
            quantity: product.quantity.to_string(),
            damaged: product.damaged,
            perishable: product.perishable,
            expiry_date: product.expiry_date,
        }
    }

    pub fn errors_on(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.sku) {
            errors.add("sku", "SKU is required");
        } else {
            check_length(&mut errors, "sku", self.sku.trim(), 3, 20, "SKU");
        }

        if is_blank(&self.name) {
            errors.add("name", "Name is required");
        } else {
            check_length(&mut errors, "name", self.name.trim(), 2, 100, "Name");
        }

        if self.description.chars().count() > 500 {
            errors.add("description", "Description must be at most 500 characters");
        }

        if is_blank(&self.category) {
            errors.add("category", "Category is required");
        } else if self.category.parse::<ProductCategory>().is_err() {
            errors.add("category", "Invalid category");
        }

        if is_blank(&self.quantity) {
            errors.add("quantity", "Quantity is required");
        } else {
            match self.quantity.trim().parse::<i64>() {
                Ok(q) if q < 0 => errors.add("quantity", "Quantity cannot be negative"),
                Ok(_) => {}
                Err(_) => errors.add("quantity", "Quantity must be an integer"),
            }
        }

        if self.perishable {
            match self.expiry_date {
                None => errors.add("expiryDate", "Expiry date is required for perishable items"),
                Some(date) if date <= today => {
                    errors.add("expiryDate", "Expiry date must be in the future")
                }
                Some(_) => {}
            }
        }

        errors
    }

    pub fn to_payload_on(&self, today: NaiveDate) -> Result<ProductPayload> {
        self.errors_on(today).into_result()?;
        // Validation above guarantees both parses succeed.
        let category = self.category.parse().unwrap_or(ProductCategory::Other);
        let quantity = self.quantity.trim().parse().unwrap_or_default();
        let description = self.description.trim().to_string();

        Ok(ProductPayload {
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            description,
            category,
            quantity,
            damaged: self.damaged,
            perishable: self.perishable,
            expiry_date: self.expiry_date,
        })
    }

    pub fn to_payload(&self) -> Result<ProductPayload> {
        self.to_payload_on(Local::now().date_naive())
    }
}

impl Validate for ProductForm {
    fn errors(&self) -> FieldErrors {
        self.errors_on(Local::now().date_naive())
    }
}
