use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::forms::ProductForm;
use crate::http::ApiClient;
use crate::models::{Product, ProductCategory};

const BASE: &str = "/products";

pub struct ProductService {
    api: Arc<ApiClient>,
}

impl ProductService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.api.get(BASE, "Failed to fetch products").await
    }

    pub async fn get(&self, id: &str) -> Result<Product> {
        self.api
            .get(&format!("{}/{}", BASE, id), "Failed to fetch product")
            .await
    }

    pub async fn get_by_sku(&self, sku: &str) -> Result<Product> {
        self.api
            .get(&format!("{}/sku/{}", BASE, sku), "Failed to fetch product")
            .await
    }

    pub async fn by_category(&self, category: ProductCategory) -> Result<Vec<Product>> {
        self.api
            .get(&format!("{}/category/{}", BASE, category), "Failed to fetch products")
            .await
    }

    pub async fn damaged(&self) -> Result<Vec<Product>> {
        self.api
            .get(&format!("{}/damaged", BASE), "Failed to fetch damaged products")
            .await
    }

    pub async fn perishable(&self) -> Result<Vec<Product>> {
        self.api
            .get(&format!("{}/perishable", BASE), "Failed to fetch perishable products")
            .await
    }

    pub async fn expiring_before(&self, date: NaiveDate) -> Result<Vec<Product>> {
        let query = [("date", date.to_string())];
        self.api
            .get_with_query(
                &format!("{}/expiring-before", BASE),
                &query,
                "Failed to fetch expiring products",
            )
            .await
    }

    pub async fn expiring_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Product>> {
        let query = [("startDate", start.to_string()), ("endDate", end.to_string())];
        self.api
            .get_with_query(
                &format!("{}/expiring-between", BASE),
                &query,
                "Failed to fetch expiring products",
            )
            .await
    }

    /// Validates the form locally before anything is sent.
    pub async fn create(&self, form: &ProductForm) -> Result<Product> {
        let payload = form.to_payload()?;
        tracing::info!(sku = %payload.sku, "Creating product");
        self.api.post(BASE, &payload, "Failed to create product").await
    }

    pub async fn update(&self, id: &str, form: &ProductForm) -> Result<Product> {
        let payload = form.to_payload()?;
        self.api
            .put(&format!("{}/{}", BASE, id), Some(&payload), "Failed to update product")
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>> {
        self.api
            .delete(&format!("{}/{}", BASE, id), "Failed to delete product")
            .await
    }

    /// Apply a signed stock change, e.g. `-3` after a manual count.
    pub async fn adjust_quantity(&self, id: &str, change: i64) -> Result<Product> {
        let query = [("quantityChange", change.to_string())];
        self.api
            .patch_with_query(
                &format!("{}/{}/quantity", BASE, id),
                &query,
                "Failed to update product quantity",
            )
            .await
    }
}
