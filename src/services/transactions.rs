use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{InventoryTransaction, TransactionType};

const BASE: &str = "/inventory/transactions";
const CONTEXT: &str = "Failed to fetch transactions";

/// `startTime`/`endTime` are sent as ISO local date-times.
fn range_query(start: NaiveDateTime, end: NaiveDateTime) -> [(&'static str, String); 2] {
    [
        ("startTime", start.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ("endTime", end.format("%Y-%m-%dT%H:%M:%S").to_string()),
    ]
}

pub struct TransactionService {
    api: Arc<ApiClient>,
}

impl TransactionService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<InventoryTransaction>> {
        self.api.get(BASE, CONTEXT).await
    }

    pub async fn get(&self, id: &str) -> Result<InventoryTransaction> {
        self.api
            .get(&format!("{}/{}", BASE, id), "Failed to fetch transaction")
            .await
    }

    pub async fn by_product(&self, product_id: &str) -> Result<Vec<InventoryTransaction>> {
        self.api
            .get(&format!("{}/product/{}", BASE, product_id), CONTEXT)
            .await
    }

    pub async fn by_sku(&self, sku: &str) -> Result<Vec<InventoryTransaction>> {
        self.api.get(&format!("{}/sku/{}", BASE, sku), CONTEXT).await
    }

    pub async fn by_type(&self, kind: TransactionType) -> Result<Vec<InventoryTransaction>> {
        self.api.get(&format!("{}/type/{}", BASE, kind), CONTEXT).await
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<InventoryTransaction>> {
        self.api.get(&format!("{}/user/{}", BASE, user_id), CONTEXT).await
    }

    pub async fn by_delivery(&self, delivery_id: &str) -> Result<Vec<InventoryTransaction>> {
        self.api
            .get(&format!("{}/delivery/{}", BASE, delivery_id), CONTEXT)
            .await
    }

    pub async fn by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InventoryTransaction>> {
        let query = range_query(start, end);
        self.api
            .get_with_query(&format!("{}/date-range", BASE), &query, CONTEXT)
            .await
    }

    pub async fn by_product_and_date_range(
        &self,
        product_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InventoryTransaction>> {
        let query = range_query(start, end);
        self.api
            .get_with_query(
                &format!("{}/product/{}/date-range", BASE, product_id),
                &query,
                CONTEXT,
            )
            .await
    }

    pub async fn create(&self, transaction: &InventoryTransaction) -> Result<InventoryTransaction> {
        self.api
            .post(BASE, transaction, "Failed to create transaction")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_range_query_format() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let query = range_query(start, end);
        assert_eq!(query[0], ("startTime", "2024-01-18T00:00:00".to_string()));
        assert_eq!(query[1], ("endTime", "2024-01-20T23:59:59".to_string()));
    }
}
