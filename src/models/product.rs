use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Products below this quantity count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Food,
    Medicine,
    Furniture,
    Toys,
    Books,
    Essential,
    Emergency,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 10] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::Food,
        ProductCategory::Medicine,
        ProductCategory::Furniture,
        ProductCategory::Toys,
        ProductCategory::Books,
        ProductCategory::Essential,
        ProductCategory::Emergency,
        ProductCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "ELECTRONICS",
            ProductCategory::Clothing => "CLOTHING",
            ProductCategory::Food => "FOOD",
            ProductCategory::Medicine => "MEDICINE",
            ProductCategory::Furniture => "FURNITURE",
            ProductCategory::Toys => "TOYS",
            ProductCategory::Books => "BOOKS",
            ProductCategory::Essential => "ESSENTIAL",
            ProductCategory::Emergency => "EMERGENCY",
            ProductCategory::Other => "OTHER",
        }
    }

    /// "ELECTRONICS" -> "Electronics"
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut out = String::with_capacity(raw.len());
        out.push_str(&raw[..1]);
        out.push_str(&raw[1..].to_ascii_lowercase());
        out
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ProductCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| "Invalid category".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ProductCategory,
    #[serde(default)]
    pub damaged: bool,
    #[serde(default)]
    pub perishable: bool,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    pub fn is_expired_on(&self, day: NaiveDate) -> bool {
        matches!(self.expiry_date, Some(expiry) if expiry <= day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        assert_eq!(ProductCategory::Electronics.label(), "Electronics");
        assert_eq!(ProductCategory::Other.label(), "Other");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("medicine".parse::<ProductCategory>().unwrap(), ProductCategory::Medicine);
        assert_eq!("GADGETS".parse::<ProductCategory>().unwrap_err(), "Invalid category");
    }

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": "p1", "sku": "SKU-001", "name": "Insulin",
            "category": "MEDICINE", "perishable": true,
            "expiryDate": "2030-01-31", "quantity": 3
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_low_stock());
        assert!(!product.damaged);
        assert_eq!(product.expiry_date, NaiveDate::from_ymd_opt(2030, 1, 31));
    }
}
