use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    StockIn,
    StockOut,
    Return,
    Adjustment,
    Damaged,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::StockIn => "STOCK_IN",
            TransactionType::StockOut => "STOCK_OUT",
            TransactionType::Return => "RETURN",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::Damaged => "DAMAGED",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "STOCK_IN" => Ok(TransactionType::StockIn),
            "STOCK_OUT" => Ok(TransactionType::StockOut),
            "RETURN" => Ok(TransactionType::Return),
            "ADJUSTMENT" => Ok(TransactionType::Adjustment),
            "DAMAGED" => Ok(TransactionType::Damaged),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_id: String,
    #[serde(default)]
    pub sku: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}
