use serde::Serialize;

use crate::models::{Delivery, DeliveryStatus, Product};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Door lock, damaged, returned and partial deliveries.
    pub issues: usize,
}

impl DeliveryStats {
    pub fn from_deliveries(deliveries: &[Delivery]) -> Self {
        deliveries.iter().fold(
            DeliveryStats {
                total: deliveries.len(),
                ..Default::default()
            },
            |mut stats, d| {
                match d.status {
                    DeliveryStatus::Delivered => stats.completed += 1,
                    s if s.is_open() => stats.pending += 1,
                    _ => stats.issues += 1,
                }
                stats
            },
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub low_stock: usize,
    pub damaged: usize,
}

impl ProductStats {
    pub fn from_products(products: &[Product]) -> Self {
        ProductStats {
            total: products.len(),
            low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
            damaged: products.iter().filter(|p| p.damaged).count(),
        }
    }
}
