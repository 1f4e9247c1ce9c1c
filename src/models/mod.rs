pub mod delivery;
pub mod product;
pub mod transaction;
pub mod user;

use serde::{Deserialize, Serialize};

pub use delivery::{
    CompletionRequest, Delivery, DeliveryItem, DeliveryPriority, DeliveryStatus, NewDelivery,
    StatusUpdate,
};
pub use product::{Product, ProductCategory, LOW_STOCK_THRESHOLD};
pub use transaction::{InventoryTransaction, TransactionType};
pub use user::{LoginResponse, Role, User};

/// Response envelope used by every backend endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}
