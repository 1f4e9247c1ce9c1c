//! One service per backend area.

pub mod auth;
pub mod deliveries;
pub mod products;
pub mod profile;
pub mod transactions;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiClient;
use crate::session::SessionManager;

pub use auth::AuthService;
pub use deliveries::DeliveryService;
pub use products::ProductService;
pub use profile::ProfileService;
pub use transactions::TransactionService;

/// Every service wired to one client and one session.
pub struct Services {
    pub session: Arc<SessionManager>,
    pub api: Arc<ApiClient>,
    pub auth: AuthService,
    pub products: ProductService,
    pub deliveries: DeliveryService,
    pub transactions: TransactionService,
    pub profile: ProfileService,
}

impl Services {
    pub fn new(cfg: &ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(cfg, session.clone())?);
        Ok(Self::from_client(api))
    }

    pub fn from_client(api: Arc<ApiClient>) -> Self {
        let session = api.session().clone();
        Self {
            auth: AuthService::new(api.clone(), session.clone()),
            products: ProductService::new(api.clone()),
            deliveries: DeliveryService::new(api.clone(), session.clone()),
            transactions: TransactionService::new(api.clone()),
            profile: ProfileService::new(api.clone(), session.clone()),
            session,
            api,
        }
    }
}
