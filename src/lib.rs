//! Client library for the DlVery delivery and inventory tracking service.

pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod signature;
pub mod views;
pub mod workflow;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use services::Services;
pub use session::{SessionEvent, SessionManager};
