//! Route table and role gating.
//!
//! The guard is advisory: it decides which view to show, the server still
//! checks every request.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::{Role, User};
use crate::session::{SessionEvent, SessionManager};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    GoogleCallback,
    Unauthorized,
    Dashboard,
    Profile,
    Reports,
    Inventory,
    Products,
    ProductAdd,
    ProductEdit(String),
    InventoryDeliveries,
    InventoryDeliveryDetails(String),
    Transactions,
    DeliveryHome,
    DeliveryDashboard,
    DeliveryDetails(String),
    TodayDeliveries,
    PendingDeliveries,
    Assignments,
    History,
    MyDeliveries,
    CompletedDeliveries,
    NotFound(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

impl Route {
    /// Map a path to its route. Unknown paths become `NotFound`.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["oauth", "callback", "google"] => Route::GoogleCallback,
            ["unauthorized"] => Route::Unauthorized,
            ["profile"] => Route::Profile,
            ["reports"] => Route::Reports,
            ["inventory"] => Route::Inventory,
            ["inventory", "products"] => Route::Products,
            ["inventory", "products", "add"] | ["inventory", "add"] => Route::ProductAdd,
            ["inventory", "products", "edit", id] | ["inventory", "edit", id] => {
                Route::ProductEdit(id.to_string())
            }
            ["inventory", "deliveries"] => Route::InventoryDeliveries,
            ["inventory", "deliveries", id] => Route::InventoryDeliveryDetails(id.to_string()),
            ["inventory", "transactions"] => Route::Transactions,
            ["delivery"] => Route::DeliveryHome,
            ["delivery", "dashboard"] => Route::DeliveryDashboard,
            ["delivery", "details", id] => Route::DeliveryDetails(id.to_string()),
            ["delivery", "today"] => Route::TodayDeliveries,
            ["delivery", "pending"] => Route::PendingDeliveries,
            ["delivery", "assignments"] => Route::Assignments,
            ["delivery", "history"] => Route::History,
            ["deliveries"] => Route::MyDeliveries,
            ["deliveries", "completed"] => Route::CompletedDeliveries,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::GoogleCallback => "/oauth/callback/google".to_string(),
            Route::Unauthorized => "/unauthorized".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Reports => "/reports".to_string(),
            Route::Inventory => "/inventory".to_string(),
            Route::Products => "/inventory/products".to_string(),
            Route::ProductAdd => "/inventory/products/add".to_string(),
            Route::ProductEdit(id) => format!("/inventory/products/edit/{}", id),
            Route::InventoryDeliveries => "/inventory/deliveries".to_string(),
            Route::InventoryDeliveryDetails(id) => format!("/inventory/deliveries/{}", id),
            Route::Transactions => "/inventory/transactions".to_string(),
            Route::DeliveryHome => "/delivery".to_string(),
            Route::DeliveryDashboard => "/delivery/dashboard".to_string(),
            Route::DeliveryDetails(id) => format!("/delivery/details/{}", id),
            Route::TodayDeliveries => "/delivery/today".to_string(),
            Route::PendingDeliveries => "/delivery/pending".to_string(),
            Route::Assignments => "/delivery/assignments".to_string(),
            Route::History => "/delivery/history".to_string(),
            Route::MyDeliveries => "/deliveries".to_string(),
            Route::CompletedDeliveries => "/deliveries/completed".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login
            | Route::Register
            | Route::GoogleCallback
            | Route::Unauthorized
            | Route::NotFound(_) => Access::Public,
            Route::Dashboard | Route::Profile | Route::Reports => Access::Authenticated,
            Route::Inventory
            | Route::Products
            | Route::ProductAdd
            | Route::ProductEdit(_)
            | Route::InventoryDeliveries
            | Route::InventoryDeliveryDetails(_)
            | Route::Transactions => Access::Role(Role::InvTeam),
            Route::DeliveryHome
            | Route::DeliveryDashboard
            | Route::DeliveryDetails(_)
            | Route::TodayDeliveries
            | Route::PendingDeliveries
            | Route::Assignments
            | Route::History
            | Route::MyDeliveries
            | Route::CompletedDeliveries => Access::Role(Role::DlTeam),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

/// Unauthenticated users go to login, wrong-role users to unauthorized.
pub fn guard(route: &Route, user: Option<&User>) -> Decision {
    match (route.access(), user) {
        (Access::Public, _) => Decision::Allow,
        (_, None) => Decision::Redirect(Route::Login),
        (Access::Authenticated, Some(_)) => Decision::Allow,
        (Access::Role(role), Some(user)) if user.has_role(role) => Decision::Allow,
        (Access::Role(_), Some(_)) => Decision::Redirect(Route::Unauthorized),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: String,
}

impl MenuItem {
    fn new(label: &'static str, route: Route) -> Self {
        Self {
            label,
            path: route.path(),
        }
    }
}

/// Sidebar entries for `role`, common entries first.
pub fn menu(role: Role) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::new("Dashboard", Route::Dashboard),
        MenuItem::new("Reports", Route::Reports),
    ];
    match role {
        Role::InvTeam => items.extend([
            MenuItem::new("Manage Deliveries", Route::InventoryDeliveries),
            MenuItem::new("Inventory Dashboard", Route::Inventory),
            MenuItem::new("Transactions", Route::Transactions),
        ]),
        Role::DlTeam => items.extend([
            MenuItem::new("My Deliveries", Route::MyDeliveries),
            MenuItem::new("Today's Deliveries", Route::TodayDeliveries),
            MenuItem::new("Pending Deliveries", Route::PendingDeliveries),
            MenuItem::new("Completed Deliveries", Route::CompletedDeliveries),
        ]),
    }
    items
}

/// Tracks the current view and follows session changes.
pub struct Navigator {
    session: Arc<SessionManager>,
    current: Route,
}

impl Navigator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        let current = if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        };
        Self { session, current }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Open `path`, landing on the redirect target when the guard refuses.
    pub fn open(&mut self, path: &str) -> Decision {
        let route = Route::parse(path);
        let user = self.session.current_user();
        let decision = guard(&route, user.as_ref());
        self.current = match &decision {
            Decision::Allow => route,
            Decision::Redirect(target) => {
                tracing::debug!(requested = %route, redirect = %target, "Navigation redirected");
                target.clone()
            }
        };
        decision
    }

    pub fn handle(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Expired | SessionEvent::LoggedOut => self.current = Route::Login,
            SessionEvent::LoggedIn { .. } => self.current = Route::Dashboard,
        }
    }

    /// Apply every event already queued on `events`.
    pub fn drain(&mut self, events: &mut broadcast::Receiver<SessionEvent>) {
        loop {
            match events.try_recv() {
                Ok(event) => self.handle(&event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session events dropped");
                }
                Err(_) => break,
            }
        }
    }
}
