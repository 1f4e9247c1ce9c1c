//! View-models computed from fetched records.

pub mod dashboard;
pub mod deliveries;
pub mod inventory;
pub mod reports;

use serde::Serialize;

pub use dashboard::{DeliveryStats, ProductStats};
pub use deliveries::{AgentDashboard, PriorityCounts};
pub use inventory::{InventorySummary, ProductFilter};
pub use reports::{ReportPeriod, ReportSnapshot};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// One page of a table, zero-indexed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub rows_per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        if self.rows_per_page == 0 {
            return 0;
        }
        (self.total + self.rows_per_page - 1) / self.rows_per_page
    }
}

pub fn paginate<T: Clone>(rows: &[T], page: usize, rows_per_page: usize) -> Page<T> {
    let rows_per_page = rows_per_page.max(1);
    let start = page.saturating_mul(rows_per_page).min(rows.len());
    let end = start.saturating_add(rows_per_page).min(rows.len());
    Page {
        items: rows[start..end].to_vec(),
        page,
        rows_per_page,
        total: rows.len(),
    }
}
