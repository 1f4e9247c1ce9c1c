//! Text and JSON rendering for the CLI.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::models::{Delivery, InventoryTransaction, Product, User};
use crate::navigation::MenuItem;
use crate::session::TokenClaims;
use crate::views::reports::ReportSnapshot;
use crate::views::{AgentDashboard, DeliveryStats, InventorySummary, Page, ProductStats};

/// Plain-text form of a value.
pub trait Render {
    fn render(&self) -> String;
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

impl<T: Render> Render for [T] {
    fn render(&self) -> String {
        if self.is_empty() {
            return "(none)".to_string();
        }
        self.iter().map(Render::render).collect::<Vec<_>>().join("\n")
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn emit<T: Serialize + Render + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", value.render());
        }
        Ok(())
    }

    pub fn message(&self, message: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{}", message);
        }
        Ok(())
    }
}

impl Render for Product {
    fn render(&self) -> String {
        product_row(self, Local::now().date_naive())
    }
}

/// Product row as of `today`; stock past its expiry date is flagged.
fn product_row(product: &Product, today: NaiveDate) -> String {
    let mut line = format!(
        "{:<24} {:<12} {:<28} {:<12} qty {:>4}",
        product.id,
        product.sku,
        product.name,
        product.category.label(),
        product.quantity
    );
    if product.is_low_stock() {
        line.push_str("  LOW");
    }
    if product.damaged {
        line.push_str("  DAMAGED");
    }
    if let Some(expiry) = product.expiry_date {
        let _ = write!(line, "  expires {}", expiry);
    }
    if product.is_expired_on(today) {
        line.push_str("  EXPIRED");
    }
    line
}

impl Render for Delivery {
    fn render(&self) -> String {
        let scheduled = self
            .scheduled_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let priority = self.priority.map(|p| p.as_str()).unwrap_or("-");
        format!(
            "{:<8} {:<20} {:<12} {:<8} {:<10} items {:>3}  {}",
            self.short_id(),
            self.status.label(),
            scheduled,
            priority,
            truncate(&self.customer_name, 10),
            self.total_quantity(),
            self.customer_address
        )
    }
}

impl Render for InventoryTransaction {
    fn render(&self) -> String {
        let when = self
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<16} {:<10} {:<12} {:>5}  {}",
            when,
            self.kind,
            self.sku,
            self.quantity,
            self.notes.as_deref().unwrap_or("")
        )
    }
}

impl Render for User {
    fn render(&self) -> String {
        let mut out = format!(
            "{} ({})\n  name:  {}\n  email: {}\n  role:  {}",
            self.username,
            self.id,
            self.full_name,
            self.email,
            self.role.display_name()
        );
        if let Some(phone) = &self.phone_number {
            let _ = write!(out, "\n  phone: {}", phone);
        }
        out
    }
}

#[derive(Serialize)]
pub struct Whoami {
    pub user: User,
    pub claims: Option<TokenClaims>,
}

impl Render for Whoami {
    fn render(&self) -> String {
        let mut out = self.user.render();
        if let Some(exp) = self.claims.as_ref().and_then(TokenClaims::expires_at) {
            let _ = write!(out, "\n  token expires {}", exp.format("%Y-%m-%d %H:%M UTC"));
        }
        out
    }
}

impl Render for MenuItem {
    fn render(&self) -> String {
        format!("{:<22} {}", self.label, self.path)
    }
}

impl<T: Render> Render for Page<T> {
    fn render(&self) -> String {
        format!(
            "{}\npage {} of {} ({} rows)",
            self.items.render(),
            self.page + 1,
            self.page_count().max(1),
            self.total
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub summary: InventorySummary,
    pub products: Page<Product>,
}

impl Render for InventoryView {
    fn render(&self) -> String {
        format!(
            "Total products: {}   Low stock: {}   Perishable: {}\n\n{}",
            self.summary.total,
            self.summary.low_stock,
            self.summary.perishable,
            self.products.render()
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDashboard {
    pub deliveries: DeliveryStats,
    pub products: ProductStats,
}

impl Render for InventoryDashboard {
    fn render(&self) -> String {
        format!(
            "Deliveries  total {}  completed {}  pending {}  issues {}\nProducts    total {}  low stock {}  damaged {}",
            self.deliveries.total,
            self.deliveries.completed,
            self.deliveries.pending,
            self.deliveries.issues,
            self.products.total,
            self.products.low_stock,
            self.products.damaged
        )
    }
}

impl Render for AgentDashboard {
    fn render(&self) -> String {
        format!(
            "Today: {} deliveries, {} items   urgent {}  high {}  normal {}  low {}\n\n{}",
            self.deliveries.len(),
            self.total_items,
            self.priorities.urgent,
            self.priorities.high,
            self.priorities.normal,
            self.priorities.low,
            self.deliveries.render()
        )
    }
}

impl Render for ReportSnapshot {
    fn render(&self) -> String {
        let mut out = format!(
            "{}\n  completed {}  pending {}  damaged {}  success {:.1}%\n\nDaily",
            self.period,
            self.stats.deliveries_completed,
            self.stats.pending_deliveries,
            self.stats.damaged_goods,
            self.stats.success_rate
        );
        for day in &self.daily {
            let _ = write!(
                out,
                "\n  {:<10} delivered {:>3}  damaged {:>2}  pending {:>3}",
                day.date, day.delivered, day.damaged, day.pending
            );
        }
        out.push_str("\n\nAgents");
        for agent in &self.agents {
            let _ = write!(
                out,
                "\n  {:<14} completed {:>3}  pending {:>3}  success {}%",
                agent.name, agent.completed, agent.pending, agent.success_rate
            );
        }
        out
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let cut: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}~", cut)
}
