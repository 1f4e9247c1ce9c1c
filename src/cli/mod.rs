//! Terminal front end.

pub mod output;
pub mod run;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::models::{DeliveryItem, DeliveryPriority, DeliveryStatus, ProductCategory, TransactionType};
use crate::views::{ReportPeriod, ROWS_PER_PAGE_OPTIONS};

pub use run::run;

#[derive(Parser, Debug)]
#[command(name = "dlvery")]
#[command(about = "DlVery delivery and inventory client", version)]
pub struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Finish a Google sign-in with the code from the OAuth redirect.
    LoginGoogle {
        #[arg(long)]
        code: String,
    },
    Register(RegisterArgs),
    Logout,
    /// Show the signed-in user and token expiry.
    Whoami,
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    Products {
        #[command(subcommand)]
        command: ProductCommand,
    },
    Deliveries {
        #[command(subcommand)]
        command: DeliveryCommand,
    },
    Transactions {
        #[command(subcommand)]
        command: TransactionCommand,
    },
    /// Record a successful delivery with the customer's signature.
    Complete {
        id: String,
        #[arg(long)]
        customer_name: String,
        /// PNG file holding the captured signature.
        #[arg(long)]
        signature: PathBuf,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Report that the delivery point could not be accessed.
    DoorLock {
        id: String,
        #[arg(long)]
        notes: String,
        #[arg(long)]
        attempted_at: Option<DateTime<Utc>>,
    },
    /// Report damaged or returned items. Items are `SKU` or `SKU:QTY`.
    Damage {
        id: String,
        #[arg(long = "damaged")]
        damaged: Vec<String>,
        #[arg(long = "returned")]
        returned: Vec<String>,
        #[arg(long)]
        notes: String,
    },
    Dashboard,
    Inventory(ProductListArgs),
    Reports {
        #[arg(long, default_value = "week")]
        period: ReportPeriod,
    },
    /// List the navigation entries for the signed-in role.
    Menu,
    /// Resolve a route the way the navigation guard would.
    Open { path: String },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Args, Debug)]
pub struct ProductListArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long)]
    pub category: Option<ProductCategory>,
    #[arg(long, default_value_t = 0)]
    pub page: usize,
    #[arg(long, default_value_t = crate::views::DEFAULT_ROWS_PER_PAGE, value_parser = parse_rows)]
    pub rows: usize,
}

#[derive(Args, Debug)]
pub struct ProductFields {
    #[arg(long)]
    pub sku: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub quantity: String,
    #[arg(long, default_value_t = false)]
    pub damaged: bool,
    #[arg(long, default_value_t = false)]
    pub perishable: bool,
    #[arg(long)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List(ProductListArgs),
    Get { id: String },
    Sku { sku: String },
    Category { category: ProductCategory },
    Damaged,
    Perishable,
    ExpiringBefore { date: NaiveDate },
    ExpiringBetween { start: NaiveDate, end: NaiveDate },
    Create(ProductFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete { id: String },
    /// Apply a signed stock change.
    Adjust {
        id: String,
        #[arg(allow_negative_numbers = true)]
        change: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeliveryCommand {
    List,
    Get { id: String },
    Agent { agent_id: String },
    Status { status: DeliveryStatus },
    Date { date: NaiveDate },
    Range { start: NaiveDate, end: NaiveDate },
    Sku { sku: String },
    Damaged,
    Create {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, default_value = "NORMAL")]
        priority: DeliveryPriority,
        #[arg(long)]
        date: NaiveDate,
        /// Line item as `SKU:QTY`; repeat for more.
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<DeliveryItem>,
        #[arg(long)]
        notes: Option<String>,
    },
    My,
    Today,
    Pending,
    Completed,
    Start { id: String },
    /// Complete through the delivery team's `/complete` endpoint.
    Complete {
        id: String,
        #[arg(long)]
        customer_name: String,
        /// PNG file holding the captured signature.
        #[arg(long)]
        signature: PathBuf,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Mark the whole delivery DAMAGED without item details.
    ReportDamage {
        id: String,
        #[arg(long)]
        notes: String,
    },
    /// Set any status label; the server decides whether it is allowed.
    SetStatus {
        id: String,
        status: DeliveryStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    Return {
        id: String,
        #[arg(long)]
        notes: String,
    },
    Items {
        id: String,
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<DeliveryItem>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    List,
    Get { id: String },
    Product { product_id: String },
    Sku { sku: String },
    Type { kind: TransactionType },
    User { user_id: String },
    Delivery { delivery_id: String },
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
        #[arg(long)]
        product: Option<String>,
    },
    Create {
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "")]
        sku: String,
        #[arg(long = "type")]
        kind: TransactionType,
        #[arg(long, allow_hyphen_values = true)]
        quantity: i64,
        #[arg(long)]
        delivery: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Parse `SKU:QTY` (quantity defaults to 1).
pub fn parse_item(value: &str) -> Result<DeliveryItem, String> {
    let (sku, quantity) = split_sku_quantity(value)?;
    Ok(DeliveryItem {
        sku,
        quantity: quantity.unwrap_or(1),
        ..Default::default()
    })
}

/// Page size; only the sizes offered by the table are accepted.
pub fn parse_rows(value: &str) -> Result<usize, String> {
    let rows: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid page size '{}'", value))?;
    if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
        Ok(rows)
    } else {
        Err(format!("page size must be one of {:?}", ROWS_PER_PAGE_OPTIONS))
    }
}

pub fn split_sku_quantity(value: &str) -> Result<(String, Option<i64>), String> {
    let (sku, quantity) = match value.split_once(':') {
        Some((sku, qty)) => {
            let qty = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity in '{}'", value))?;
            (sku, Some(qty))
        }
        None => (value, None),
    };
    let sku = sku.trim();
    if sku.is_empty() {
        return Err(format!("missing sku in '{}'", value));
    }
    Ok((sku.to_string(), quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let item = parse_item("FOOD-001:4").unwrap();
        assert_eq!(item.sku, "FOOD-001");
        assert_eq!(item.quantity, 4);
        assert_eq!(parse_item("ELEC-2").unwrap().quantity, 1);
        assert!(parse_item(":3").is_err());
        assert!(parse_item("A:x").is_err());
    }

    #[test]
    fn test_rows_limited_to_table_sizes() {
        assert_eq!(parse_rows("25"), Ok(25));
        assert!(parse_rows("7").is_err());
        assert!(parse_rows("ten").is_err());

        let cli = Cli::try_parse_from(["dlvery", "inventory", "--rows", "5"]).unwrap();
        match cli.command {
            Command::Inventory(args) => assert_eq!(args.rows, 5),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["dlvery", "inventory", "--rows", "11"]).is_err());
    }

    #[test]
    fn test_cli_parses_dlteam_endpoints() {
        let cli = Cli::try_parse_from([
            "dlvery", "deliveries", "complete", "d-42", "--customer-name", "Rajesh Patel",
            "--signature", "sig.png",
        ])
        .unwrap();
        match cli.command {
            Command::Deliveries {
                command: DeliveryCommand::Complete { id, signature, notes, .. },
            } => {
                assert_eq!(id, "d-42");
                assert_eq!(signature, PathBuf::from("sig.png"));
                assert!(notes.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["dlvery", "deliveries", "report-damage", "d-42", "--notes", "crushed"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Deliveries {
                command: DeliveryCommand::ReportDamage { .. }
            }
        ));
        assert!(Cli::try_parse_from(["dlvery", "deliveries", "report-damage", "d-42"]).is_err());
    }

    #[test]
    fn test_cli_parses_status_and_adjust() {
        let cli = Cli::try_parse_from([
            "dlvery", "deliveries", "set-status", "d-1", "door-lock", "--notes", "closed",
        ])
        .unwrap();
        match cli.command {
            Command::Deliveries {
                command: DeliveryCommand::SetStatus { status, .. },
            } => assert_eq!(status, DeliveryStatus::DoorLock),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["dlvery", "--json", "products", "adjust", "p-1", "-3"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Products {
                command: ProductCommand::Adjust { change, .. },
            } => assert_eq!(change, -3),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
