use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{Local, Utc};

use super::output::{InventoryDashboard, InventoryView, Output, Whoami};
use super::{
    split_sku_quantity, Cli, Command, DeliveryCommand, ProductCommand, ProductFields,
    ProductListArgs, ProfileCommand, TransactionCommand,
};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::forms::{
    CompleteDeliveryForm, DamageReportForm, DoorLockForm, LoginForm, ProductForm, ProfileForm,
    RegisterForm, Validate,
};
use crate::logging::init_logging;
use crate::models::{DeliveryStatus, InventoryTransaction, NewDelivery, Role, StatusUpdate};
use crate::navigation::{menu, Decision, Navigator, Route};
use crate::services::Services;
use crate::session::{FileSessionStore, SessionManager};
use crate::signature::Signature;
use crate::views::{self, reports, AgentDashboard, DeliveryStats, InventorySummary, ProductFilter, ProductStats};
use crate::workflow::DeliveryWorkflow;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose, cli.log_json);

    let mut cfg = ClientConfig::load().context("failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        cfg.api_url = url;
    }
    if let Some(path) = cli.session_file.clone() {
        cfg.session_file = Some(path);
    }
    cfg.validate()?;

    let store = FileSessionStore::new(cfg.session_path());
    let session = Arc::new(SessionManager::new(Arc::new(store)).context("failed to restore session")?);
    let services = Services::new(&cfg, session.clone())?;
    let mut events = session.subscribe();
    let mut navigator = Navigator::new(session.clone());
    let out = Output::new(cli.json);

    let result = dispatch(cli.command, &services, &mut navigator, &out).await;

    navigator.drain(&mut events);
    if let Err(err) = &result {
        if let Some(ClientError::Unauthorized { .. }) = err.downcast_ref::<ClientError>() {
            tracing::info!(route = %navigator.current(), "Redirected after session expiry");
            eprintln!("Signed out. Run `dlvery login` to continue.");
        }
        if let Some(ClientError::Network { details: Some(details), .. }) = err.downcast_ref::<ClientError>() {
            eprintln!("{}", details);
        }
    }
    result
}

async fn dispatch(
    command: Command,
    services: &Services,
    navigator: &mut Navigator,
    out: &Output,
) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = services.auth.login(&LoginForm::new(username, password)).await?;
            out.emit(&user)
        }
        Command::LoginGoogle { code } => {
            let user = services.auth.login_with_google(&code).await?;
            out.emit(&user)
        }
        Command::Register(args) => {
            let form = RegisterForm {
                username: args.username,
                password: args.password,
                email: args.email,
                full_name: args.full_name,
                role: args.role,
                phone_number: args.phone,
            };
            let message = services.auth.register(&form).await?;
            out.message(message.as_deref().unwrap_or("Registration successful. Please log in."))
        }
        Command::Logout => {
            services.auth.logout()?;
            out.message("Logged out")
        }
        Command::Whoami => {
            let user = services.session.current_user().ok_or(ClientError::NotAuthenticated)?;
            let claims = services.session.token_claims();
            if claims.as_ref().map_or(false, |c| c.is_expired_at(Utc::now())) {
                tracing::warn!("Stored token looks expired; the next request will be rejected");
            }
            out.emit(&Whoami { user, claims })
        }
        Command::Profile { command } => profile(command, services, out).await,
        Command::Products { command } => products(command, services, out).await,
        Command::Deliveries { command } => deliveries(command, services, out).await,
        Command::Transactions { command } => transactions(command, services, out).await,
        Command::Complete {
            id,
            customer_name,
            signature,
            notes,
        } => {
            let signature = Signature::from_file(&signature)
                .with_context(|| format!("failed to read signature from {}", signature.display()))?;
            let delivery = services.deliveries.get(&id).await?;
            let form = CompleteDeliveryForm::new(customer_name, signature).with_notes(notes);
            let updated = DeliveryWorkflow::new(&services.deliveries)
                .complete(&delivery, &form)
                .await?;
            out.emit(&updated)
        }
        Command::DoorLock {
            id,
            notes,
            attempted_at,
        } => {
            let delivery = services.deliveries.get(&id).await?;
            let mut form = DoorLockForm::new(notes);
            if let Some(at) = attempted_at {
                form = form.attempted_at(at);
            }
            let updated = DeliveryWorkflow::new(&services.deliveries)
                .door_lock(&delivery, &form)
                .await?;
            out.emit(&updated)
        }
        Command::Damage {
            id,
            damaged,
            returned,
            notes,
        } => {
            let delivery = services.deliveries.get(&id).await?;
            let mut form = DamageReportForm::for_delivery(&delivery).with_notes(notes);
            for entry in &damaged {
                let (sku, qty) = split_sku_quantity(entry).map_err(anyhow::Error::msg)?;
                if !form.mark_damaged(&sku, true) {
                    bail!("delivery {} has no item {}", delivery.short_id(), sku);
                }
                if let Some(qty) = qty {
                    form.set_damaged_quantity(&sku, qty);
                }
            }
            for entry in &returned {
                let (sku, qty) = split_sku_quantity(entry).map_err(anyhow::Error::msg)?;
                if !form.mark_returned(&sku, true) {
                    bail!("delivery {} has no item {}", delivery.short_id(), sku);
                }
                if let Some(qty) = qty {
                    form.set_returned_quantity(&sku, qty);
                }
            }
            let updated = DeliveryWorkflow::new(&services.deliveries)
                .damage_report(&delivery, &form)
                .await?;
            out.emit(&updated)
        }
        Command::Dashboard => dashboard(services, out).await,
        Command::Inventory(args) => {
            let products = services.products.list().await?;
            out.emit(&inventory_view(&products, &args))
        }
        Command::Reports { period } => out.emit(&reports::snapshot(period)),
        Command::Menu => {
            let user = services.session.current_user().ok_or(ClientError::NotAuthenticated)?;
            out.emit(&menu(user.role))
        }
        Command::Open { path } => {
            let decision = navigator.open(&path);
            let message = match decision {
                Decision::Allow => format!("Opened {}", navigator.current()),
                Decision::Redirect(target) => {
                    format!("{} is not available, redirected to {}", Route::parse(&path), target)
                }
            };
            out.message(&message)
        }
    }
}

async fn profile(command: ProfileCommand, services: &Services, out: &Output) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Show => out.emit(&services.profile.get().await?),
        ProfileCommand::Update {
            full_name,
            email,
            phone,
        } => {
            let form = ProfileForm {
                full_name,
                email,
                phone_number: phone,
            };
            out.emit(&services.profile.update(&form).await?)
        }
    }
}

fn product_form(fields: ProductFields) -> ProductForm {
    ProductForm {
        sku: fields.sku,
        name: fields.name,
        description: fields.description,
        category: fields.category,
        quantity: fields.quantity,
        damaged: fields.damaged,
        perishable: fields.perishable,
        expiry_date: fields.expiry_date,
    }
}

fn inventory_view(products: &[crate::models::Product], args: &ProductListArgs) -> InventoryView {
    let filter = ProductFilter::new(args.search.clone(), args.category);
    InventoryView {
        summary: InventorySummary::from_products(products),
        products: filter.page(products, args.page, args.rows),
    }
}

async fn products(command: ProductCommand, services: &Services, out: &Output) -> anyhow::Result<()> {
    let api = &services.products;
    match command {
        ProductCommand::List(args) => {
            let products = api.list().await?;
            let filter = ProductFilter::new(args.search.clone(), args.category);
            out.emit(&filter.page(&products, args.page, args.rows))
        }
        ProductCommand::Get { id } => out.emit(&api.get(&id).await?),
        ProductCommand::Sku { sku } => out.emit(&api.get_by_sku(&sku).await?),
        ProductCommand::Category { category } => out.emit(&api.by_category(category).await?),
        ProductCommand::Damaged => out.emit(&api.damaged().await?),
        ProductCommand::Perishable => out.emit(&api.perishable().await?),
        ProductCommand::ExpiringBefore { date } => out.emit(&api.expiring_before(date).await?),
        ProductCommand::ExpiringBetween { start, end } => {
            out.emit(&api.expiring_between(start, end).await?)
        }
        ProductCommand::Create(fields) => out.emit(&api.create(&product_form(fields)).await?),
        ProductCommand::Update { id, fields } => {
            out.emit(&api.update(&id, &product_form(fields)).await?)
        }
        ProductCommand::Delete { id } => {
            let message = api.delete(&id).await?;
            out.message(message.as_deref().unwrap_or("Product deleted"))
        }
        ProductCommand::Adjust { id, change } => out.emit(&api.adjust_quantity(&id, change).await?),
    }
}

async fn deliveries(command: DeliveryCommand, services: &Services, out: &Output) -> anyhow::Result<()> {
    let api = &services.deliveries;
    match command {
        DeliveryCommand::List => out.emit(&api.all().await?),
        DeliveryCommand::Get { id } => out.emit(&api.get(&id).await?),
        DeliveryCommand::Agent { agent_id } => out.emit(&api.by_agent(&agent_id).await?),
        DeliveryCommand::Status { status } => out.emit(&api.by_status(status).await?),
        DeliveryCommand::Date { date } => out.emit(&api.by_date(date).await?),
        DeliveryCommand::Range { start, end } => out.emit(&api.by_date_range(start, end).await?),
        DeliveryCommand::Sku { sku } => out.emit(&api.by_sku(&sku).await?),
        DeliveryCommand::Damaged => out.emit(&api.damaged().await?),
        DeliveryCommand::Create {
            agent,
            customer_name,
            address,
            phone,
            priority,
            date,
            items,
            notes,
        } => {
            let delivery = NewDelivery {
                delivery_agent_id: agent,
                items,
                customer_name,
                customer_address: address,
                customer_phone: phone,
                priority,
                scheduled_date: date,
                notes,
            };
            out.emit(&api.create(&delivery).await?)
        }
        DeliveryCommand::My => out.emit(&api.my().await?),
        DeliveryCommand::Today => out.emit(&api.my_today().await?),
        DeliveryCommand::Pending => out.emit(&api.my_pending().await?),
        DeliveryCommand::Completed => {
            let mine = api.my().await?;
            out.emit(&views::deliveries::completed(&mine))
        }
        DeliveryCommand::Start { id } => out.emit(&api.start(&id).await?),
        DeliveryCommand::Complete {
            id,
            customer_name,
            signature,
            notes,
        } => {
            let signature = Signature::from_file(&signature)
                .with_context(|| format!("failed to read signature from {}", signature.display()))?;
            let form = CompleteDeliveryForm::new(customer_name, signature).with_notes(notes);
            form.validate()?;
            out.emit(&api.complete(&id, &form.completion_request()).await?)
        }
        DeliveryCommand::ReportDamage { id, notes } => {
            let update = StatusUpdate::new(DeliveryStatus::Damaged).with_notes(notes);
            out.emit(&api.report_damage(&id, update).await?)
        }
        DeliveryCommand::SetStatus { id, status, notes } => {
            let mut update = StatusUpdate::new(status);
            update.notes = notes;
            out.emit(&api.update_status(&id, &update).await?)
        }
        DeliveryCommand::Return { id, notes } => {
            let update = StatusUpdate::new(DeliveryStatus::Returned).with_notes(notes);
            out.emit(&api.return_delivery(&id, update).await?)
        }
        DeliveryCommand::Items { id, items } => out.emit(&api.update_items(&id, &items).await?),
    }
}

async fn transactions(
    command: TransactionCommand,
    services: &Services,
    out: &Output,
) -> anyhow::Result<()> {
    let api = &services.transactions;
    match command {
        TransactionCommand::List => out.emit(&api.list().await?),
        TransactionCommand::Get { id } => out.emit(&api.get(&id).await?),
        TransactionCommand::Product { product_id } => out.emit(&api.by_product(&product_id).await?),
        TransactionCommand::Sku { sku } => out.emit(&api.by_sku(&sku).await?),
        TransactionCommand::Type { kind } => out.emit(&api.by_type(kind).await?),
        TransactionCommand::User { user_id } => out.emit(&api.by_user(&user_id).await?),
        TransactionCommand::Delivery { delivery_id } => {
            out.emit(&api.by_delivery(&delivery_id).await?)
        }
        TransactionCommand::Range {
            start,
            end,
            product,
        } => match product {
            Some(product_id) => {
                out.emit(&api.by_product_and_date_range(&product_id, start, end).await?)
            }
            None => out.emit(&api.by_date_range(start, end).await?),
        },
        TransactionCommand::Create {
            product,
            sku,
            kind,
            quantity,
            delivery,
            notes,
        } => {
            let tx = InventoryTransaction {
                id: None,
                product_id: product,
                sku,
                kind,
                quantity,
                user_id: services.session.current_user().map(|u| u.id),
                delivery_id: delivery,
                notes,
                timestamp: Some(Local::now().naive_local()),
            };
            out.emit(&api.create(&tx).await?)
        }
    }
}

async fn dashboard(services: &Services, out: &Output) -> anyhow::Result<()> {
    let user = services.session.current_user().ok_or(ClientError::NotAuthenticated)?;
    match user.role {
        Role::InvTeam => {
            let (deliveries, products) =
                tokio::try_join!(services.deliveries.all(), services.products.list())?;
            out.emit(&InventoryDashboard {
                deliveries: DeliveryStats::from_deliveries(&deliveries),
                products: ProductStats::from_products(&products),
            })
        }
        Role::DlTeam => {
            let today = services.deliveries.my_today().await?;
            out.emit(&AgentDashboard::from_today(today))
        }
    }
}
