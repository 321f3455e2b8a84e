use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::cli::Command;
use crate::datastore::DataStore;
use crate::model::{Property, Settings, Tenant};
use crate::render::Renderer;

mod io;
mod maintenance;
mod payment;
mod property;
mod settings;
mod tenant;
mod views;

#[instrument(skip(store, renderer, command))]
pub fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    let now = Utc::now();
    debug!(?command, "dispatching command");

    match command {
        Command::Property { cmd } => property::dispatch(store, renderer, cmd, now),
        Command::Tenant { cmd } => tenant::dispatch(store, renderer, cmd, now),
        Command::Payment { cmd } => payment::dispatch(store, renderer, cmd, now),
        Command::Maintenance { cmd } => maintenance::dispatch(store, renderer, cmd, now),
        Command::Settings { cmd } => settings::dispatch(store, renderer, cmd, now),
        Command::Notifications { cmd } => views::notifications(store, renderer, cmd),
        Command::Overview => views::overview(store, renderer, now),
        Command::Export { entity } => io::export(store, entity),
        Command::Import { entity, file } => io::import(store, entity, file.as_deref(), now),
    }
}

// Notification preferences gate only their own category; everything else is
// always recorded.
pub(crate) fn notify(
    store: &DataStore,
    settings: &Settings,
    category: &str,
    message: String,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let enabled = match category {
        "payment" => settings.notifications.payment_reminders,
        "maintenance" => settings.notifications.maintenance_alerts,
        _ => true,
    };
    if !enabled {
        debug!(category, "notification suppressed by settings");
        return Ok(());
    }
    store.append_notification(category, message, now)
}

// Foreign keys are soft: a dangling reference is logged, never rejected.
pub(crate) fn check_property_link(properties: &[Property], id: u64) {
    if !properties.iter().any(|p| p.id == id) {
        warn!(property_id = id, "referenced property does not exist");
    }
}

pub(crate) fn check_tenant_link(tenants: &[Tenant], id: u64) {
    if !tenants.iter().any(|t| t.id == id) {
        warn!(tenant_id = id, "referenced tenant does not exist");
    }
}
