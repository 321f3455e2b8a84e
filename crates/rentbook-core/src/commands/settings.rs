use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::cli::{SettingsCmd, SettingsSetArgs};
use crate::commands::notify;
use crate::datastore::DataStore;
use crate::render::Renderer;

pub(crate) fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: SettingsCmd,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    match cmd {
        SettingsCmd::Show => cmd_show(store, renderer),
        SettingsCmd::Set(args) => cmd_set(store, args, now),
        SettingsCmd::Plans => cmd_plans(store, renderer),
    }
}

#[instrument(skip(store, renderer))]
fn cmd_show(store: &mut DataStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command settings show");

    let settings = store.load_settings()?;
    renderer.print_settings(&settings)?;
    Ok(())
}

#[instrument(skip(store, args, now))]
fn cmd_set(store: &mut DataStore, args: SettingsSetArgs, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command settings set");

    let no_changes = args.name.is_none()
        && args.email.is_none()
        && args.currency.is_none()
        && args.date_format.is_none()
        && args.plan.is_none()
        && args.payment_reminders.is_none()
        && args.maintenance_alerts.is_none();
    if no_changes {
        return Err(anyhow!("set requires at least one field"));
    }

    let mut settings = store.load_settings()?;
    if let Some(name) = args.name {
        settings.profile.name = name;
    }
    if let Some(email) = args.email {
        settings.profile.email = email;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(date_format) = args.date_format {
        settings.date_format = date_format;
    }
    if let Some(plan) = args.plan {
        settings.plan = plan;
    }
    if let Some(payment_reminders) = args.payment_reminders {
        settings.notifications.payment_reminders = payment_reminders;
    }
    if let Some(maintenance_alerts) = args.maintenance_alerts {
        settings.notifications.maintenance_alerts = maintenance_alerts;
    }
    settings.validate()?;

    store.save_settings(&settings)?;
    notify(store, &settings, "settings", "Updated settings".to_string(), now)?;

    println!("Updated settings.");
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_plans(store: &mut DataStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command settings plans");

    let settings = store.load_settings()?;
    renderer.print_plans(settings.plan)?;
    Ok(())
}
