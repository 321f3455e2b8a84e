use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::cli::{PropertyAddArgs, PropertyCmd, PropertyListArgs, PropertyModifyArgs};
use crate::commands::notify;
use crate::datastore::DataStore;
use crate::model::{Property, PropertyPatch, PropertyStatus};
use crate::render::Renderer;

pub(crate) fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: PropertyCmd,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    match cmd {
        PropertyCmd::Add(args) => cmd_add(store, args, now),
        PropertyCmd::List(args) => cmd_list(store, renderer, args),
        PropertyCmd::Info { id } => cmd_info(store, renderer, id),
        PropertyCmd::Modify { id, changes } => cmd_modify(store, id, changes, now),
        PropertyCmd::Delete { id } => cmd_delete(store, id, now),
    }
}

#[instrument(skip(store, args, now))]
fn cmd_add(store: &mut DataStore, args: PropertyAddArgs, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command property add");

    let settings = store.load_settings()?;
    let mut properties = store.load_properties()?;

    if let Some(limit) = settings.plan.unit_limit() {
        let in_use: u64 = properties.iter().map(|p| u64::from(p.units)).sum();
        if in_use + u64::from(args.units) > u64::from(limit) {
            return Err(anyhow!(
                "plan {} allows at most {limit} units; portfolio already has {in_use}",
                settings.plan
            ));
        }
    }

    let id = store.next_id(&properties);
    let property = Property {
        id,
        name: args.name,
        address: args.address,
        latitude: args.latitude,
        longitude: args.longitude,
        kind: args.kind,
        units: args.units,
        monthly_income: args.monthly_income,
        occupancy: args.occupancy,
        status: args.status.unwrap_or(PropertyStatus::Active),
        description: args.description,
        added: now,
        modified: now,
    };
    property.validate()?;

    let name = property.name.clone();
    properties.push(property);
    store.save_properties(&properties)?;
    notify(store, &settings, "property", format!("Added property {name}"), now)?;

    debug!(count = properties.len(), "property added");
    println!("Created property {id}.");
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(
    store: &mut DataStore,
    renderer: &mut Renderer,
    args: PropertyListArgs,
) -> anyhow::Result<()> {
    info!("command property list");

    let mut properties = store.load_properties()?;
    if let Some(kind) = args.kind {
        properties.retain(|p| p.kind == kind);
    }
    if let Some(status) = args.status {
        properties.retain(|p| p.status == status);
    }
    properties.sort_by_key(|p| p.id);

    renderer.print_property_table(&properties)?;
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_info(store: &mut DataStore, renderer: &mut Renderer, id: u64) -> anyhow::Result<()> {
    info!("command property info");

    let properties = store.load_properties()?;
    let property = properties
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow!("property {id} not found"))?;

    renderer.print_property_info(property)?;
    Ok(())
}

#[instrument(skip(store, changes, now))]
fn cmd_modify(
    store: &mut DataStore,
    id: u64,
    changes: PropertyModifyArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command property modify");

    let patch = PropertyPatch {
        name: changes.name,
        address: changes.address,
        latitude: changes.latitude,
        longitude: changes.longitude,
        kind: changes.kind,
        units: changes.units,
        monthly_income: changes.monthly_income,
        occupancy: changes.occupancy,
        status: changes.status,
        description: changes.description,
    };
    if patch.is_empty() {
        return Err(anyhow!("modify requires at least one field"));
    }

    let settings = store.load_settings()?;
    let mut properties = store.load_properties()?;
    let idx = properties
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| anyhow!("property {id} not found"))?;

    let mut updated = properties[idx].clone();
    patch.apply(&mut updated);
    updated.modified = now;
    updated.validate()?;

    properties[idx] = updated;
    store.save_properties(&properties)?;
    notify(store, &settings, "property", format!("Updated property {id}"), now)?;

    println!("Modified property {id}.");
    Ok(())
}

#[instrument(skip(store, now))]
fn cmd_delete(store: &mut DataStore, id: u64, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command property delete");

    let settings = store.load_settings()?;
    let mut properties = store.load_properties()?;
    let before = properties.len();
    properties.retain(|p| p.id != id);
    if properties.len() == before {
        return Err(anyhow!("property {id} not found"));
    }

    store.save_properties(&properties)?;
    notify(store, &settings, "property", format!("Deleted property {id}"), now)?;

    println!("Deleted property {id}.");
    Ok(())
}
