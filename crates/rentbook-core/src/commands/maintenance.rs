use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::cli::{MaintenanceAddArgs, MaintenanceCmd, MaintenanceListArgs, MaintenanceModifyArgs};
use crate::commands::{check_property_link, notify};
use crate::datastore::DataStore;
use crate::model::{MaintenancePatch, MaintenanceRequest, RequestStatus};
use crate::render::Renderer;

pub(crate) fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: MaintenanceCmd,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    match cmd {
        MaintenanceCmd::Add(args) => cmd_add(store, args, now),
        MaintenanceCmd::List(args) => cmd_list(store, renderer, args),
        MaintenanceCmd::Info { id } => cmd_info(store, renderer, id),
        MaintenanceCmd::Modify { id, changes } => cmd_modify(store, id, changes, now),
        MaintenanceCmd::Complete {
            id,
            actual_cost,
            note,
        } => cmd_complete(store, id, actual_cost, note, now),
        MaintenanceCmd::Reopen { id } => cmd_reopen(store, id, now),
        MaintenanceCmd::Delete { id } => cmd_delete(store, id, now),
    }
}

#[instrument(skip(store, args, now))]
fn cmd_add(
    store: &mut DataStore,
    args: MaintenanceAddArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command maintenance add");

    let settings = store.load_settings()?;
    let properties = store.load_properties()?;
    let mut requests = store.load_maintenance()?;

    check_property_link(&properties, args.property_id);

    let id = store.next_id(&requests);
    let mut request = MaintenanceRequest::new(
        args.title,
        args.property_id,
        args.category.unwrap_or_else(|| "general".to_string()),
        now,
        id,
    );
    if let Some(priority) = args.priority {
        request.priority = priority;
    }
    if let Some(estimated_cost) = args.estimated_cost {
        request.estimated_cost = estimated_cost;
    }
    request.validate()?;

    let title = request.title.clone();
    requests.push(request);
    store.save_maintenance(&requests)?;
    notify(
        store,
        &settings,
        "maintenance",
        format!("Opened maintenance request: {title}"),
        now,
    )?;

    debug!(count = requests.len(), "maintenance request added");
    println!("Created request {id}.");
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(
    store: &mut DataStore,
    renderer: &mut Renderer,
    args: MaintenanceListArgs,
) -> anyhow::Result<()> {
    info!("command maintenance list");

    let mut requests = store.load_maintenance()?;
    if let Some(status) = args.status {
        requests.retain(|r| r.status == status);
    }
    if let Some(priority) = args.priority {
        requests.retain(|r| r.priority == priority);
    }
    if let Some(property_id) = args.property_id {
        requests.retain(|r| r.property_id == property_id);
    }
    // most urgent first, then oldest
    requests.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

    let properties = store.load_properties()?;
    renderer.print_maintenance_table(&requests, &properties)?;
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_info(store: &mut DataStore, renderer: &mut Renderer, id: u64) -> anyhow::Result<()> {
    info!("command maintenance info");

    let requests = store.load_maintenance()?;
    let request = requests
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow!("maintenance request {id} not found"))?;

    let properties = store.load_properties()?;
    renderer.print_maintenance_info(request, &properties)?;
    Ok(())
}

#[instrument(skip(store, changes, now))]
fn cmd_modify(
    store: &mut DataStore,
    id: u64,
    changes: MaintenanceModifyArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command maintenance modify");

    let patch = MaintenancePatch {
        title: changes.title,
        property_id: changes.property_id,
        category: changes.category,
        priority: changes.priority,
        status: changes.status,
        estimated_cost: changes.estimated_cost,
        actual_cost: changes.actual_cost,
        resolution: changes.resolution,
    };
    if patch.is_empty() {
        return Err(anyhow!("modify requires at least one field"));
    }

    let settings = store.load_settings()?;
    let mut requests = store.load_maintenance()?;
    let idx = requests
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| anyhow!("maintenance request {id} not found"))?;

    if let Some(property_id) = patch.property_id {
        let properties = store.load_properties()?;
        check_property_link(&properties, property_id);
    }

    let mut updated = requests[idx].clone();
    patch.apply(&mut updated);
    if updated.status == RequestStatus::Completed && updated.completed_at.is_none() {
        updated.completed_at = Some(now);
    }
    updated.modified = now;
    updated.validate()?;

    requests[idx] = updated;
    store.save_maintenance(&requests)?;
    notify(
        store,
        &settings,
        "maintenance",
        format!("Updated maintenance request {id}"),
        now,
    )?;

    println!("Modified request {id}.");
    Ok(())
}

#[instrument(skip(store, note, now))]
fn cmd_complete(
    store: &mut DataStore,
    id: u64,
    actual_cost: f64,
    note: Option<String>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command maintenance complete");

    let settings = store.load_settings()?;
    let mut requests = store.load_maintenance()?;
    let idx = requests
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| anyhow!("maintenance request {id} not found"))?;

    let mut updated = requests[idx].clone();
    updated.complete(actual_cost, note, now);
    updated.validate()?;

    let title = updated.title.clone();
    requests[idx] = updated;
    store.save_maintenance(&requests)?;
    notify(
        store,
        &settings,
        "maintenance",
        format!("Completed maintenance request: {title}"),
        now,
    )?;

    println!("Completed request {id}.");
    Ok(())
}

#[instrument(skip(store, now))]
fn cmd_reopen(store: &mut DataStore, id: u64, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command maintenance reopen");

    let settings = store.load_settings()?;
    let mut requests = store.load_maintenance()?;
    let idx = requests
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| anyhow!("maintenance request {id} not found"))?;

    let mut updated = requests[idx].clone();
    updated.reopen(now);

    let title = updated.title.clone();
    requests[idx] = updated;
    store.save_maintenance(&requests)?;
    notify(
        store,
        &settings,
        "maintenance",
        format!("Reopened maintenance request: {title}"),
        now,
    )?;

    println!("Reopened request {id}.");
    Ok(())
}

#[instrument(skip(store, now))]
fn cmd_delete(store: &mut DataStore, id: u64, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command maintenance delete");

    let settings = store.load_settings()?;
    let mut requests = store.load_maintenance()?;
    let before = requests.len();
    requests.retain(|r| r.id != id);
    if requests.len() == before {
        return Err(anyhow!("maintenance request {id} not found"));
    }

    store.save_maintenance(&requests)?;
    notify(
        store,
        &settings,
        "maintenance",
        format!("Deleted maintenance request {id}"),
        now,
    )?;

    println!("Deleted request {id}.");
    Ok(())
}
