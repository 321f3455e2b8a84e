use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::cli::{TenantAddArgs, TenantCmd, TenantListArgs, TenantModifyArgs};
use crate::commands::{check_property_link, notify};
use crate::datastore::DataStore;
use crate::datetime::parse_date;
use crate::model::{PaymentStanding, Tenant, TenantPatch, TenantStatus};
use crate::render::Renderer;

pub(crate) fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: TenantCmd,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    match cmd {
        TenantCmd::Add(args) => cmd_add(store, args, now),
        TenantCmd::List(args) => cmd_list(store, renderer, args),
        TenantCmd::Info { id } => cmd_info(store, renderer, id),
        TenantCmd::Modify { id, changes } => cmd_modify(store, id, changes, now),
        TenantCmd::Delete { id } => cmd_delete(store, id, now),
    }
}

fn parse_optional_date(raw: Option<&str>, what: &str) -> anyhow::Result<Option<NaiveDate>> {
    match raw {
        Some(text) => {
            let parsed =
                parse_date(text).map_err(|err| anyhow!("invalid {what}: {err:#}"))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[instrument(skip(store, args, now))]
fn cmd_add(store: &mut DataStore, args: TenantAddArgs, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command tenant add");

    let settings = store.load_settings()?;
    let mut tenants = store.load_tenants()?;

    if let Some(property_id) = args.property_id {
        let properties = store.load_properties()?;
        check_property_link(&properties, property_id);
    }

    let id = store.next_id(&tenants);
    let tenant = Tenant {
        id,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        property_id: args.property_id,
        monthly_rent: args.monthly_rent,
        lease_start: parse_optional_date(args.lease_start.as_deref(), "lease start")?,
        lease_end: parse_optional_date(args.lease_end.as_deref(), "lease end")?,
        status: args.status.unwrap_or(TenantStatus::Pending),
        payment_status: args.payment_status.unwrap_or(PaymentStanding::Pending),
        added: now,
        modified: now,
    };
    tenant.validate()?;

    let name = tenant.full_name();
    tenants.push(tenant);
    store.save_tenants(&tenants)?;
    notify(store, &settings, "tenant", format!("Added tenant {name}"), now)?;

    debug!(count = tenants.len(), "tenant added");
    println!("Created tenant {id}.");
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(
    store: &mut DataStore,
    renderer: &mut Renderer,
    args: TenantListArgs,
) -> anyhow::Result<()> {
    info!("command tenant list");

    let mut tenants = store.load_tenants()?;
    if let Some(status) = args.status {
        tenants.retain(|t| t.status == status);
    }
    if let Some(payment_status) = args.payment_status {
        tenants.retain(|t| t.payment_status == payment_status);
    }
    if let Some(property_id) = args.property_id {
        tenants.retain(|t| t.property_id == Some(property_id));
    }
    tenants.sort_by_key(|t| t.id);

    let properties = store.load_properties()?;
    renderer.print_tenant_table(&tenants, &properties)?;
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_info(store: &mut DataStore, renderer: &mut Renderer, id: u64) -> anyhow::Result<()> {
    info!("command tenant info");

    let tenants = store.load_tenants()?;
    let tenant = tenants
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("tenant {id} not found"))?;

    let properties = store.load_properties()?;
    renderer.print_tenant_info(tenant, &properties)?;
    Ok(())
}

#[instrument(skip(store, changes, now))]
fn cmd_modify(
    store: &mut DataStore,
    id: u64,
    changes: TenantModifyArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command tenant modify");

    let patch = TenantPatch {
        first_name: changes.first_name,
        last_name: changes.last_name,
        email: changes.email,
        property_id: changes.property_id,
        monthly_rent: changes.monthly_rent,
        lease_start: parse_optional_date(changes.lease_start.as_deref(), "lease start")?,
        lease_end: parse_optional_date(changes.lease_end.as_deref(), "lease end")?,
        status: changes.status,
        payment_status: changes.payment_status,
    };
    if patch.is_empty() {
        return Err(anyhow!("modify requires at least one field"));
    }

    let settings = store.load_settings()?;
    let mut tenants = store.load_tenants()?;
    let idx = tenants
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| anyhow!("tenant {id} not found"))?;

    if let Some(property_id) = patch.property_id {
        let properties = store.load_properties()?;
        check_property_link(&properties, property_id);
    }

    let mut updated = tenants[idx].clone();
    patch.apply(&mut updated);
    updated.modified = now;
    updated.validate()?;

    tenants[idx] = updated;
    store.save_tenants(&tenants)?;
    notify(store, &settings, "tenant", format!("Updated tenant {id}"), now)?;

    println!("Modified tenant {id}.");
    Ok(())
}

#[instrument(skip(store, now))]
fn cmd_delete(store: &mut DataStore, id: u64, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command tenant delete");

    let settings = store.load_settings()?;
    let mut tenants = store.load_tenants()?;
    let before = tenants.len();
    tenants.retain(|t| t.id != id);
    if tenants.len() == before {
        return Err(anyhow!("tenant {id} not found"));
    }

    store.save_tenants(&tenants)?;
    notify(store, &settings, "tenant", format!("Deleted tenant {id}"), now)?;

    println!("Deleted tenant {id}.");
    Ok(())
}
