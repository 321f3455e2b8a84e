use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::cli::{PaymentCmd, PaymentListArgs, PaymentModifyArgs, PaymentRecordArgs};
use crate::commands::{check_property_link, check_tenant_link, notify};
use crate::datastore::DataStore;
use crate::datetime::{month_key, parse_date};
use crate::model::{Payment, PaymentPatch, PaymentStatus};
use crate::render::Renderer;

pub(crate) fn dispatch(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: PaymentCmd,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    match cmd {
        PaymentCmd::Record(args) => cmd_record(store, args, now),
        PaymentCmd::List(args) => cmd_list(store, renderer, args),
        PaymentCmd::Info { id } => cmd_info(store, renderer, id),
        PaymentCmd::Modify { id, changes } => cmd_modify(store, id, changes, now),
        PaymentCmd::Delete { id } => cmd_delete(store, id, now),
    }
}

#[instrument(skip(store, args, now))]
fn cmd_record(
    store: &mut DataStore,
    args: PaymentRecordArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command payment record");

    let settings = store.load_settings()?;
    let tenants = store.load_tenants()?;
    let properties = store.load_properties()?;
    let mut payments = store.load_payments()?;

    check_tenant_link(&tenants, args.tenant_id);
    let property_id = match args.property_id {
        Some(id) => id,
        None => tenants
            .iter()
            .find(|t| t.id == args.tenant_id)
            .and_then(|t| t.property_id)
            .ok_or_else(|| {
                anyhow!(
                    "payment requires --property: tenant {} is not linked to a property",
                    args.tenant_id
                )
            })?,
    };
    check_property_link(&properties, property_id);

    let date = match args.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => now.date_naive(),
    };

    let id = store.next_id(&payments);
    let payment = Payment {
        id,
        tenant_id: args.tenant_id,
        property_id,
        amount: args.amount,
        date,
        status: args.status.unwrap_or(PaymentStatus::Completed),
        method: args.method.unwrap_or_else(|| "other".to_string()),
        reference: args.reference,
        added: now,
        modified: now,
    };
    payment.validate()?;

    let amount = payment.amount;
    payments.push(payment);
    store.save_payments(&payments)?;
    notify(
        store,
        &settings,
        "payment",
        format!("Recorded payment of {amount} for tenant {}", args.tenant_id),
        now,
    )?;

    debug!(count = payments.len(), "payment recorded");
    println!("Recorded payment {id}.");
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(
    store: &mut DataStore,
    renderer: &mut Renderer,
    args: PaymentListArgs,
) -> anyhow::Result<()> {
    info!("command payment list");

    let mut payments = store.load_payments()?;
    if let Some(status) = args.status {
        payments.retain(|p| p.status == status);
    }
    if let Some(tenant_id) = args.tenant_id {
        payments.retain(|p| p.tenant_id == tenant_id);
    }
    if let Some(property_id) = args.property_id {
        payments.retain(|p| p.property_id == property_id);
    }
    if let Some(month) = &args.month {
        payments.retain(|p| month_key(p.date) == *month);
    }
    payments.sort_by_key(|p| (p.date, p.id));

    let tenants = store.load_tenants()?;
    let properties = store.load_properties()?;
    renderer.print_payment_table(&payments, &tenants, &properties)?;
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_info(store: &mut DataStore, renderer: &mut Renderer, id: u64) -> anyhow::Result<()> {
    info!("command payment info");

    let payments = store.load_payments()?;
    let payment = payments
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow!("payment {id} not found"))?;

    let tenants = store.load_tenants()?;
    let properties = store.load_properties()?;
    renderer.print_payment_info(payment, &tenants, &properties)?;
    Ok(())
}

#[instrument(skip(store, changes, now))]
fn cmd_modify(
    store: &mut DataStore,
    id: u64,
    changes: PaymentModifyArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command payment modify");

    let date = match changes.date.as_deref() {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let patch = PaymentPatch {
        tenant_id: changes.tenant_id,
        property_id: changes.property_id,
        amount: changes.amount,
        date,
        status: changes.status,
        method: changes.method,
        reference: changes.reference,
    };
    if patch.is_empty() {
        return Err(anyhow!("modify requires at least one field"));
    }

    let settings = store.load_settings()?;
    let mut payments = store.load_payments()?;
    let idx = payments
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| anyhow!("payment {id} not found"))?;

    if let Some(tenant_id) = patch.tenant_id {
        let tenants = store.load_tenants()?;
        check_tenant_link(&tenants, tenant_id);
    }
    if let Some(property_id) = patch.property_id {
        let properties = store.load_properties()?;
        check_property_link(&properties, property_id);
    }

    let mut updated = payments[idx].clone();
    patch.apply(&mut updated);
    updated.modified = now;
    updated.validate()?;

    payments[idx] = updated;
    store.save_payments(&payments)?;
    notify(store, &settings, "payment", format!("Updated payment {id}"), now)?;

    println!("Modified payment {id}.");
    Ok(())
}

#[instrument(skip(store, now))]
fn cmd_delete(store: &mut DataStore, id: u64, now: DateTime<Utc>) -> anyhow::Result<()> {
    info!("command payment delete");

    let settings = store.load_settings()?;
    let mut payments = store.load_payments()?;
    let before = payments.len();
    payments.retain(|p| p.id != id);
    if payments.len() == before {
        return Err(anyhow!("payment {id} not found"));
    }

    store.save_payments(&payments)?;
    notify(store, &settings, "payment", format!("Deleted payment {id}"), now)?;

    println!("Deleted payment {id}.");
    Ok(())
}
