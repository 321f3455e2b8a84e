use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::{info, instrument};

use crate::cli::EntityKind;
use crate::csv::{self, HeaderMap};
use crate::datastore::DataStore;
use crate::datetime::parse_date;
use crate::model::{
    MaintenanceRequest, Payment, PaymentStanding, PaymentStatus, Property, PropertyStatus,
    RequestStatus, Tenant, TenantStatus,
};

#[instrument(skip(store))]
pub(crate) fn export(store: &mut DataStore, entity: EntityKind) -> anyhow::Result<()> {
    info!("command export");

    let out = match entity {
        EntityKind::Properties => export_properties(&store.load_properties()?),
        EntityKind::Tenants => export_tenants(&store.load_tenants()?),
        EntityKind::Payments => export_payments(&store.load_payments()?),
        EntityKind::Maintenance => export_maintenance(&store.load_maintenance()?),
    };

    print!("{out}");
    Ok(())
}

#[instrument(skip(store, file, now))]
pub(crate) fn import(
    store: &mut DataStore,
    entity: EntityKind,
    file: Option<&Path>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command import");

    let input = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed reading stdin")?;
            buffer
        }
    };

    if input.trim().is_empty() {
        return Err(anyhow!("import: empty input"));
    }

    let records = csv::parse(&input)?;
    let Some((header_row, data_rows)) = records.split_first() else {
        return Err(anyhow!("import: empty input"));
    };
    let headers = HeaderMap::new(header_row);

    let count = match entity {
        EntityKind::Properties => import_properties(store, &headers, data_rows, now)?,
        EntityKind::Tenants => import_tenants(store, &headers, data_rows, now)?,
        EntityKind::Payments => import_payments(store, &headers, data_rows, now)?,
        EntityKind::Maintenance => import_maintenance(store, &headers, data_rows, now)?,
    };

    println!("Imported {count} record(s).");
    Ok(())
}

fn export_properties(rows: &[Property]) -> String {
    let headers = [
        "id",
        "name",
        "address",
        "latitude",
        "longitude",
        "type",
        "units",
        "monthly_income",
        "occupancy",
        "status",
        "description",
        "added",
    ];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.address.clone(),
                p.latitude.map(|v| v.to_string()).unwrap_or_default(),
                p.longitude.map(|v| v.to_string()).unwrap_or_default(),
                p.kind.to_string(),
                p.units.to_string(),
                p.monthly_income.to_string(),
                p.occupancy.to_string(),
                p.status.to_string(),
                p.description.clone(),
                p.added.to_rfc3339(),
            ]
        })
        .collect();
    csv::write_rows(&headers, &data)
}

fn export_tenants(rows: &[Tenant]) -> String {
    let headers = [
        "id",
        "first_name",
        "last_name",
        "email",
        "property_id",
        "monthly_rent",
        "lease_start",
        "lease_end",
        "status",
        "payment_status",
        "added",
    ];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.first_name.clone(),
                t.last_name.clone(),
                t.email.clone(),
                t.property_id.map(|v| v.to_string()).unwrap_or_default(),
                t.monthly_rent.to_string(),
                t.lease_start.map(|d| d.to_string()).unwrap_or_default(),
                t.lease_end.map(|d| d.to_string()).unwrap_or_default(),
                t.status.to_string(),
                t.payment_status.to_string(),
                t.added.to_rfc3339(),
            ]
        })
        .collect();
    csv::write_rows(&headers, &data)
}

fn export_payments(rows: &[Payment]) -> String {
    let headers = [
        "id",
        "tenant_id",
        "property_id",
        "amount",
        "date",
        "status",
        "method",
        "reference",
        "added",
    ];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.tenant_id.to_string(),
                p.property_id.to_string(),
                p.amount.to_string(),
                p.date.to_string(),
                p.status.to_string(),
                p.method.clone(),
                p.reference.clone().unwrap_or_default(),
                p.added.to_rfc3339(),
            ]
        })
        .collect();
    csv::write_rows(&headers, &data)
}

fn export_maintenance(rows: &[MaintenanceRequest]) -> String {
    let headers = [
        "id",
        "title",
        "property_id",
        "category",
        "priority",
        "status",
        "estimated_cost",
        "actual_cost",
        "resolution",
        "completed_at",
        "added",
    ];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.title.clone(),
                r.property_id.to_string(),
                r.category.clone(),
                r.priority.to_string(),
                r.status.to_string(),
                r.estimated_cost.to_string(),
                r.actual_cost.map(|v| v.to_string()).unwrap_or_default(),
                r.resolution.clone().unwrap_or_default(),
                r.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                r.added.to_rfc3339(),
            ]
        })
        .collect();
    csv::write_rows(&headers, &data)
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

fn non_empty<'a>(headers: &HeaderMap, row: &'a [String], name: &str) -> Option<&'a str> {
    headers
        .get(row, name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_enum<T: ValueEnum>(raw: &str, what: &str) -> anyhow::Result<T> {
    T::from_str(raw.trim(), true).map_err(|_| anyhow!("invalid {what}: {raw}"))
}

fn parse_f64(raw: &str, what: &str) -> anyhow::Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| anyhow!("invalid {what}: {raw}"))
}

fn parse_u64(raw: &str, what: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| anyhow!("invalid {what}: {raw}"))
}

fn parse_u32(raw: &str, what: &str) -> anyhow::Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| anyhow!("invalid {what}: {raw}"))
}

// Imported rows are treated as new records: ids are reassigned, the id
// column (if present) is ignored.
fn import_properties(
    store: &mut DataStore,
    headers: &HeaderMap,
    data_rows: &[Vec<String>],
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let settings = store.load_settings()?;
    let mut properties = store.load_properties()?;
    let mut count = 0_usize;

    for (idx, row) in data_rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let line = idx + 2;

        let property = Property {
            id: store.next_id(&properties),
            name: headers.require(row, "name").with_context(|| format!("row {line}"))?.to_string(),
            address: headers
                .require(row, "address")
                .with_context(|| format!("row {line}"))?
                .to_string(),
            latitude: non_empty(headers, row, "latitude")
                .map(|v| parse_f64(v, "latitude"))
                .transpose()
                .with_context(|| format!("row {line}"))?,
            longitude: non_empty(headers, row, "longitude")
                .map(|v| parse_f64(v, "longitude"))
                .transpose()
                .with_context(|| format!("row {line}"))?,
            kind: parse_enum(
                headers.require(row, "type").with_context(|| format!("row {line}"))?,
                "property type",
            )
            .with_context(|| format!("row {line}"))?,
            units: non_empty(headers, row, "units")
                .map(|v| parse_u32(v, "units"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(1),
            monthly_income: non_empty(headers, row, "monthly_income")
                .map(|v| parse_f64(v, "monthly income"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(0.0),
            occupancy: non_empty(headers, row, "occupancy")
                .map(|v| parse_f64(v, "occupancy"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(0.0),
            status: non_empty(headers, row, "status")
                .map(|v| parse_enum(v, "property status"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(PropertyStatus::Active),
            description: non_empty(headers, row, "description")
                .unwrap_or_default()
                .to_string(),
            added: now,
            modified: now,
        };
        property.validate().with_context(|| format!("row {line}"))?;
        properties.push(property);
        count += 1;
    }

    if let Some(limit) = settings.plan.unit_limit() {
        let total: u64 = properties.iter().map(|p| u64::from(p.units)).sum();
        if total > u64::from(limit) {
            return Err(anyhow!(
                "plan {} allows at most {limit} units; import would bring the portfolio to {total}",
                settings.plan
            ));
        }
    }

    store.save_properties(&properties)?;
    Ok(count)
}

fn import_tenants(
    store: &mut DataStore,
    headers: &HeaderMap,
    data_rows: &[Vec<String>],
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut tenants = store.load_tenants()?;
    let mut count = 0_usize;

    for (idx, row) in data_rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let line = idx + 2;

        let tenant = Tenant {
            id: store.next_id(&tenants),
            first_name: headers
                .require(row, "first_name")
                .with_context(|| format!("row {line}"))?
                .to_string(),
            last_name: headers
                .require(row, "last_name")
                .with_context(|| format!("row {line}"))?
                .to_string(),
            email: headers
                .require(row, "email")
                .with_context(|| format!("row {line}"))?
                .to_string(),
            property_id: non_empty(headers, row, "property_id")
                .map(|v| parse_u64(v, "property id"))
                .transpose()
                .with_context(|| format!("row {line}"))?,
            monthly_rent: parse_f64(
                headers
                    .require(row, "monthly_rent")
                    .with_context(|| format!("row {line}"))?,
                "monthly rent",
            )
            .with_context(|| format!("row {line}"))?,
            lease_start: non_empty(headers, row, "lease_start")
                .map(parse_date)
                .transpose()
                .with_context(|| format!("row {line}"))?,
            lease_end: non_empty(headers, row, "lease_end")
                .map(parse_date)
                .transpose()
                .with_context(|| format!("row {line}"))?,
            status: non_empty(headers, row, "status")
                .map(|v| parse_enum(v, "tenant status"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(TenantStatus::Pending),
            payment_status: non_empty(headers, row, "payment_status")
                .map(|v| parse_enum(v, "payment status"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(PaymentStanding::Pending),
            added: now,
            modified: now,
        };
        tenant.validate().with_context(|| format!("row {line}"))?;
        tenants.push(tenant);
        count += 1;
    }

    store.save_tenants(&tenants)?;
    Ok(count)
}

fn import_payments(
    store: &mut DataStore,
    headers: &HeaderMap,
    data_rows: &[Vec<String>],
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut payments = store.load_payments()?;
    let mut count = 0_usize;

    for (idx, row) in data_rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let line = idx + 2;

        let payment = Payment {
            id: store.next_id(&payments),
            tenant_id: parse_u64(
                headers
                    .require(row, "tenant_id")
                    .with_context(|| format!("row {line}"))?,
                "tenant id",
            )
            .with_context(|| format!("row {line}"))?,
            property_id: parse_u64(
                headers
                    .require(row, "property_id")
                    .with_context(|| format!("row {line}"))?,
                "property id",
            )
            .with_context(|| format!("row {line}"))?,
            amount: parse_f64(
                headers
                    .require(row, "amount")
                    .with_context(|| format!("row {line}"))?,
                "amount",
            )
            .with_context(|| format!("row {line}"))?,
            date: parse_date(
                headers
                    .require(row, "date")
                    .with_context(|| format!("row {line}"))?,
            )
            .with_context(|| format!("row {line}"))?,
            status: non_empty(headers, row, "status")
                .map(|v| parse_enum(v, "payment status"))
                .transpose()
                .with_context(|| format!("row {line}"))?
                .unwrap_or(PaymentStatus::Completed),
            method: non_empty(headers, row, "method")
                .unwrap_or("other")
                .to_string(),
            reference: non_empty(headers, row, "reference").map(ToString::to_string),
            added: now,
            modified: now,
        };
        payment.validate().with_context(|| format!("row {line}"))?;
        payments.push(payment);
        count += 1;
    }

    store.save_payments(&payments)?;
    Ok(count)
}

fn import_maintenance(
    store: &mut DataStore,
    headers: &HeaderMap,
    data_rows: &[Vec<String>],
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut requests = store.load_maintenance()?;
    let mut count = 0_usize;

    for (idx, row) in data_rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let line = idx + 2;

        let mut request = MaintenanceRequest::new(
            headers
                .require(row, "title")
                .with_context(|| format!("row {line}"))?
                .to_string(),
            parse_u64(
                headers
                    .require(row, "property_id")
                    .with_context(|| format!("row {line}"))?,
                "property id",
            )
            .with_context(|| format!("row {line}"))?,
            non_empty(headers, row, "category")
                .unwrap_or("general")
                .to_string(),
            now,
            store.next_id(&requests),
        );
        if let Some(priority) = non_empty(headers, row, "priority") {
            request.priority =
                parse_enum(priority, "priority").with_context(|| format!("row {line}"))?;
        }
        if let Some(status) = non_empty(headers, row, "status") {
            request.status =
                parse_enum(status, "request status").with_context(|| format!("row {line}"))?;
        }
        if let Some(estimated_cost) = non_empty(headers, row, "estimated_cost") {
            request.estimated_cost = parse_f64(estimated_cost, "estimated cost")
                .with_context(|| format!("row {line}"))?;
        }
        if let Some(actual_cost) = non_empty(headers, row, "actual_cost") {
            request.actual_cost =
                Some(parse_f64(actual_cost, "actual cost").with_context(|| format!("row {line}"))?);
        }
        if let Some(resolution) = non_empty(headers, row, "resolution") {
            request.resolution = Some(resolution.to_string());
        }
        if request.status == RequestStatus::Completed {
            request.completed_at = Some(now);
        }
        request.validate().with_context(|| format!("row {line}"))?;
        requests.push(request);
        count += 1;
    }

    store.save_maintenance(&requests)?;
    Ok(count)
}
