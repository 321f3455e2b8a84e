use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::datetime::{month_key, previous_month};
use crate::model::{
    MaintenanceRequest, Payment, PaymentStanding, PaymentStatus, Property, RequestStatus, Tenant,
    TenantStatus,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStats {
    pub total: usize,
    pub total_units: u64,
    pub average_occupancy: f64,
    pub monthly_income: f64,
    pub by_kind: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

pub fn property_stats(rows: &[Property]) -> PropertyStats {
    if rows.is_empty() {
        return PropertyStats::default();
    }

    let mut stats = PropertyStats {
        total: rows.len(),
        ..PropertyStats::default()
    };

    for property in rows {
        stats.total_units += u64::from(property.units);
        stats.average_occupancy += property.occupancy;
        stats.monthly_income += property.monthly_income;
        *stats.by_kind.entry(property.kind.to_string()).or_default() += 1;
        *stats.by_status.entry(property.status.to_string()).or_default() += 1;
    }
    stats.average_occupancy /= rows.len() as f64;

    stats
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
    pub paid: usize,
    pub payment_pending: usize,
    pub overdue: usize,
    pub total_rent: f64,
    pub average_rent: f64,
    pub leases_expiring_soon: usize,
}

pub fn tenant_stats(rows: &[Tenant], today: NaiveDate) -> TenantStats {
    if rows.is_empty() {
        return TenantStats::default();
    }

    let mut stats = TenantStats {
        total: rows.len(),
        ..TenantStats::default()
    };

    for tenant in rows {
        match tenant.status {
            TenantStatus::Active => stats.active += 1,
            TenantStatus::Pending => stats.pending += 1,
            TenantStatus::Inactive => stats.inactive += 1,
        }
        match tenant.payment_status {
            PaymentStanding::Paid => stats.paid += 1,
            PaymentStanding::Pending => stats.payment_pending += 1,
            PaymentStanding::Overdue => stats.overdue += 1,
        }
        stats.total_rent += tenant.monthly_rent;

        if let Some(end) = tenant.lease_end {
            let days_left = (end - today).num_days();
            if (0..=30).contains(&days_left) {
                stats.leases_expiring_soon += 1;
            }
        }
    }
    stats.average_rent = stats.total_rent / rows.len() as f64;

    stats
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
    pub refunded: usize,
    pub collected: f64,
    pub outstanding: f64,
    pub average_payment: f64,
    pub collection_rate: f64,
    pub income_growth: f64,
    pub monthly: BTreeMap<String, f64>,
}

pub fn payment_stats(rows: &[Payment], today: NaiveDate) -> PaymentStats {
    if rows.is_empty() {
        return PaymentStats::default();
    }

    let mut stats = PaymentStats {
        total: rows.len(),
        ..PaymentStats::default()
    };

    for payment in rows {
        match payment.status {
            PaymentStatus::Completed => {
                stats.completed += 1;
                stats.collected += payment.amount;
                *stats.monthly.entry(month_key(payment.date)).or_default() += payment.amount;
            }
            PaymentStatus::Pending => {
                stats.pending += 1;
                stats.outstanding += payment.amount;
            }
            PaymentStatus::Failed => stats.failed += 1,
            PaymentStatus::Refunded => stats.refunded += 1,
        }
    }

    if stats.completed > 0 {
        stats.average_payment = stats.collected / stats.completed as f64;
    }
    let billed = stats.collected + stats.outstanding;
    if billed > 0.0 {
        stats.collection_rate = stats.collected / billed * 100.0;
    }

    let this_month = stats.monthly.get(&month_key(today)).copied().unwrap_or(0.0);
    let last_month = stats
        .monthly
        .get(&month_key(previous_month(today)))
        .copied()
        .unwrap_or(0.0);
    if last_month > 0.0 {
        stats.income_growth = (this_month - last_month) / last_month * 100.0;
    }

    stats
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub by_priority: BTreeMap<String, usize>,
    pub estimated_total: f64,
    pub actual_total: f64,
    pub average_cost: f64,
    pub average_days_to_completion: f64,
    pub completed_by_month: BTreeMap<String, u64>,
}

pub fn maintenance_stats(rows: &[MaintenanceRequest]) -> MaintenanceStats {
    if rows.is_empty() {
        return MaintenanceStats::default();
    }

    let mut stats = MaintenanceStats {
        total: rows.len(),
        ..MaintenanceStats::default()
    };
    let mut costed = 0_usize;
    let mut timed = 0_usize;

    for request in rows {
        match request.status {
            RequestStatus::Open => stats.open += 1,
            RequestStatus::InProgress => stats.in_progress += 1,
            RequestStatus::Completed => stats.completed += 1,
            RequestStatus::Cancelled => stats.cancelled += 1,
        }
        *stats.by_priority.entry(request.priority.to_string()).or_default() += 1;
        stats.estimated_total += request.estimated_cost;

        if let Some(cost) = request.actual_cost {
            stats.actual_total += cost;
            costed += 1;
        }
        if let Some(completed_at) = request.completed_at {
            *stats
                .completed_by_month
                .entry(month_key(completed_at.date_naive()))
                .or_default() += 1;
            stats.average_days_to_completion +=
                (completed_at - request.added).num_seconds() as f64 / 86_400.0;
            timed += 1;
        }
    }

    if costed > 0 {
        stats.average_cost = stats.actual_total / costed as f64;
    }
    if timed > 0 {
        stats.average_days_to_completion /= timed as f64;
    }

    stats
}
