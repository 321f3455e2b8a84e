use chrono::{NaiveDate, Utc};
use rentbook_core::model::{
    Payment, PaymentStanding, PaymentStatus, Property, PropertyKind, PropertyStatus, Tenant,
    TenantStatus,
};
use rentbook_core::stats::{
    MaintenanceStats, PaymentStats, PropertyStats, TenantStats, maintenance_stats, payment_stats,
    property_stats, tenant_stats,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn property(id: u64, kind: PropertyKind, units: u32, occupancy: f64, income: f64) -> Property {
    let now = Utc::now();
    Property {
        id,
        name: format!("Property {id}"),
        address: "1 Main St".to_string(),
        latitude: None,
        longitude: None,
        kind,
        units,
        monthly_income: income,
        occupancy,
        status: PropertyStatus::Active,
        description: String::new(),
        added: now,
        modified: now,
    }
}

fn tenant(
    id: u64,
    status: TenantStatus,
    standing: PaymentStanding,
    rent: f64,
    lease_end: Option<NaiveDate>,
) -> Tenant {
    let now = Utc::now();
    Tenant {
        id,
        first_name: "T".to_string(),
        last_name: format!("{id}"),
        email: format!("t{id}@example.com"),
        property_id: Some(1),
        monthly_rent: rent,
        lease_start: None,
        lease_end,
        status,
        payment_status: standing,
        added: now,
        modified: now,
    }
}

fn payment(id: u64, amount: f64, on: NaiveDate, status: PaymentStatus) -> Payment {
    let now = Utc::now();
    Payment {
        id,
        tenant_id: 1,
        property_id: 1,
        amount,
        date: on,
        status,
        method: "transfer".to_string(),
        reference: None,
        added: now,
        modified: now,
    }
}

#[test]
fn empty_inputs_produce_zeroed_stats() {
    let today = date(2026, 7, 15);

    assert_eq!(property_stats(&[]), PropertyStats::default());
    assert_eq!(tenant_stats(&[], today), TenantStats::default());
    assert_eq!(payment_stats(&[], today), PaymentStats::default());
    assert_eq!(maintenance_stats(&[]), MaintenanceStats::default());
}

#[test]
fn property_stats_aggregate_units_and_kinds() {
    let rows = vec![
        property(1, PropertyKind::Apartment, 8, 50.0, 6400.0),
        property(2, PropertyKind::Apartment, 2, 100.0, 2400.0),
        property(3, PropertyKind::House, 1, 0.0, 0.0),
    ];

    let stats = property_stats(&rows);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.total_units, 11);
    assert!((stats.average_occupancy - 50.0).abs() < 1e-9);
    assert!((stats.monthly_income - 8800.0).abs() < 1e-9);
    assert_eq!(stats.by_kind.get("apartment").copied(), Some(2));
    assert_eq!(stats.by_kind.get("house").copied(), Some(1));
}

#[test]
fn tenant_stats_track_standing_and_expiring_leases() {
    let today = date(2026, 7, 15);
    let rows = vec![
        tenant(1, TenantStatus::Active, PaymentStanding::Paid, 800.0, Some(date(2026, 8, 1))),
        tenant(2, TenantStatus::Active, PaymentStanding::Overdue, 1000.0, Some(date(2027, 1, 1))),
        tenant(3, TenantStatus::Pending, PaymentStanding::Pending, 600.0, None),
        tenant(4, TenantStatus::Inactive, PaymentStanding::Paid, 0.1, Some(date(2026, 7, 1))),
    ];

    let stats = tenant_stats(&rows, today);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.inactive, 1);
    assert_eq!(stats.overdue, 1);
    // lease ending 2026-08-01 is within 30 days of 2026-07-15; an already
    // expired lease is not
    assert_eq!(stats.leases_expiring_soon, 1);
    assert!((stats.total_rent - 2400.1).abs() < 1e-9);
}

#[test]
fn payment_stats_bucket_by_month_and_derive_growth() {
    let today = date(2026, 7, 15);
    let rows = vec![
        payment(1, 100.0, date(2026, 6, 3), PaymentStatus::Completed),
        payment(2, 200.0, date(2026, 7, 1), PaymentStatus::Completed),
        payment(3, 100.0, date(2026, 7, 20), PaymentStatus::Completed),
        payment(4, 50.0, date(2026, 7, 21), PaymentStatus::Pending),
        payment(5, 75.0, date(2026, 7, 22), PaymentStatus::Failed),
        payment(6, 30.0, date(2026, 5, 2), PaymentStatus::Refunded),
    ];

    let stats = payment_stats(&rows, today);
    assert_eq!(stats.total, 6);
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.refunded, 1);
    assert!((stats.collected - 400.0).abs() < 1e-9);
    assert!((stats.outstanding - 50.0).abs() < 1e-9);
    assert!((stats.average_payment - 400.0 / 3.0).abs() < 1e-9);

    assert_eq!(stats.monthly.get("2026-06").copied(), Some(100.0));
    assert_eq!(stats.monthly.get("2026-07").copied(), Some(300.0));
    assert!(stats.monthly.get("2026-05").is_none(), "refunds are not income");

    // June collected 100, July collected 300
    assert!((stats.income_growth - 200.0).abs() < 1e-9);
    assert!((stats.collection_rate - 400.0 / 450.0 * 100.0).abs() < 1e-9);
}

#[test]
fn growth_is_zero_without_a_prior_month() {
    let today = date(2026, 7, 15);
    let rows = vec![payment(1, 100.0, date(2026, 7, 3), PaymentStatus::Completed)];

    let stats = payment_stats(&rows, today);
    assert_eq!(stats.income_growth, 0.0);
}
