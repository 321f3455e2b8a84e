use chrono::{NaiveDate, Utc};
use rentbook_core::model::{
    MaintenanceRequest, Payment, PaymentStanding, PaymentStatus, Property, PropertyKind,
    PropertyStatus, Settings, Tenant, TenantStatus,
};

fn valid_property() -> Property {
    let now = Utc::now();
    Property {
        id: 1,
        name: "Harbor Flats".to_string(),
        address: "12 Harbor Lane".to_string(),
        latitude: Some(47.6),
        longitude: Some(-122.3),
        kind: PropertyKind::Apartment,
        units: 4,
        monthly_income: 3600.0,
        occupancy: 75.0,
        status: PropertyStatus::Active,
        description: String::new(),
        added: now,
        modified: now,
    }
}

fn valid_tenant() -> Tenant {
    let now = Utc::now();
    Tenant {
        id: 1,
        first_name: "Ada".to_string(),
        last_name: "Okafor".to_string(),
        email: "ada@example.com".to_string(),
        property_id: Some(1),
        monthly_rent: 900.0,
        lease_start: NaiveDate::from_ymd_opt(2026, 1, 1),
        lease_end: NaiveDate::from_ymd_opt(2026, 12, 31),
        status: TenantStatus::Active,
        payment_status: PaymentStanding::Paid,
        added: now,
        modified: now,
    }
}

fn valid_payment() -> Payment {
    let now = Utc::now();
    Payment {
        id: 1,
        tenant_id: 1,
        property_id: 1,
        amount: 900.0,
        date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
        status: PaymentStatus::Completed,
        method: "transfer".to_string(),
        reference: None,
        added: now,
        modified: now,
    }
}

#[test]
fn property_validation_accepts_well_formed_records() {
    assert!(valid_property().validate().is_ok());
}

#[test]
fn property_validation_rejects_bad_fields() {
    let mut property = valid_property();
    property.name = "  ".to_string();
    assert!(property.validate().is_err());

    let mut property = valid_property();
    property.units = 0;
    assert!(property.validate().is_err());

    let mut property = valid_property();
    property.occupancy = 150.0;
    assert!(property.validate().is_err());

    let mut property = valid_property();
    property.occupancy = -1.0;
    assert!(property.validate().is_err());

    let mut property = valid_property();
    property.latitude = Some(123.0);
    assert!(property.validate().is_err());
}

#[test]
fn property_validation_reports_every_problem() {
    let mut property = valid_property();
    property.name = String::new();
    property.units = 0;
    property.occupancy = 200.0;

    let message = property.validate().expect_err("invalid").to_string();
    assert!(message.contains("name"));
    assert!(message.contains("units"));
    assert!(message.contains("occupancy"));
}

#[test]
fn tenant_validation_checks_email_and_lease_order() {
    assert!(valid_tenant().validate().is_ok());

    let mut tenant = valid_tenant();
    tenant.email = "not-an-email".to_string();
    assert!(tenant.validate().is_err());

    let mut tenant = valid_tenant();
    tenant.lease_start = NaiveDate::from_ymd_opt(2026, 6, 1);
    tenant.lease_end = NaiveDate::from_ymd_opt(2026, 6, 1);
    assert!(tenant.validate().is_err());

    let mut tenant = valid_tenant();
    tenant.lease_end = None;
    assert!(tenant.validate().is_ok(), "open-ended lease is fine");

    let mut tenant = valid_tenant();
    tenant.monthly_rent = 0.0;
    assert!(tenant.validate().is_err());
}

#[test]
fn payment_validation_rejects_non_positive_amounts() {
    assert!(valid_payment().validate().is_ok());

    let mut payment = valid_payment();
    payment.amount = -5.0;
    assert!(payment.validate().is_err());

    let mut payment = valid_payment();
    payment.amount = 0.0;
    assert!(payment.validate().is_err());
}

#[test]
fn maintenance_validation_checks_title_and_costs() {
    let now = Utc::now();
    let request = MaintenanceRequest::new("Leaking faucet".to_string(), 1, "plumbing".to_string(), now, 1);
    assert!(request.validate().is_ok());

    let short = MaintenanceRequest::new("ab".to_string(), 1, "plumbing".to_string(), now, 1);
    assert!(short.validate().is_err());

    let mut negative = MaintenanceRequest::new("Leak".to_string(), 1, "plumbing".to_string(), now, 1);
    negative.estimated_cost = -10.0;
    assert!(negative.validate().is_err());
}

#[test]
fn settings_validation_checks_profile_email() {
    let mut settings = Settings::default();
    assert!(settings.validate().is_ok(), "empty profile is fine");

    settings.profile.email = "owner@example.com".to_string();
    assert!(settings.validate().is_ok());

    settings.profile.email = "broken@".to_string();
    assert!(settings.validate().is_err());
}
