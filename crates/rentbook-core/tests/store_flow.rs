use std::fs;

use chrono::Utc;
use rentbook_core::datastore::DataStore;
use rentbook_core::model::{Currency, PlanTier, Property, PropertyKind, PropertyStatus};
use tempfile::tempdir;

fn sample_property(id: u64, name: &str) -> Property {
    let now = Utc::now();
    Property {
        id,
        name: name.to_string(),
        address: "12 Harbor Lane".to_string(),
        latitude: None,
        longitude: None,
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

#[test]
fn roundtrip_preserves_added_records() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    assert!(store.load_properties().expect("load empty").is_empty());

    let property = sample_property(1, "Harbor Flats");
    store
        .save_properties(&[property.clone()])
        .expect("save properties");

    let loaded = store.load_properties().expect("load properties");
    assert_eq!(loaded.len(), 1);

    let found = loaded.iter().find(|p| p.id == 1).expect("record by id");
    assert_eq!(found.name, property.name);
    assert_eq!(found.address, property.address);
    assert_eq!(found.units, property.units);
    assert_eq!(found.kind, property.kind);
    assert_eq!(found.added, property.added);
}

#[test]
fn next_id_is_sequential() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    assert_eq!(store.next_id::<Property>(&[]), 1);

    let rows = vec![sample_property(1, "A"), sample_property(7, "B")];
    assert_eq!(store.next_id(&rows), 8);
}

#[test]
fn delete_removes_exactly_one_record() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let rows = vec![
        sample_property(1, "A"),
        sample_property(2, "B"),
        sample_property(3, "C"),
    ];
    store.save_properties(&rows).expect("save");

    let mut loaded = store.load_properties().expect("load");
    let before = loaded.len();
    loaded.retain(|p| p.id != 2);
    store.save_properties(&loaded).expect("save after delete");

    let after = store.load_properties().expect("reload");
    assert_eq!(after.len(), before - 1);
    assert!(!after.iter().any(|p| p.id == 2));
}

#[test]
fn corrupt_lines_are_skipped_on_load() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let valid = serde_json::to_string(&sample_property(1, "Valid")).expect("serialize");
    fs::write(
        &store.properties_path,
        format!("{valid}\nnot json at all\n{{\"half\": true}}\n"),
    )
    .expect("write data file");

    let loaded = store.load_properties().expect("load tolerates corruption");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Valid");
}

#[test]
fn settings_default_until_saved() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let settings = store.load_settings().expect("load default settings");
    assert_eq!(settings.currency, Currency::Usd);
    assert_eq!(settings.plan, PlanTier::Starter);
    assert!(settings.notifications.payment_reminders);

    let mut changed = settings;
    changed.currency = Currency::Eur;
    changed.plan = PlanTier::Professional;
    changed.profile.name = "Ada".to_string();
    store.save_settings(&changed).expect("save settings");

    let reloaded = store.load_settings().expect("reload settings");
    assert_eq!(reloaded.currency, Currency::Eur);
    assert_eq!(reloaded.plan, PlanTier::Professional);
    assert_eq!(reloaded.profile.name, "Ada");
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    fs::write(&store.settings_path, "{broken").expect("write settings file");

    let settings = store.load_settings().expect("load settings");
    assert_eq!(settings.currency, Currency::Usd);
    assert_eq!(settings.plan, PlanTier::Starter);
}

#[test]
fn notifications_accumulate() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");
    let now = Utc::now();

    store
        .append_notification("property", "Added property Harbor Flats".to_string(), now)
        .expect("append");
    store
        .append_notification("payment", "Recorded payment".to_string(), now)
        .expect("append");

    let rows = store.load_notifications().expect("load notifications");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "property");
    assert!(!rows[0].read);
    assert_ne!(rows[0].id, rows[1].id);
}
