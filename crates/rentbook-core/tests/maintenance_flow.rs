use chrono::{Duration, Utc};
use rentbook_core::datetime::month_key;
use rentbook_core::model::{MaintenanceRequest, Priority, RequestStatus};
use rentbook_core::stats::maintenance_stats;

#[test]
fn new_requests_get_documented_defaults() {
    let now = Utc::now();
    let request = MaintenanceRequest::new("Leak".to_string(), 1, "plumbing".to_string(), now, 1);

    assert_eq!(request.status, RequestStatus::Open);
    assert_eq!(request.priority, Priority::Medium);
    assert_eq!(request.estimated_cost, 0.0);
    assert!(request.actual_cost.is_none());
    assert!(request.completed_at.is_none());
}

#[test]
fn completing_sets_cost_note_and_timestamp() {
    let now = Utc::now();
    let mut request = MaintenanceRequest::new("Leak".to_string(), 1, "plumbing".to_string(), now, 1);

    let completed_at = now + Duration::days(2);
    request.complete(150.0, Some("Fixed".to_string()), completed_at);

    assert_eq!(request.status, RequestStatus::Completed);
    assert_eq!(request.actual_cost, Some(150.0));
    assert_eq!(request.resolution.as_deref(), Some("Fixed"));
    assert_eq!(request.completed_at, Some(completed_at));

    let stats = maintenance_stats(std::slice::from_ref(&request));
    assert_eq!(stats.completed, 1);
    assert_eq!(
        stats
            .completed_by_month
            .get(&month_key(completed_at.date_naive()))
            .copied(),
        Some(1)
    );
}

#[test]
fn reopen_is_unguarded_but_completion_time_is_kept() {
    let now = Utc::now();
    let mut request = MaintenanceRequest::new("Leak".to_string(), 1, "plumbing".to_string(), now, 1);

    let first_completion = now + Duration::days(1);
    request.complete(80.0, None, first_completion);
    assert_eq!(request.completed_at, Some(first_completion));

    request.reopen(now + Duration::days(3));
    assert_eq!(request.status, RequestStatus::Open);
    assert_eq!(request.completed_at, Some(first_completion));

    // completing again must not move the original completion timestamp
    request.complete(120.0, Some("Fixed for real".to_string()), now + Duration::days(5));
    assert_eq!(request.completed_at, Some(first_completion));
    assert_eq!(request.actual_cost, Some(120.0));
}

#[test]
fn days_to_completion_is_averaged() {
    let now = Utc::now();

    let mut quick = MaintenanceRequest::new("Bulb".to_string(), 1, "electrical".to_string(), now, 1);
    quick.complete(10.0, None, now + Duration::days(1));

    let mut slow = MaintenanceRequest::new("Roof".to_string(), 1, "structural".to_string(), now, 2);
    slow.complete(900.0, None, now + Duration::days(5));

    let stats = maintenance_stats(&[quick, slow]);
    assert_eq!(stats.completed, 2);
    assert!((stats.average_days_to_completion - 3.0).abs() < 1e-9);
    assert!((stats.average_cost - 455.0).abs() < 1e-9);
}
