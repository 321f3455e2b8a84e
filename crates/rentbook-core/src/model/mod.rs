use std::sync::OnceLock;

use regex::Regex;

pub mod maintenance;
pub mod notification;
pub mod payment;
pub mod property;
pub mod settings;
pub mod tenant;

pub use maintenance::{MaintenancePatch, MaintenanceRequest, Priority, RequestStatus};
pub use notification::Notification;
pub use payment::{Payment, PaymentPatch, PaymentStatus};
pub use property::{Property, PropertyKind, PropertyPatch, PropertyStatus};
pub use settings::{Currency, DateFormat, PlanTier, Settings};
pub use tenant::{PaymentStanding, Tenant, TenantPatch, TenantStatus};

pub trait Record {
    fn id(&self) -> u64;
}

pub(crate) fn is_valid_email(raw: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern compiles")
    });
    re.is_match(raw)
}
