use std::fmt;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Record, is_valid_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Pending,
    Inactive,
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStanding {
    Paid,
    Pending,
    Overdue,
}

impl fmt::Display for PaymentStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u64,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    #[serde(default)]
    pub property_id: Option<u64>,

    pub monthly_rent: f64,

    #[serde(default)]
    pub lease_start: Option<NaiveDate>,

    #[serde(default)]
    pub lease_end: Option<NaiveDate>,

    pub status: TenantStatus,

    pub payment_status: PaymentStanding,

    pub added: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl Tenant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut problems = Vec::new();

        if self.first_name.trim().is_empty() {
            problems.push("first name must not be empty".to_string());
        }
        if self.last_name.trim().is_empty() {
            problems.push("last name must not be empty".to_string());
        }
        if !is_valid_email(&self.email) {
            problems.push(format!("invalid email address: {}", self.email));
        }
        if self.monthly_rent <= 0.0 {
            problems.push("monthly rent must be positive".to_string());
        }
        if let (Some(start), Some(end)) = (self.lease_start, self.lease_end) {
            if end <= start {
                problems.push(format!("lease end {end} must be after lease start {start}"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid tenant: {}", problems.join("; ")))
        }
    }
}

impl Record for Tenant {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct TenantPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub property_id: Option<u64>,
    pub monthly_rent: Option<f64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub status: Option<TenantStatus>,
    pub payment_status: Option<PaymentStanding>,
}

impl TenantPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.property_id.is_none()
            && self.monthly_rent.is_none()
            && self.lease_start.is_none()
            && self.lease_end.is_none()
            && self.status.is_none()
            && self.payment_status.is_none()
    }

    pub fn apply(&self, tenant: &mut Tenant) {
        if let Some(first_name) = &self.first_name {
            tenant.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            tenant.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            tenant.email = email.clone();
        }
        if let Some(property_id) = self.property_id {
            tenant.property_id = Some(property_id);
        }
        if let Some(monthly_rent) = self.monthly_rent {
            tenant.monthly_rent = monthly_rent;
        }
        if let Some(lease_start) = self.lease_start {
            tenant.lease_start = Some(lease_start);
        }
        if let Some(lease_end) = self.lease_end {
            tenant.lease_end = Some(lease_end);
        }
        if let Some(status) = self.status {
            tenant.status = status;
        }
        if let Some(payment_status) = self.payment_status {
            tenant.payment_status = payment_status;
        }
    }
}
