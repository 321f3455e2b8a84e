use std::fmt;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,

    pub tenant_id: u64,

    pub property_id: u64,

    pub amount: f64,

    pub date: NaiveDate,

    pub status: PaymentStatus,

    pub method: String,

    #[serde(default)]
    pub reference: Option<String>,

    pub added: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl Payment {
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut problems = Vec::new();

        if self.amount <= 0.0 {
            problems.push(format!("amount must be positive, got {}", self.amount));
        }
        if self.method.trim().is_empty() {
            problems.push("method must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid payment: {}", problems.join("; ")))
        }
    }
}

impl Record for Payment {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub tenant_id: Option<u64>,
    pub property_id: Option<u64>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,
    pub method: Option<String>,
    pub reference: Option<String>,
}

impl PaymentPatch {
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_none()
            && self.property_id.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.status.is_none()
            && self.method.is_none()
            && self.reference.is_none()
    }

    pub fn apply(&self, payment: &mut Payment) {
        if let Some(tenant_id) = self.tenant_id {
            payment.tenant_id = tenant_id;
        }
        if let Some(property_id) = self.property_id {
            payment.property_id = property_id;
        }
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(date) = self.date {
            payment.date = date;
        }
        if let Some(status) = self.status {
            payment.status = status;
        }
        if let Some(method) = &self.method {
            payment.method = method.clone();
        }
        if let Some(reference) = &self.reference {
            payment.reference = Some(reference.clone());
        }
    }
}
