use std::fmt;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Emergency,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Emergency => "emergency",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    #[value(name = "in_progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: u64,

    pub title: String,

    pub property_id: u64,

    #[serde(default = "default_category")]
    pub category: String,

    pub priority: Priority,

    pub status: RequestStatus,

    #[serde(default)]
    pub estimated_cost: f64,

    #[serde(default)]
    pub actual_cost: Option<f64>,

    #[serde(default)]
    pub resolution: Option<String>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    pub added: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

fn default_category() -> String {
    "general".to_string()
}

impl MaintenanceRequest {
    pub fn new(title: String, property_id: u64, category: String, now: DateTime<Utc>, id: u64) -> Self {
        Self {
            id,
            title,
            property_id,
            category,
            priority: Priority::Medium,
            status: RequestStatus::Open,
            estimated_cost: 0.0,
            actual_cost: None,
            resolution: None,
            completed_at: None,
            added: now,
            modified: now,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut problems = Vec::new();

        if self.title.trim().chars().count() < 3 {
            problems.push("title must be at least 3 characters".to_string());
        }
        if self.category.trim().is_empty() {
            problems.push("category must not be empty".to_string());
        }
        if self.estimated_cost < 0.0 {
            problems.push("estimated cost must not be negative".to_string());
        }
        if let Some(cost) = self.actual_cost {
            if cost < 0.0 {
                problems.push("actual cost must not be negative".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid maintenance request: {}", problems.join("; ")))
        }
    }

    pub fn complete(&mut self, actual_cost: f64, resolution: Option<String>, now: DateTime<Utc>) {
        self.status = RequestStatus::Completed;
        self.actual_cost = Some(actual_cost);
        if resolution.is_some() {
            self.resolution = resolution;
        }
        // completed_at is recorded once, on the first completion
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.modified = now;
    }

    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.status = RequestStatus::Open;
        self.modified = now;
    }
}

impl Record for MaintenanceRequest {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaintenancePatch {
    pub title: Option<String>,
    pub property_id: Option<u64>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<RequestStatus>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub resolution: Option<String>,
}

impl MaintenancePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.property_id.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.estimated_cost.is_none()
            && self.actual_cost.is_none()
            && self.resolution.is_none()
    }

    pub fn apply(&self, request: &mut MaintenanceRequest) {
        if let Some(title) = &self.title {
            request.title = title.clone();
        }
        if let Some(property_id) = self.property_id {
            request.property_id = property_id;
        }
        if let Some(category) = &self.category {
            request.category = category.clone();
        }
        if let Some(priority) = self.priority {
            request.priority = priority;
        }
        if let Some(status) = self.status {
            request.status = status;
        }
        if let Some(estimated_cost) = self.estimated_cost {
            request.estimated_cost = estimated_cost;
        }
        if let Some(actual_cost) = self.actual_cost {
            request.actual_cost = Some(actual_cost);
        }
        if let Some(resolution) = &self.resolution {
            request.resolution = Some(resolution.clone());
        }
    }
}
