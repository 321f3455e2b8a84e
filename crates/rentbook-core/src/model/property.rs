use std::fmt;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Apartment,
    House,
    Condo,
    Commercial,
    Vacation,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Condo => "condo",
            Self::Commercial => "commercial",
            Self::Vacation => "vacation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,

    pub name: String,

    pub address: String,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    pub kind: PropertyKind,

    pub units: u32,

    #[serde(default)]
    pub monthly_income: f64,

    #[serde(default)]
    pub occupancy: f64,

    pub status: PropertyStatus,

    #[serde(default)]
    pub description: String,

    pub added: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl Property {
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        }
        if self.address.trim().is_empty() {
            problems.push("address must not be empty".to_string());
        }
        if self.units == 0 {
            problems.push("units must be at least 1".to_string());
        }
        if self.monthly_income < 0.0 {
            problems.push("monthly income must not be negative".to_string());
        }
        if !(0.0..=100.0).contains(&self.occupancy) {
            problems.push(format!("occupancy must be within 0..100, got {}", self.occupancy));
        }
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                problems.push(format!("latitude out of range: {lat}"));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                problems.push(format!("longitude out of range: {lon}"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("invalid property: {}", problems.join("; ")))
        }
    }
}

impl Record for Property {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub kind: Option<PropertyKind>,
    pub units: Option<u32>,
    pub monthly_income: Option<f64>,
    pub occupancy: Option<f64>,
    pub status: Option<PropertyStatus>,
    pub description: Option<String>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.kind.is_none()
            && self.units.is_none()
            && self.monthly_income.is_none()
            && self.occupancy.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, property: &mut Property) {
        if let Some(name) = &self.name {
            property.name = name.clone();
        }
        if let Some(address) = &self.address {
            property.address = address.clone();
        }
        if let Some(latitude) = self.latitude {
            property.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            property.longitude = Some(longitude);
        }
        if let Some(kind) = self.kind {
            property.kind = kind;
        }
        if let Some(units) = self.units {
            property.units = units;
        }
        if let Some(monthly_income) = self.monthly_income {
            property.monthly_income = monthly_income;
        }
        if let Some(occupancy) = self.occupancy {
            property.occupancy = occupancy;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(description) = &self.description {
            property.description = description.clone();
        }
    }
}
