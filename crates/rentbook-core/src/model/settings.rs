use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::model::is_valid_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Cad => "C$",
            Self::Aud => "A$",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Ymd,
    Dmy,
    Mdy,
}

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Ymd => "%Y-%m-%d",
            Self::Dmy => "%d/%m/%Y",
            Self::Mdy => "%m/%d/%Y",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ymd => "ymd",
            Self::Dmy => "dmy",
            Self::Mdy => "mdy",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Starter,
    Essential,
    Professional,
    Business,
    Enterprise,
}

impl PlanTier {
    pub fn monthly_price(&self) -> f64 {
        match self {
            Self::Starter => 0.0,
            Self::Essential => 9.0,
            Self::Professional => 29.0,
            Self::Business => 79.0,
            Self::Enterprise => 199.0,
        }
    }

    pub fn unit_limit(&self) -> Option<u32> {
        match self {
            Self::Starter => Some(5),
            Self::Essential => Some(25),
            Self::Professional => Some(100),
            Self::Business => Some(500),
            Self::Enterprise => None,
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            Self::Starter => &["core records", "csv export"],
            Self::Essential => &["core records", "csv export", "csv import"],
            Self::Professional => {
                &["core records", "csv export", "csv import", "maintenance tracking"]
            }
            Self::Business => &[
                "core records",
                "csv export",
                "csv import",
                "maintenance tracking",
                "portfolio overview",
            ],
            Self::Enterprise => &[
                "core records",
                "csv export",
                "csv import",
                "maintenance tracking",
                "portfolio overview",
                "unlimited units",
            ],
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Starter => "starter",
            Self::Essential => "essential",
            Self::Professional => "professional",
            Self::Business => "business",
            Self::Enterprise => "enterprise",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub payment_reminders: bool,
    pub maintenance_alerts: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            payment_reminders: true,
            maintenance_alerts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub notifications: NotificationPrefs,

    pub currency: Currency,

    pub date_format: DateFormat,

    pub plan: PlanTier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            notifications: NotificationPrefs::default(),
            currency: Currency::Usd,
            date_format: DateFormat::Ymd,
            plan: PlanTier::Starter,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.profile.email.is_empty() && !is_valid_email(&self.profile.email) {
            return Err(anyhow!("invalid settings: invalid email address: {}", self.profile.email));
        }
        Ok(())
    }
}
