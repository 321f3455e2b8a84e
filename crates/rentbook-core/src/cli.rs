use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::model::{
    Currency, DateFormat, PaymentStanding, PaymentStatus, PlanTier, Priority, PropertyKind,
    PropertyStatus, RequestStatus, TenantStatus,
};

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rentbook",
    version,
    about = "Rentbook: local-first property management",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage properties
    Property {
        #[command(subcommand)]
        cmd: PropertyCmd,
    },
    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        cmd: TenantCmd,
    },
    /// Record and review payments
    Payment {
        #[command(subcommand)]
        cmd: PaymentCmd,
    },
    /// Track maintenance requests
    Maintenance {
        #[command(subcommand)]
        cmd: MaintenanceCmd,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        cmd: SettingsCmd,
    },
    /// Review the notification feed
    Notifications {
        #[command(subcommand)]
        cmd: NotificationsCmd,
    },
    /// Portfolio dashboard across all records
    Overview,
    /// Write records as CSV to stdout
    Export { entity: EntityKind },
    /// Read CSV records from a file, or stdin when no file is given
    Import {
        entity: EntityKind,
        file: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum EntityKind {
    Properties,
    Tenants,
    Payments,
    Maintenance,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PropertyCmd {
    Add(PropertyAddArgs),
    List(PropertyListArgs),
    Info { id: u64 },
    Modify {
        id: u64,
        #[command(flatten)]
        changes: PropertyModifyArgs,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug, Clone)]
pub struct PropertyAddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub address: String,

    #[arg(long, value_enum)]
    pub kind: PropertyKind,

    #[arg(long, default_value_t = 1)]
    pub units: u32,

    #[arg(long = "income", default_value_t = 0.0)]
    pub monthly_income: f64,

    #[arg(long, default_value_t = 0.0)]
    pub occupancy: f64,

    #[arg(long)]
    pub latitude: Option<f64>,

    #[arg(long)]
    pub longitude: Option<f64>,

    #[arg(long, value_enum)]
    pub status: Option<PropertyStatus>,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PropertyListArgs {
    #[arg(long, value_enum)]
    pub kind: Option<PropertyKind>,

    #[arg(long, value_enum)]
    pub status: Option<PropertyStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct PropertyModifyArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long, value_enum)]
    pub kind: Option<PropertyKind>,

    #[arg(long)]
    pub units: Option<u32>,

    #[arg(long = "income")]
    pub monthly_income: Option<f64>,

    #[arg(long)]
    pub occupancy: Option<f64>,

    #[arg(long)]
    pub latitude: Option<f64>,

    #[arg(long)]
    pub longitude: Option<f64>,

    #[arg(long, value_enum)]
    pub status: Option<PropertyStatus>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TenantCmd {
    Add(TenantAddArgs),
    List(TenantListArgs),
    Info { id: u64 },
    Modify {
        id: u64,
        #[command(flatten)]
        changes: TenantModifyArgs,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug, Clone)]
pub struct TenantAddArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long = "property")]
    pub property_id: Option<u64>,

    #[arg(long = "rent")]
    pub monthly_rent: f64,

    /// Lease start date, YYYY-MM-DD
    #[arg(long)]
    pub lease_start: Option<String>,

    /// Lease end date, YYYY-MM-DD
    #[arg(long)]
    pub lease_end: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<TenantStatus>,

    #[arg(long, value_enum)]
    pub payment_status: Option<PaymentStanding>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TenantListArgs {
    #[arg(long, value_enum)]
    pub status: Option<TenantStatus>,

    #[arg(long, value_enum)]
    pub payment_status: Option<PaymentStanding>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct TenantModifyArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,

    #[arg(long = "rent")]
    pub monthly_rent: Option<f64>,

    #[arg(long)]
    pub lease_start: Option<String>,

    #[arg(long)]
    pub lease_end: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<TenantStatus>,

    #[arg(long, value_enum)]
    pub payment_status: Option<PaymentStanding>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PaymentCmd {
    Record(PaymentRecordArgs),
    List(PaymentListArgs),
    Info { id: u64 },
    Modify {
        id: u64,
        #[command(flatten)]
        changes: PaymentModifyArgs,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug, Clone)]
pub struct PaymentRecordArgs {
    #[arg(long = "tenant")]
    pub tenant_id: u64,

    /// Defaults to the tenant's property when omitted
    #[arg(long = "property")]
    pub property_id: Option<u64>,

    #[arg(long)]
    pub amount: f64,

    /// Payment date, YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<PaymentStatus>,

    #[arg(long)]
    pub method: Option<String>,

    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PaymentListArgs {
    #[arg(long, value_enum)]
    pub status: Option<PaymentStatus>,

    #[arg(long = "tenant")]
    pub tenant_id: Option<u64>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,

    /// Restrict to a month bucket, YYYY-MM
    #[arg(long)]
    pub month: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PaymentModifyArgs {
    #[arg(long = "tenant")]
    pub tenant_id: Option<u64>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,

    #[arg(long)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<PaymentStatus>,

    #[arg(long)]
    pub method: Option<String>,

    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MaintenanceCmd {
    Add(MaintenanceAddArgs),
    List(MaintenanceListArgs),
    Info { id: u64 },
    Modify {
        id: u64,
        #[command(flatten)]
        changes: MaintenanceModifyArgs,
    },
    Complete {
        id: u64,

        #[arg(long = "cost")]
        actual_cost: f64,

        #[arg(long)]
        note: Option<String>,
    },
    Reopen { id: u64 },
    Delete { id: u64 },
}

#[derive(Args, Debug, Clone)]
pub struct MaintenanceAddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long = "property")]
    pub property_id: u64,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    #[arg(long = "estimate")]
    pub estimated_cost: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MaintenanceListArgs {
    #[arg(long, value_enum)]
    pub status: Option<RequestStatus>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct MaintenanceModifyArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "property")]
    pub property_id: Option<u64>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    #[arg(long, value_enum)]
    pub status: Option<RequestStatus>,

    #[arg(long = "estimate")]
    pub estimated_cost: Option<f64>,

    #[arg(long = "cost")]
    pub actual_cost: Option<f64>,

    #[arg(long)]
    pub resolution: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCmd {
    Show,
    Set(SettingsSetArgs),
    Plans,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsSetArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, value_enum)]
    pub currency: Option<Currency>,

    #[arg(long, value_enum)]
    pub date_format: Option<DateFormat>,

    #[arg(long, value_enum)]
    pub plan: Option<PlanTier>,

    #[arg(long)]
    pub payment_reminders: Option<bool>,

    #[arg(long)]
    pub maintenance_alerts: Option<bool>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotificationsCmd {
    List {
        #[arg(long)]
        unread: bool,
    },
    Clear,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

pub fn default_command(name: &str) -> Option<Command> {
    match name {
        "overview" => Some(Command::Overview),
        "properties" => Some(Command::Property {
            cmd: PropertyCmd::List(PropertyListArgs::default()),
        }),
        "tenants" => Some(Command::Tenant {
            cmd: TenantCmd::List(TenantListArgs::default()),
        }),
        "payments" => Some(Command::Payment {
            cmd: PaymentCmd::List(PaymentListArgs::default()),
        }),
        "maintenance" => Some(Command::Maintenance {
            cmd: MaintenanceCmd::List(MaintenanceListArgs::default()),
        }),
        "notifications" => Some(Command::Notifications {
            cmd: NotificationsCmd::List { unread: false },
        }),
        _ => None,
    }
}
