use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::model::{
    MaintenanceRequest, Notification, Payment, Property, Record, Settings, Tenant,
};

#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub properties_path: PathBuf,
    pub tenants_path: PathBuf,
    pub payments_path: PathBuf,
    pub maintenance_path: PathBuf,
    pub notifications_path: PathBuf,
    pub settings_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let properties_path = data_dir.join("properties.data");
        let tenants_path = data_dir.join("tenants.data");
        let payments_path = data_dir.join("payments.data");
        let maintenance_path = data_dir.join("maintenance.data");
        let notifications_path = data_dir.join("notifications.data");
        let settings_path = data_dir.join("settings.data");

        for path in [
            &properties_path,
            &tenants_path,
            &payments_path,
            &maintenance_path,
            &notifications_path,
            &settings_path,
        ] {
            if !path.exists() {
                fs::write(path, "")?;
            }
        }

        info!(
            data_dir = %data_dir.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            properties_path,
            tenants_path,
            payments_path,
            maintenance_path,
            notifications_path,
            settings_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_properties(&self) -> anyhow::Result<Vec<Property>> {
        load_jsonl(&self.properties_path).context("failed to load properties.data")
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn save_properties(&self, rows: &[Property]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.properties_path, rows).context("failed to save properties.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tenants(&self) -> anyhow::Result<Vec<Tenant>> {
        load_jsonl(&self.tenants_path).context("failed to load tenants.data")
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn save_tenants(&self, rows: &[Tenant]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.tenants_path, rows).context("failed to save tenants.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_payments(&self) -> anyhow::Result<Vec<Payment>> {
        load_jsonl(&self.payments_path).context("failed to load payments.data")
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn save_payments(&self, rows: &[Payment]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.payments_path, rows).context("failed to save payments.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_maintenance(&self) -> anyhow::Result<Vec<MaintenanceRequest>> {
        load_jsonl(&self.maintenance_path).context("failed to load maintenance.data")
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn save_maintenance(&self, rows: &[MaintenanceRequest]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.maintenance_path, rows).context("failed to save maintenance.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn load_notifications(&self) -> anyhow::Result<Vec<Notification>> {
        load_jsonl(&self.notifications_path).context("failed to load notifications.data")
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn save_notifications(&self, rows: &[Notification]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.notifications_path, rows)
            .context("failed to save notifications.data")
    }

    #[tracing::instrument(skip(self, message))]
    pub fn append_notification(
        &self,
        category: &str,
        message: String,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut rows = self.load_notifications()?;
        rows.push(Notification::new(category, message, now));
        self.save_notifications(&rows)
    }

    #[tracing::instrument(skip(self))]
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let raw = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("failed reading {}", self.settings_path.display()))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Settings::default());
        }

        match serde_json::from_str(trimmed) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                warn!(
                    file = %self.settings_path.display(),
                    error = %err,
                    "settings unreadable, falling back to defaults"
                );
                Ok(Settings::default())
            }
        }
    }

    #[tracing::instrument(skip(self, settings))]
    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let dir = self.settings_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        let serialized = serde_json::to_string(settings)?;
        writeln!(temp, "{serialized}")?;
        temp.flush()?;
        temp.persist(&self.settings_path).map_err(|err| {
            anyhow!("failed to persist {}: {}", self.settings_path.display(), err)
        })?;
        Ok(())
    }

    pub fn next_id<T: Record>(&self, rows: &[T]) -> u64 {
        rows.iter().map(Record::id).max().unwrap_or(0) + 1
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Corrupt lines degrade to missing records rather than a fatal error;
        // the rest of the file stays usable.
        match serde_json::from_str(trimmed) {
            Ok(record) => out.push(record),
            Err(err) => {
                warn!(
                    file = %path.display(),
                    line = idx + 1,
                    error = %err,
                    "skipping unreadable record"
                );
            }
        }
    }

    debug!(count = out.len(), "loaded records from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, rows))]
fn save_jsonl_atomic<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = rows.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for row in rows {
        let serialized = serde_json::to_string(row)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
