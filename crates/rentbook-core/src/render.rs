use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::{DateTime, Local, NaiveDate, Utc};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::model::{
    Currency, DateFormat, MaintenanceRequest, Notification, Payment, PaymentStanding,
    PaymentStatus, PlanTier, Priority, Property, Settings, Tenant,
};
use crate::stats::{MaintenanceStats, PaymentStats, PropertyStats, TenantStats};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    currency: Currency,
    date_format: DateFormat,
}

impl Renderer {
    pub fn new(cfg: &Config, settings: &Settings) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self {
            color,
            currency: settings.currency,
            date_format: settings.date_format,
        })
    }

    pub fn money(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = cents / 100;
        let fraction = cents % 100;

        let digits = whole.to_string();
        let mut grouped = String::new();
        for (i, ch) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let grouped: String = grouped.chars().rev().collect();

        format!("{sign}{}{grouped}.{fraction:02}", self.currency.symbol())
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(self.date_format.pattern()).to_string()
    }

    pub fn timestamp(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
    }

    #[tracing::instrument(skip(self, properties))]
    pub fn print_property_table(&mut self, properties: &[Property]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Type".to_string(),
            "Units".to_string(),
            "Occupancy".to_string(),
            "Income".to_string(),
            "Status".to_string(),
        ];

        let mut rows = Vec::with_capacity(properties.len());
        for property in properties {
            rows.push(vec![
                self.paint(&property.id.to_string(), "33"),
                property.name.clone(),
                property.kind.to_string(),
                property.units.to_string(),
                format!("{:.0}%", property.occupancy),
                self.money(property.monthly_income),
                property.status.to_string(),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, tenants, properties))]
    pub fn print_tenant_table(
        &mut self,
        tenants: &[Tenant],
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Email".to_string(),
            "Property".to_string(),
            "Rent".to_string(),
            "Lease end".to_string(),
            "Status".to_string(),
            "Payment".to_string(),
        ];

        let mut rows = Vec::with_capacity(tenants.len());
        for tenant in tenants {
            let property = tenant
                .property_id
                .map(|id| property_label(properties, id))
                .unwrap_or_default();
            let lease_end = tenant.lease_end.map(|d| self.date(d)).unwrap_or_default();
            let payment = match tenant.payment_status {
                PaymentStanding::Overdue => self.paint("overdue", "31"),
                other => other.to_string(),
            };

            rows.push(vec![
                self.paint(&tenant.id.to_string(), "33"),
                tenant.full_name(),
                tenant.email.clone(),
                property,
                self.money(tenant.monthly_rent),
                lease_end,
                tenant.status.to_string(),
                payment,
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, payments, tenants, properties))]
    pub fn print_payment_table(
        &mut self,
        payments: &[Payment],
        tenants: &[Tenant],
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Date".to_string(),
            "Tenant".to_string(),
            "Property".to_string(),
            "Amount".to_string(),
            "Method".to_string(),
            "Status".to_string(),
        ];

        let mut rows = Vec::with_capacity(payments.len());
        for payment in payments {
            let tenant = tenants
                .iter()
                .find(|t| t.id == payment.tenant_id)
                .map(|t| t.full_name())
                .unwrap_or_else(|| format!("#{}", payment.tenant_id));
            let status = match payment.status {
                PaymentStatus::Completed => self.paint("completed", "32"),
                PaymentStatus::Failed => self.paint("failed", "31"),
                other => other.to_string(),
            };

            rows.push(vec![
                self.paint(&payment.id.to_string(), "33"),
                self.date(payment.date),
                tenant,
                property_label(properties, payment.property_id),
                self.money(payment.amount),
                payment.method.clone(),
                status,
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, requests, properties))]
    pub fn print_maintenance_table(
        &mut self,
        requests: &[MaintenanceRequest],
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "Property".to_string(),
            "Priority".to_string(),
            "Status".to_string(),
            "Cost".to_string(),
            "Opened".to_string(),
        ];

        let mut rows = Vec::with_capacity(requests.len());
        for request in requests {
            let priority = match request.priority {
                Priority::Emergency => self.paint("emergency", "31"),
                Priority::High => self.paint("high", "33"),
                other => other.to_string(),
            };
            let cost = request
                .actual_cost
                .map(|c| self.money(c))
                .unwrap_or_else(|| format!("~{}", self.money(request.estimated_cost)));

            rows.push(vec![
                self.paint(&request.id.to_string(), "33"),
                request.title.clone(),
                property_label(properties, request.property_id),
                priority,
                request.status.to_string(),
                cost,
                self.date(request.added.date_naive()),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, notifications))]
    pub fn print_notification_table(
        &mut self,
        notifications: &[Notification],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "When".to_string(),
            "Category".to_string(),
            "Message".to_string(),
        ];

        let mut rows = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let message = if notification.read {
                notification.message.clone()
            } else {
                format!("* {}", notification.message)
            };
            rows.push(vec![
                self.timestamp(notification.created),
                notification.category.clone(),
                message,
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, property))]
    pub fn print_property_info(&mut self, property: &Property) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id          {}", property.id)?;
        writeln!(out, "name        {}", property.name)?;
        writeln!(out, "address     {}", property.address)?;
        if let (Some(lat), Some(lon)) = (property.latitude, property.longitude) {
            writeln!(out, "location    {lat:.5}, {lon:.5}")?;
        }
        writeln!(out, "type        {}", property.kind)?;
        writeln!(out, "units       {}", property.units)?;
        writeln!(out, "occupancy   {:.0}%", property.occupancy)?;
        writeln!(out, "income      {}", self.money(property.monthly_income))?;
        writeln!(out, "status      {}", property.status)?;
        if !property.description.is_empty() {
            writeln!(out, "description {}", property.description)?;
        }
        writeln!(out, "added       {}", self.timestamp(property.added))?;
        writeln!(out, "modified    {}", self.timestamp(property.modified))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, tenant, properties))]
    pub fn print_tenant_info(
        &mut self,
        tenant: &Tenant,
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id          {}", tenant.id)?;
        writeln!(out, "name        {}", tenant.full_name())?;
        writeln!(out, "email       {}", tenant.email)?;
        if let Some(property_id) = tenant.property_id {
            writeln!(out, "property    {}", property_label(properties, property_id))?;
        }
        writeln!(out, "rent        {}", self.money(tenant.monthly_rent))?;
        if let Some(start) = tenant.lease_start {
            writeln!(out, "lease start {}", self.date(start))?;
        }
        if let Some(end) = tenant.lease_end {
            writeln!(out, "lease end   {}", self.date(end))?;
        }
        writeln!(out, "status      {}", tenant.status)?;
        writeln!(out, "payment     {}", tenant.payment_status)?;
        writeln!(out, "added       {}", self.timestamp(tenant.added))?;
        writeln!(out, "modified    {}", self.timestamp(tenant.modified))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, payment, tenants, properties))]
    pub fn print_payment_info(
        &mut self,
        payment: &Payment,
        tenants: &[Tenant],
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let tenant = tenants
            .iter()
            .find(|t| t.id == payment.tenant_id)
            .map(|t| t.full_name())
            .unwrap_or_else(|| format!("#{}", payment.tenant_id));

        writeln!(out, "id          {}", payment.id)?;
        writeln!(out, "date        {}", self.date(payment.date))?;
        writeln!(out, "tenant      {tenant}")?;
        writeln!(out, "property    {}", property_label(properties, payment.property_id))?;
        writeln!(out, "amount      {}", self.money(payment.amount))?;
        writeln!(out, "status      {}", payment.status)?;
        writeln!(out, "method      {}", payment.method)?;
        if let Some(reference) = &payment.reference {
            writeln!(out, "reference   {reference}")?;
        }
        writeln!(out, "added       {}", self.timestamp(payment.added))?;
        writeln!(out, "modified    {}", self.timestamp(payment.modified))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, request, properties))]
    pub fn print_maintenance_info(
        &mut self,
        request: &MaintenanceRequest,
        properties: &[Property],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id          {}", request.id)?;
        writeln!(out, "title       {}", request.title)?;
        writeln!(out, "property    {}", property_label(properties, request.property_id))?;
        writeln!(out, "category    {}", request.category)?;
        writeln!(out, "priority    {}", request.priority)?;
        writeln!(out, "status      {}", request.status)?;
        writeln!(out, "estimate    {}", self.money(request.estimated_cost))?;
        if let Some(cost) = request.actual_cost {
            writeln!(out, "actual cost {}", self.money(cost))?;
        }
        if let Some(resolution) = &request.resolution {
            writeln!(out, "resolution  {resolution}")?;
        }
        if let Some(completed_at) = request.completed_at {
            writeln!(out, "completed   {}", self.timestamp(completed_at))?;
        }
        writeln!(out, "added       {}", self.timestamp(request.added))?;
        writeln!(out, "modified    {}", self.timestamp(request.modified))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, settings))]
    pub fn print_settings(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "name               {}", settings.profile.name)?;
        writeln!(out, "email              {}", settings.profile.email)?;
        writeln!(out, "currency           {}", settings.currency)?;
        writeln!(out, "date format        {}", settings.date_format)?;
        writeln!(out, "plan               {}", settings.plan)?;
        writeln!(
            out,
            "payment reminders  {}",
            on_off(settings.notifications.payment_reminders)
        )?;
        writeln!(
            out,
            "maintenance alerts {}",
            on_off(settings.notifications.maintenance_alerts)
        )?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn print_plans(&mut self, current: PlanTier) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "Plan".to_string(),
            "Price".to_string(),
            "Unit limit".to_string(),
            "Features".to_string(),
        ];

        let tiers = [
            PlanTier::Starter,
            PlanTier::Essential,
            PlanTier::Professional,
            PlanTier::Business,
            PlanTier::Enterprise,
        ];

        let mut rows = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let name = if tier == current {
                self.paint(&format!("{tier} (current)"), "32")
            } else {
                tier.to_string()
            };
            let limit = tier
                .unit_limit()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unlimited".to_string());
            rows.push(vec![
                name,
                format!("{}/mo", self.money(tier.monthly_price())),
                limit,
                tier.features().join(", "),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub fn print_overview(
        &mut self,
        properties: &PropertyStats,
        tenants: &TenantStats,
        payments: &PaymentStats,
        maintenance: &MaintenanceStats,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "{}", self.paint("Portfolio", "1"))?;
        writeln!(out, "  properties        {}", properties.total)?;
        writeln!(out, "  units             {}", properties.total_units)?;
        writeln!(out, "  occupancy         {:.0}%", properties.average_occupancy)?;
        writeln!(out, "  monthly income    {}", self.money(properties.monthly_income))?;

        writeln!(out, "{}", self.paint("Tenants", "1"))?;
        writeln!(
            out,
            "  active / pending / inactive   {} / {} / {}",
            tenants.active, tenants.pending, tenants.inactive
        )?;
        writeln!(out, "  overdue           {}", tenants.overdue)?;
        writeln!(out, "  average rent      {}", self.money(tenants.average_rent))?;
        writeln!(out, "  leases ending within 30 days  {}", tenants.leases_expiring_soon)?;

        writeln!(out, "{}", self.paint("Payments", "1"))?;
        writeln!(out, "  collected         {}", self.money(payments.collected))?;
        writeln!(out, "  outstanding       {}", self.money(payments.outstanding))?;
        writeln!(out, "  collection rate   {:.0}%", payments.collection_rate)?;
        writeln!(out, "  income growth     {:+.1}%", payments.income_growth)?;
        for (month, amount) in payments.monthly.iter().rev().take(6) {
            writeln!(out, "    {month}  {}", self.money(*amount))?;
        }

        writeln!(out, "{}", self.paint("Maintenance", "1"))?;
        writeln!(
            out,
            "  open / in progress / completed  {} / {} / {}",
            maintenance.open, maintenance.in_progress, maintenance.completed
        )?;
        writeln!(out, "  actual cost       {}", self.money(maintenance.actual_total))?;
        writeln!(
            out,
            "  avg days to completion  {:.1}",
            maintenance.average_days_to_completion
        )?;

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn property_label(properties: &[Property], id: u64) -> String {
    properties
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
