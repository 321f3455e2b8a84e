use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::cli::NotificationsCmd;
use crate::datastore::DataStore;
use crate::render::Renderer;
use crate::stats::{maintenance_stats, payment_stats, property_stats, tenant_stats};

#[instrument(skip(store, renderer, now))]
pub(crate) fn overview(
    store: &mut DataStore,
    renderer: &mut Renderer,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command overview");

    let properties = store.load_properties()?;
    let tenants = store.load_tenants()?;
    let payments = store.load_payments()?;
    let maintenance = store.load_maintenance()?;
    let today = now.date_naive();

    renderer.print_overview(
        &property_stats(&properties),
        &tenant_stats(&tenants, today),
        &payment_stats(&payments, today),
        &maintenance_stats(&maintenance),
    )?;
    Ok(())
}

#[instrument(skip(store, renderer, cmd))]
pub(crate) fn notifications(
    store: &mut DataStore,
    renderer: &mut Renderer,
    cmd: NotificationsCmd,
) -> anyhow::Result<()> {
    match cmd {
        NotificationsCmd::List { unread } => {
            info!("command notifications list");

            let mut rows = store.load_notifications()?;
            if unread {
                rows.retain(|n| !n.read);
            }
            rows.sort_by_key(|n| n.created);
            renderer.print_notification_table(&rows)?;

            // listing counts as reading
            let mut all = store.load_notifications()?;
            let mut changed = false;
            for notification in &mut all {
                if !notification.read {
                    notification.read = true;
                    changed = true;
                }
            }
            if changed {
                store.save_notifications(&all)?;
            }
            Ok(())
        }
        NotificationsCmd::Clear => {
            info!("command notifications clear");

            let count = store.load_notifications()?.len();
            store.save_notifications(&[])?;
            println!("Cleared {count} notification(s).");
            Ok(())
        }
    }
}
