use std::time::Duration;

use log::*;
use order_engine::{db_types::Order, OrderLifecycleApi, SqliteDatabase};
use tokio::task::JoinHandle;

/// Starts the promotion worker. Do not await the returned JoinHandle, as it will run
/// indefinitely. A failed sweep is logged and the loop carries on to the next tick.
pub fn start_promotion_worker(db: SqliteDatabase, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        let api = OrderLifecycleApi::new(db);
        info!("🕰️ Pending order promotion worker started");
        loop {
            timer.tick().await;
            debug!("🕰️ Running pending order promotion job");
            match api.promote_pending().await {
                Ok(promoted) if promoted.is_empty() => debug!("🕰️ No pending orders found"),
                Ok(promoted) => {
                    info!("🕰️ Promoted {} orders to Processing", promoted.len());
                    debug!("🕰️ Promoted orders: {}", order_list(&promoted));
                },
                Err(e) => {
                    error!("🕰️ Error running pending order promotion job: {e}");
                },
            }
        }
    })
}

fn order_list(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|o| format!("[{}] customer: {}", o.id, o.customer_email))
        .collect::<Vec<String>>()
        .join(", ")
}
