//! Load Generator
//!
//! Drives a live order book from many concurrent traders while a second
//! group of threads cancels what they place, then logs the resulting
//! summaries and the per-side metrics.

use crossbeam::channel::{self, Receiver, Sender};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use live_orderbook::metrics::MetricsReporter;
use live_orderbook::{LiveOrderBook, Order, OrderBookError, Side};

#[derive(Debug, Clone)]
struct SimulationConfig {
    traders: usize,
    cancellers: usize,
    orders_per_trader: usize,
    // Prices are spread across this many pence either side of the mid
    price_band: i64,
    mid_price_pence: i64,
    // Every n-th order placed is handed to the cancellers
    cancel_every: usize,
    report_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            traders: 8,
            cancellers: 2,
            orders_per_trader: 5_000,
            price_band: 25,
            mid_price_pence: 300,
            cancel_every: 2,
            report_interval: Duration::from_secs(1),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let prometheus = PrometheusBuilder::new().install_recorder()?;
    let config = SimulationConfig::default();

    info!("Starting load generator with {:?}", config);

    let book = Arc::new(LiveOrderBook::default());

    let reporter = MetricsReporter::new(Arc::clone(&book), config.report_interval);
    let reporter_task = tokio::spawn(async move {
        reporter.run().await;
    });

    let (tx, rx) = channel::bounded::<Order>(1_024);

    let mut cancellers = Vec::with_capacity(config.cancellers);
    for canceller_id in 0..config.cancellers {
        let book = Arc::clone(&book);
        let rx = rx.clone();
        cancellers.push(tokio::task::spawn_blocking(move || {
            cancel_orders(canceller_id, &book, rx)
        }));
    }
    drop(rx);

    let mut traders = Vec::with_capacity(config.traders);
    for trader_id in 0..config.traders {
        let book = Arc::clone(&book);
        let tx = tx.clone();
        let config = config.clone();
        traders.push(tokio::task::spawn_blocking(move || {
            place_orders(trader_id, &book, &config, tx)
        }));
    }
    drop(tx);

    let mut placed = 0;
    for trader in traders {
        placed += trader.await?;
    }
    let mut cancelled = 0;
    for canceller in cancellers {
        cancelled += canceller.await?;
    }

    reporter_task.abort();
    MetricsReporter::new(Arc::clone(&book), config.report_interval).report();

    info!(
        "Placed {} orders, cancelled {}, {} still live",
        placed,
        cancelled,
        book.total_orders()
    );

    for side in [Side::Sell, Side::Buy] {
        let summary = book.get_summary(side);
        info!("{} summary ({} levels)", side, summary.len());
        for line in summary.iter() {
            info!("  {}", line);
        }
    }

    debug!("Prometheus exposition:\n{}", prometheus.render());

    Ok(())
}

/// Place orders for one trader, forwarding some of them for cancellation
fn place_orders(
    trader_id: usize,
    book: &LiveOrderBook,
    config: &SimulationConfig,
    cancellations: Sender<Order>,
) -> usize {
    let user_id = format!("trader-{}", trader_id);
    let mut placed = 0;

    for i in 0..config.orders_per_trader {
        let side = if (trader_id + i) % 2 == 0 {
            Side::Buy
        } else {
            Side::Sell
        };

        // Buyers rest below the mid, sellers above it
        let offset = ((trader_id * 31 + i * 7) as i64) % config.price_band + 1;
        let pence = match side {
            Side::Buy => config.mid_price_pence - offset,
            Side::Sell => config.mid_price_pence + offset,
        };
        let price = Decimal::new(pence, 2);
        let quantity = Decimal::new(1 + (i % 50) as i64, 1);

        let order = match Order::new(Uuid::new_v4().to_string(), &user_id, quantity, price, side) {
            Ok(order) => order,
            Err(e) => {
                warn!("Trader {} built an invalid order: {}", trader_id, e);
                continue;
            }
        };

        match book.add_order(order.clone()) {
            Ok(()) => {
                placed += 1;
                if i % config.cancel_every == 0 && cancellations.send(order).is_err() {
                    warn!("Cancellers have stopped, trader {} keeps its orders", trader_id);
                }
            }
            Err(e) => warn!("Trader {} failed to add order: {}", trader_id, e),
        }
    }

    debug!("Trader {} finished after placing {} orders", trader_id, placed);
    placed
}

/// Cancel every order received until all traders hang up
fn cancel_orders(canceller_id: usize, book: &LiveOrderBook, orders: Receiver<Order>) -> usize {
    let mut cancelled = 0;

    for order in orders.iter() {
        match book.cancel_order(&order) {
            Ok(()) => cancelled += 1,
            Err(e @ OrderBookError::MissingLevel { .. }) => {
                tracing::error!("Canceller {} hit a broken book: {}", canceller_id, e)
            }
            Err(e) => warn!("Canceller {} failed to cancel: {}", canceller_id, e),
        }
    }

    debug!("Canceller {} finished after {} cancellations", canceller_id, cancelled);
    cancelled
}
