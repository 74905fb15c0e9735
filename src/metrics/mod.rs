use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::orderbook::types::Side;
use crate::orderbook::LiveOrderBook;

/// Metrics collector for one side of the book
#[derive(Debug)]
pub struct SideMetrics {
    side: &'static str,

    // Latency tracking
    add_order_latency: LatencyTracker,
    cancel_order_latency: LatencyTracker,

    // Throughput counters
    orders_added: AtomicU64,
    orders_cancelled: AtomicU64,
    orders_rejected: AtomicU64,

    // Book state
    live_orders: AtomicU64,
    price_levels: AtomicU64,
}

impl SideMetrics {
    pub fn new(side: Side) -> Self {
        describe_counter!("orderbook_orders_total", "Orders accepted per operation");
        describe_counter!(
            "orderbook_rejections_total",
            "Add or cancel requests that failed"
        );
        describe_histogram!(
            "orderbook_operation_duration_seconds",
            "Duration of order book operations"
        );
        describe_gauge!("orderbook_levels_total", "Number of price levels in the book");
        describe_gauge!("orderbook_orders_current", "Current number of orders in the book");

        Self {
            side: side.as_str(),
            add_order_latency: LatencyTracker::new("add_order", side.as_str()),
            cancel_order_latency: LatencyTracker::new("cancel_order", side.as_str()),
            orders_added: AtomicU64::new(0),
            orders_cancelled: AtomicU64::new(0),
            orders_rejected: AtomicU64::new(0),
            live_orders: AtomicU64::new(0),
            price_levels: AtomicU64::new(0),
        }
    }

    // Latency measurement methods
    pub fn time_add_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.add_order_latency.time(f)
    }

    pub fn time_cancel_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.cancel_order_latency.time(f)
    }

    // Counter methods
    pub fn increment_orders_added(&self) {
        self.orders_added.fetch_add(1, Ordering::Relaxed);
        counter!("orderbook_orders_total", "operation" => "add", "side" => self.side).increment(1);
    }

    pub fn increment_orders_cancelled(&self) {
        self.orders_cancelled.fetch_add(1, Ordering::Relaxed);
        counter!("orderbook_orders_total", "operation" => "cancel", "side" => self.side)
            .increment(1);
    }

    pub fn increment_orders_rejected(&self, operation: &'static str) {
        self.orders_rejected.fetch_add(1, Ordering::Relaxed);
        counter!("orderbook_rejections_total", "operation" => operation, "side" => self.side)
            .increment(1);
    }

    // Gauge methods
    pub fn set_book_state(&self, live_orders: usize, price_levels: usize) {
        self.live_orders.store(live_orders as u64, Ordering::Relaxed);
        self.price_levels.store(price_levels as u64, Ordering::Relaxed);
        gauge!("orderbook_orders_current", "side" => self.side).set(live_orders as f64);
        gauge!("orderbook_levels_total", "side" => self.side).set(price_levels as f64);
    }

    // Getters for current values
    pub fn get_orders_added(&self) -> u64 {
        self.orders_added.load(Ordering::Relaxed)
    }

    pub fn get_orders_cancelled(&self) -> u64 {
        self.orders_cancelled.load(Ordering::Relaxed)
    }

    pub fn get_orders_rejected(&self) -> u64 {
        self.orders_rejected.load(Ordering::Relaxed)
    }

    pub fn get_live_orders(&self) -> u64 {
        self.live_orders.load(Ordering::Relaxed)
    }

    pub fn get_price_levels(&self) -> u64 {
        self.price_levels.load(Ordering::Relaxed)
    }

    pub fn get_latency_stats(&self) -> LatencyStats {
        LatencyStats {
            add_order: self.add_order_latency.get_stats(),
            cancel_order: self.cancel_order_latency.get_stats(),
        }
    }
}

/// Latency tracker for individual operations
#[derive(Debug)]
struct LatencyTracker {
    operation: &'static str,
    side: &'static str,
    samples: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl LatencyTracker {
    fn new(operation: &'static str, side: &'static str) -> Self {
        Self {
            operation,
            side,
            samples: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
        }
    }

    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record_latency(start.elapsed());
        result
    }

    fn record_latency(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;

        self.samples.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);

        histogram!(
            "orderbook_operation_duration_seconds",
            "operation" => self.operation,
            "side" => self.side
        )
        .record(duration.as_secs_f64());
    }

    fn get_stats(&self) -> OperationLatencyStats {
        let samples = self.samples.load(Ordering::Relaxed);
        let total = self.total_nanos.load(Ordering::Relaxed);
        let min = self.min_nanos.load(Ordering::Relaxed);
        let max = self.max_nanos.load(Ordering::Relaxed);

        let avg = if samples > 0 { total / samples } else { 0 };

        OperationLatencyStats {
            operation: self.operation,
            samples,
            avg_nanos: avg,
            min_nanos: if min == u64::MAX { 0 } else { min },
            max_nanos: max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub add_order: OperationLatencyStats,
    pub cancel_order: OperationLatencyStats,
}

#[derive(Debug, Clone)]
pub struct OperationLatencyStats {
    pub operation: &'static str,
    pub samples: u64,
    pub avg_nanos: u64,
    pub min_nanos: u64,
    pub max_nanos: u64,
}

impl OperationLatencyStats {
    pub fn avg_micros(&self) -> f64 {
        self.avg_nanos as f64 / 1_000.0
    }

    pub fn min_micros(&self) -> f64 {
        self.min_nanos as f64 / 1_000.0
    }

    pub fn max_micros(&self) -> f64 {
        self.max_nanos as f64 / 1_000.0
    }
}

/// Background metrics reporter
pub struct MetricsReporter {
    book: Arc<LiveOrderBook>,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(book: Arc<LiveOrderBook>, interval: Duration) -> Self {
        Self { book, interval }
    }

    /// Log one line per side
    pub fn report(&self) {
        for side in [Side::Buy, Side::Sell] {
            let metrics = self.book.side(side).metrics();
            let stats = metrics.get_latency_stats();

            info!(
                "{} side - Orders: +{} -{} rejected {} | Live: {} in {} levels | Latency (μs): add={:.2} cancel={:.2}",
                side,
                metrics.get_orders_added(),
                metrics.get_orders_cancelled(),
                metrics.get_orders_rejected(),
                metrics.get_live_orders(),
                metrics.get_price_levels(),
                stats.add_order.avg_micros(),
                stats.cancel_order.avg_micros()
            );
        }
    }

    pub async fn run(&self) {
        let mut interval = interval(self.interval);

        loop {
            interval.tick().await;
            self.report();
        }
    }
}
