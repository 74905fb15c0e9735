//! Live Order Book
//!
//! A thread-safe, price-aggregated view of outstanding orders for one
//! instrument. Each side of the book sums the quantities of its live orders
//! per price and keeps a sorted, human-readable summary of those levels ready
//! for readers.
//!
//! # Features
//!
//! - **Exact arithmetic**: quantities and prices are `rust_decimal::Decimal`,
//!   rounded half-up to 1 and 2 decimal places respectively
//! - **Cached summaries**: the sorted summary is rebuilt on write, so reads
//!   are a reference-count bump
//! - **Atomic updates**: one reader/writer lock per side guards the level
//!   map, the order index and the summary together
//! - **Monitoring**: per-side counters, gauges and latency histograms through
//!   the `metrics` facade
//!
//! # Quick Start
//!
//! ```rust
//! use live_orderbook::{LiveOrderBook, Order, Side};
//! use rust_decimal_macros::dec;
//!
//! let book = LiveOrderBook::default();
//!
//! book.add_order(Order::new("1", "user1", dec!(2.5), dec!(2.99), Side::Sell)?)?;
//! book.add_order(Order::new("2", "user2", dec!(1.2), dec!(2.99), Side::Sell)?)?;
//!
//! assert_eq!(&book.get_summary(Side::Sell)[..], ["3.7 kg for £2.99"]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This is not a matching engine: buy and sell prices never cross and no
//! trades are produced. Nothing is persisted.

pub mod metrics;
pub mod orderbook;
pub mod utils;

// Re-export commonly used types
pub use orderbook::{
    error::{OrderBookError, OrderBookResult},
    types::{Order, OrderId, Price, Quantity, Side},
    BookSide, LiveOrderBook, Summary,
};

pub use metrics::SideMetrics;
