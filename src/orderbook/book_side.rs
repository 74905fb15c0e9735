use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::metrics::SideMetrics;
use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::price_level::PriceLevel;
use crate::orderbook::types::{Order, OrderId, Price, PriceLevelInfo, Quantity, Side};
use crate::utils::{format_level, round_price};

/// Rendered summary lines, best price first.
///
/// Shared between the book and every reader; `Arc<[String]>` hands out no
/// `&mut` access while the book holds its copy, so a snapshot cannot change.
pub type Summary = Arc<[String]>;

/// One side (buy or sell) of a live order book.
///
/// Orders placed on the side are aggregated into price levels keyed by the
/// order's price rounded to two decimal places. A sorted, formatted summary of
/// those levels is rebuilt on every successful add or cancel so that
/// [`BookSide::get_summary`] only has to hand out the cached copy.
///
/// The level map, the order index and the summary live behind a single
/// reader/writer lock. Writers hold it exclusively for the whole update,
/// summary rebuild included, so readers only ever see fully applied writes.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    state: RwLock<SideState>,
    metrics: SideMetrics,
}

#[derive(Debug)]
struct SideState {
    // Price -> aggregated level. BTreeMap keeps the keys ordered for the summary.
    levels: BTreeMap<Price, PriceLevel>,

    // Live orders by id
    orders: HashMap<OrderId, Order>,

    summary: Summary,
}

impl SideState {
    fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            orders: HashMap::new(),
            summary: Arc::from(Vec::new()),
        }
    }

    fn rebuild_summary(&mut self, side: Side) {
        let lines = self
            .levels
            .values()
            .map(|level| format_level(level.quantity(), level.price()));

        self.summary = match side {
            Side::Sell => lines.collect(),
            Side::Buy => lines.rev().collect(),
        };
    }
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        info!("Creating new {} book side", side);

        Self {
            side,
            state: RwLock::new(SideState::new()),
            metrics: SideMetrics::new(side),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Place an order on this side.
    ///
    /// Adding is not idempotent: an order id that is already live is rejected
    /// with [`OrderBookError::DuplicateOrder`] and the book is left untouched.
    pub fn add_order(&self, order: Order) -> OrderBookResult<()> {
        debug!("Adding order to {} side: {}", self.side, order);

        let result = self.metrics.time_add_order(|| -> OrderBookResult<()> {
            let mut state = self.state.write();
            let state = &mut *state;

            if state.orders.contains_key(order.order_id()) {
                warn!("Order has been previously submitted: {}", order);
                return Err(OrderBookError::DuplicateOrder(order.order_id().to_string()));
            }

            let price = order.level_price();
            match state.levels.get_mut(&price) {
                Some(level) => level.add_order(&order)?,
                None => {
                    let mut level = PriceLevel::new(price);
                    level.add_order(&order)?;
                    state.levels.insert(price, level);
                }
            }
            state.orders.insert(order.order_id().to_string(), order);

            state.rebuild_summary(self.side);
            self.metrics
                .set_book_state(state.orders.len(), state.levels.len());
            Ok(())
        });

        match &result {
            Ok(()) => self.metrics.increment_orders_added(),
            Err(_) => self.metrics.increment_orders_rejected("add"),
        }
        result
    }

    /// Cancel a live order.
    ///
    /// The order is matched by id only; the price and quantity removed from
    /// the book are those of the order that was originally placed. Cancelling
    /// is not idempotent: an id that was never placed, or was already
    /// cancelled, fails with [`OrderBookError::UnknownOrder`].
    pub fn cancel_order(&self, order: &Order) -> OrderBookResult<()> {
        debug!("Cancelling order on {} side: {}", self.side, order);

        let result = self.metrics.time_cancel_order(|| -> OrderBookResult<()> {
            let mut state = self.state.write();
            let state = &mut *state;

            let Some(live) = state.orders.get(order.order_id()) else {
                warn!("Order could not be found, or was previously cancelled: {}", order);
                return Err(OrderBookError::UnknownOrder(order.order_id().to_string()));
            };

            let price = live.level_price();
            let Some(level) = state.levels.get_mut(&price) else {
                error!("Price level could not be found for order: {}", live);
                return Err(OrderBookError::MissingLevel {
                    order_id: live.order_id().to_string(),
                    price,
                });
            };

            // Only fallible mutation; nothing has changed if it fails
            level.remove_order(live)?;
            if level.is_empty() {
                state.levels.remove(&price);
            }
            state.orders.remove(order.order_id());

            state.rebuild_summary(self.side);
            self.metrics
                .set_book_state(state.orders.len(), state.levels.len());
            Ok(())
        });

        match &result {
            Ok(()) => self.metrics.increment_orders_cancelled(),
            Err(_) => self.metrics.increment_orders_rejected("cancel"),
        }
        result
    }

    /// Summary lines, one per price level: ascending by price for the sell
    /// side and descending for the buy side.
    ///
    /// Returns the snapshot built by the last completed write. Nothing is
    /// recomputed here.
    pub fn get_summary(&self) -> Summary {
        Arc::clone(&self.state.read().summary)
    }

    pub fn order_count(&self) -> usize {
        self.state.read().orders.len()
    }

    pub fn level_count(&self) -> usize {
        self.state.read().levels.len()
    }

    pub fn contains_order(&self, order_id: &str) -> bool {
        self.state.read().orders.contains_key(order_id)
    }

    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.state.read().orders.get(order_id).cloned()
    }

    /// Aggregated quantity at a price, after rounding the price to 2 dp
    pub fn level_quantity(&self, price: Price) -> Option<Quantity> {
        self.state
            .read()
            .levels
            .get(&round_price(price))
            .map(PriceLevel::quantity)
    }

    /// Sum of quantities across every level on this side, or `None` if the
    /// total does not fit in a `Decimal`
    pub fn total_quantity(&self) -> Option<Quantity> {
        sum_levels(&self.state.read().levels)
    }

    /// Levels in summary order, as structured values rather than text
    pub fn depth(&self) -> Vec<PriceLevelInfo> {
        let state = self.state.read();
        let levels = state.levels.values().map(|level| PriceLevelInfo {
            price: level.price(),
            quantity: level.quantity(),
        });

        match self.side {
            Side::Sell => levels.collect(),
            Side::Buy => levels.rev().collect(),
        }
    }

    pub fn stats(&self) -> BookSideStats {
        let state = self.state.read();

        BookSideStats {
            side: self.side,
            total_orders: state.orders.len(),
            price_levels: state.levels.len(),
            total_quantity: sum_levels(&state.levels),
            best_price: match self.side {
                Side::Sell => state.levels.keys().next().copied(),
                Side::Buy => state.levels.keys().next_back().copied(),
            },
        }
    }

    pub fn metrics(&self) -> &SideMetrics {
        &self.metrics
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSideStats {
    pub side: Side,
    pub total_orders: usize,
    pub price_levels: usize,
    pub total_quantity: Option<Decimal>,
    pub best_price: Option<Price>,
}

fn sum_levels(levels: &BTreeMap<Price, PriceLevel>) -> Option<Quantity> {
    levels
        .values()
        .try_fold(Decimal::ZERO, |total, level| total.checked_add(level.quantity()))
}
