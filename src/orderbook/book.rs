use tracing::debug;

use crate::orderbook::book_side::{BookSide, Summary};
use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::types::{Order, Side};

/// Live order book holding one `BookSide` per side.
///
/// Does no aggregation of its own: every call is routed to the side named
/// by the order (or by the caller, for summaries).
#[derive(Debug)]
pub struct LiveOrderBook {
    sell_side: BookSide,
    buy_side: BookSide,
}

impl LiveOrderBook {
    pub fn new(sell_side: BookSide, buy_side: BookSide) -> OrderBookResult<Self> {
        if sell_side.side() != Side::Sell {
            return Err(OrderBookError::SideMismatch {
                expected: Side::Sell,
                actual: sell_side.side(),
            });
        }
        if buy_side.side() != Side::Buy {
            return Err(OrderBookError::SideMismatch {
                expected: Side::Buy,
                actual: buy_side.side(),
            });
        }

        Ok(Self {
            sell_side,
            buy_side,
        })
    }

    pub fn add_order(&self, order: Order) -> OrderBookResult<()> {
        debug!("Routing add of order {} to {} side", order.order_id(), order.side());
        self.side(order.side()).add_order(order)
    }

    pub fn cancel_order(&self, order: &Order) -> OrderBookResult<()> {
        debug!("Routing cancel of order {} to {} side", order.order_id(), order.side());
        self.side(order.side()).cancel_order(order)
    }

    /// Summary sorted ascending by price for sell, descending for buy
    pub fn get_summary(&self, side: Side) -> Summary {
        self.side(side).get_summary()
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Sell => &self.sell_side,
            Side::Buy => &self.buy_side,
        }
    }

    /// Get total number of live orders on both sides
    pub fn total_orders(&self) -> usize {
        self.sell_side.order_count() + self.buy_side.order_count()
    }
}

impl Default for LiveOrderBook {
    fn default() -> Self {
        Self {
            sell_side: BookSide::new(Side::Sell),
            buy_side: BookSide::new(Side::Buy),
        }
    }
}
