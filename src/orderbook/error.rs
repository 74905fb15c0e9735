use serde::{Deserialize, Serialize};
use std::fmt;

use crate::orderbook::types::{OrderId, Price, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBookError {
    /// Order failed validation or does not fit the level it was applied to
    InvalidOrder(String),

    /// Order id is already live on this side
    DuplicateOrder(OrderId),

    /// Order id was never submitted or has already been cancelled
    UnknownOrder(OrderId),

    /// A live order has no price level. The book's invariants are broken.
    MissingLevel { order_id: OrderId, price: Price },

    /// A book side was wired to the wrong slot of a two-sided book
    SideMismatch { expected: Side, actual: Side },
}

impl OrderBookError {
    /// True for faults that indicate a defect rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, OrderBookError::MissingLevel { .. })
    }
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidOrder(msg) => write!(f, "Invalid order: {}", msg),
            OrderBookError::DuplicateOrder(id) => {
                write!(f, "Order has been previously submitted: {}", id)
            }
            OrderBookError::UnknownOrder(id) => write!(
                f,
                "Order could not be found, or was previously cancelled: {}",
                id
            ),
            OrderBookError::MissingLevel { order_id, price } => write!(
                f,
                "Price level {} could not be found for order {}",
                price, order_id
            ),
            OrderBookError::SideMismatch { expected, actual } => write!(
                f,
                "Expected a {} book side but was given a {} one",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for OrderBookError {}

/// Result type for order book operations
pub type OrderBookResult<T> = Result<T, OrderBookError>;
