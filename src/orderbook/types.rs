use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::utils::{round_price, round_quantity, PRICE_SCALE, QUANTITY_SCALE};

pub type OrderId = String;
pub type Price = Decimal; // GBP per kilogram
pub type Quantity = Decimal; // Kilograms

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Lower-case label used when tagging metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// An order as submitted by a user.
///
/// Orders can only be placed and cancelled, never amended: to change an
/// order, cancel it and place a new one. Two orders are equal when their
/// identifiers are equal, whatever their other fields hold.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    order_id: OrderId,
    user_id: String,
    quantity: Quantity,
    price: Price,
    side: Side,
}

impl Order {
    pub fn new(
        order_id: impl Into<OrderId>,
        user_id: impl Into<String>,
        quantity: Quantity,
        price: Price,
        side: Side,
    ) -> OrderBookResult<Self> {
        let order_id = order_id.into();
        let user_id = user_id.into();

        if order_id.trim().is_empty() {
            return Err(OrderBookError::InvalidOrder("missing order id".to_string()));
        }
        if user_id.trim().is_empty() {
            return Err(OrderBookError::InvalidOrder(format!(
                "missing user id for order {}",
                order_id
            )));
        }
        if quantity <= Decimal::ZERO || round_quantity(quantity).is_zero() {
            return Err(OrderBookError::InvalidOrder(format!(
                "invalid quantity {} for order {}: must be at least 0.1",
                quantity, order_id
            )));
        }
        if price <= Decimal::ZERO || round_price(price).is_zero() {
            return Err(OrderBookError::InvalidOrder(format!(
                "invalid price {} for order {}: must be at least 0.01",
                price, order_id
            )));
        }

        // Values too large to carry their decimal places cannot be aggregated
        if round_quantity(quantity).scale() != QUANTITY_SCALE {
            return Err(OrderBookError::InvalidOrder(format!(
                "quantity {} for order {} is too large",
                quantity, order_id
            )));
        }
        if round_price(price).scale() != PRICE_SCALE {
            return Err(OrderBookError::InvalidOrder(format!(
                "price {} for order {} is too large",
                price, order_id
            )));
        }

        Ok(Self {
            order_id,
            user_id,
            quantity,
            price,
            side,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Quantity exactly as submitted
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Price exactly as submitted
    pub fn price(&self) -> Price {
        self.price
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Quantity at the precision levels aggregate with (1 dp, half-up)
    pub fn level_quantity(&self) -> Quantity {
        round_quantity(self.quantity)
    }

    /// Price at the precision levels are keyed on (2 dp, half-up)
    pub fn level_price(&self) -> Price {
        round_price(self.price)
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {} [user {}] {} {} kg @ £{}",
            self.order_id, self.user_id, self.side, self.quantity, self.price
        )
    }
}

/// Aggregated quantity at one price, as exposed to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn test_order_creation() {
        let order = Order::new("1", "user1", dec!(2.5), dec!(2.99), Side::Sell).unwrap();

        assert_eq!(order.order_id(), "1");
        assert_eq!(order.user_id(), "user1");
        assert_eq!(order.quantity(), dec!(2.5));
        assert_eq!(order.price(), dec!(2.99));
        assert_eq!(order.side(), Side::Sell);
    }

    #[test]
    fn test_missing_identifiers() {
        let result = Order::new("", "user1", dec!(1.0), dec!(1.00), Side::Buy);
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        let result = Order::new("1", "  ", dec!(1.0), dec!(1.00), Side::Buy);
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
    }

    #[test]
    fn test_non_positive_quantity_and_price() {
        for quantity in [dec!(0), dec!(-1.5)] {
            let result = Order::new("1", "user1", quantity, dec!(1.00), Side::Buy);
            assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
        }
        for price in [dec!(0), dec!(-0.01)] {
            let result = Order::new("1", "user1", dec!(1.0), price, Side::Buy);
            assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
        }
    }

    #[test]
    fn test_values_rounding_to_zero_are_rejected() {
        let result = Order::new("1", "user1", dec!(0.04), dec!(1.00), Side::Buy);
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        let result = Order::new("1", "user1", dec!(1.0), dec!(0.004), Side::Buy);
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        // 0.05 rounds half-up to 0.1
        assert!(Order::new("1", "user1", dec!(0.05), dec!(0.005), Side::Buy).is_ok());
    }

    #[test]
    fn test_values_too_large_for_scale_are_rejected() {
        let result = Order::new(
            "1",
            "user1",
            dec!(50000000000000000000000000000),
            dec!(1.00),
            Side::Sell,
        );
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        let result = Order::new(
            "1",
            "user1",
            dec!(1.0),
            dec!(5000000000000000000000000000),
            Side::Sell,
        );
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        assert!(Order::new(
            "1",
            "user1",
            dec!(7000000000000000000000000000.0),
            dec!(1.00),
            Side::Sell
        )
        .is_ok());
    }

    #[test]
    fn test_level_values_are_rounded() {
        let order = Order::new("1", "user1", dec!(1.25), dec!(2.505), Side::Buy).unwrap();

        assert_eq!(order.level_quantity(), dec!(1.3));
        assert_eq!(order.level_price(), dec!(2.51));
        assert_eq!(order.level_price().to_string(), "2.51");
    }

    #[test]
    fn test_identity_is_order_id() {
        let a = Order::new("7", "user1", dec!(1.0), dec!(1.00), Side::Buy).unwrap();
        let b = Order::new("7", "user2", dec!(9.9), dec!(3.33), Side::Sell).unwrap();
        let c = Order::new("8", "user1", dec!(1.0), dec!(1.00), Side::Buy).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Order> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.as_str(), "sell");
    }
}
