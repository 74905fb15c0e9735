use rust_decimal::Decimal;
use tracing::error;

use crate::orderbook::error::{OrderBookError, OrderBookResult};
use crate::orderbook::types::{Order, Price, Quantity};
use crate::utils::{round_price, round_quantity, QUANTITY_SCALE};

/// Summed quantity of all live orders at one price.
///
/// Not synchronized: the owning `BookSide` serializes every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price: round_price(price),
            quantity: round_quantity(Decimal::ZERO),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Get total quantity at this price level
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Add the order's quantity to this level.
    ///
    /// Fails without touching the level if the total no longer fits at one
    /// decimal place.
    pub fn add_order(&mut self, order: &Order) -> OrderBookResult<()> {
        self.validate_price(order)?;

        match self.quantity.checked_add(order.level_quantity()) {
            Some(total) if total.scale() == QUANTITY_SCALE => {
                self.quantity = total;
                Ok(())
            }
            _ => Err(OrderBookError::InvalidOrder(format!(
                "quantity {} of order {} overflows the {} kg held at £{}",
                order.level_quantity(),
                order.order_id(),
                self.quantity,
                self.price
            ))),
        }
    }

    /// Remove the order's quantity from this level.
    ///
    /// Fails without touching the level if that would leave it negative.
    pub fn remove_order(&mut self, order: &Order) -> OrderBookResult<()> {
        self.validate_price(order)?;

        let order_quantity = order.level_quantity();
        if order_quantity > self.quantity {
            return Err(OrderBookError::InvalidOrder(format!(
                "quantity {} of order {} exceeds the {} kg held at £{}",
                order_quantity,
                order.order_id(),
                self.quantity,
                self.price
            )));
        }

        self.quantity -= order_quantity;
        Ok(())
    }

    fn validate_price(&self, order: &Order) -> OrderBookResult<()> {
        if order.level_price() != self.price {
            error!(
                "Order {} at £{} does not belong to the £{} level",
                order.order_id(),
                order.level_price(),
                self.price
            );
            return Err(OrderBookError::InvalidOrder(format!(
                "order {} priced £{} applied to the £{} level",
                order.order_id(),
                order.level_price(),
                self.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::types::Side;
    use rust_decimal_macros::dec;

    fn create_test_order(id: &str, quantity: Decimal, price: Decimal) -> Order {
        Order::new(id, "user1", quantity, price, Side::Sell).unwrap()
    }

    #[test]
    fn test_new_level_is_empty() {
        let level = PriceLevel::new(dec!(2.8));

        assert_eq!(level.price().to_string(), "2.80");
        assert_eq!(level.quantity(), dec!(0.0));
        assert!(level.is_empty());
    }

    #[test]
    fn test_add_orders() {
        let mut level = PriceLevel::new(dec!(2.99));

        level.add_order(&create_test_order("1", dec!(2.5), dec!(2.99))).unwrap();
        level.add_order(&create_test_order("3", dec!(1.2), dec!(2.99))).unwrap();

        assert_eq!(level.quantity(), dec!(3.7));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_add_rounds_quantity() {
        let mut level = PriceLevel::new(dec!(1.00));

        level.add_order(&create_test_order("1", dec!(1.25), dec!(1.00))).unwrap();
        level.add_order(&create_test_order("2", dec!(1.24), dec!(1.00))).unwrap();

        assert_eq!(level.quantity(), dec!(2.5));
    }

    #[test]
    fn test_wrong_price_rejected() {
        let mut level = PriceLevel::new(dec!(2.50));

        // 2.505 rounds half-up to 2.51
        let result = level.add_order(&create_test_order("1", dec!(1.0), dec!(2.505)));
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));

        // 2.504 rounds down onto this level
        level.add_order(&create_test_order("2", dec!(1.0), dec!(2.504))).unwrap();
        assert_eq!(level.quantity(), dec!(1.0));

        let result = level.remove_order(&create_test_order("2", dec!(1.0), dec!(2.51)));
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
        assert_eq!(level.quantity(), dec!(1.0));
    }

    #[test]
    fn test_remove_order() {
        let mut level = PriceLevel::new(dec!(2.99));
        let order1 = create_test_order("1", dec!(2.5), dec!(2.99));
        let order3 = create_test_order("3", dec!(1.2), dec!(2.99));

        level.add_order(&order1).unwrap();
        level.add_order(&order3).unwrap();

        level.remove_order(&order3).unwrap();
        assert_eq!(level.quantity(), dec!(2.5));

        level.remove_order(&order1).unwrap();
        assert_eq!(level.quantity(), dec!(0.0));
        assert!(level.is_empty());
    }

    #[test]
    fn test_remove_too_much_rejected() {
        let mut level = PriceLevel::new(dec!(2.99));
        level.add_order(&create_test_order("1", dec!(2.5), dec!(2.99))).unwrap();

        let result = level.remove_order(&create_test_order("2", dec!(2.6), dec!(2.99)));
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
        assert_eq!(level.quantity(), dec!(2.5));
    }

    #[test]
    fn test_add_overflow_rejected() {
        let mut level = PriceLevel::new(dec!(1.00));
        let big = dec!(7000000000000000000000000000.0);

        level.add_order(&create_test_order("a", big, dec!(1.00))).unwrap();

        let result = level.add_order(&create_test_order("b", big, dec!(1.00)));
        assert!(matches!(result, Err(OrderBookError::InvalidOrder(_))));
        assert_eq!(level.quantity(), big);
        assert_eq!(level.quantity().scale(), QUANTITY_SCALE);
    }
}
