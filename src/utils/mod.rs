use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for quantities (kilograms)
pub const QUANTITY_SCALE: u32 = 1;
/// Decimal places kept for prices (pounds)
pub const PRICE_SCALE: u32 = 2;

/// Round a quantity half-up to one decimal place
pub fn round_quantity(quantity: Decimal) -> Decimal {
    round_to_scale(quantity, QUANTITY_SCALE)
}

/// Round a price half-up to two decimal places
pub fn round_price(price: Decimal) -> Decimal {
    round_to_scale(price, PRICE_SCALE)
}

// Rescale after rounding so that 2.8 renders as "2.80" rather than "2.8".
fn round_to_scale(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Render one summary line, e.g. "3.7 kg for £2.99"
pub fn format_level(quantity: Decimal, price: Decimal) -> String {
    format!("{} kg for £{}", round_quantity(quantity), round_price(price))
}
