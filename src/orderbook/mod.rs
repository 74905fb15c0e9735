//! Live order book data structures
//!
//! Orders are aggregated by price into levels on each side of the book, and
//! each side keeps a pre-rendered, sorted summary of its levels for readers.

pub mod book;
pub mod book_side;
pub mod error;
pub mod price_level;
pub mod types;

// Re-export main types for convenience
pub use book::LiveOrderBook;
pub use book_side::{BookSide, BookSideStats, Summary};
pub use error::{OrderBookError, OrderBookResult};
pub use price_level::PriceLevel;
pub use types::{Order, OrderId, Price, PriceLevelInfo, Quantity, Side};
