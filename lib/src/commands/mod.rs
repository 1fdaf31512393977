pub mod fetch_price_history;
pub mod predict_prices;

pub use fetch_price_history::*;
pub use predict_prices::*;
