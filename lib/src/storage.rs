use crate::market_data::*;

#[cfg(test)]
use mockall::{automock};

#[cfg_attr(test, automock)]
pub trait Storage {
    fn save_price_history(&mut self, name : &str, history : &PriceHistory) -> anyhow::Result<()>;
    fn load_price_history(&mut self, name : &str) -> anyhow::Result<PriceHistory>;
}
