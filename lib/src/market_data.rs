use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct PricePoint {
    pub date : NaiveDate,
    pub close : f32
}

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Display, EnumString, Deserialize, Serialize)]
pub enum HistoryRange {
    #[strum(to_string = "Month1", serialize = "1mo")]
    Month1,
    #[strum(to_string = "Month3", serialize = "3mo")]
    Month3,
    #[strum(to_string = "Month6", serialize = "6mo")]
    Month6,
    #[strum(to_string = "Year1", serialize = "1y")]
    Year1,
    #[strum(to_string = "Year2", serialize = "2y")]
    Year2,
    #[strum(to_string = "Year5", serialize = "5y")]
    Year5,
    #[strum(to_string = "Max", serialize = "max")]
    Max
}

impl HistoryRange {
    pub fn as_query_param(&self) -> &'static str {
        match self {
            HistoryRange::Month1 => "1mo",
            HistoryRange::Month3 => "3mo",
            HistoryRange::Month6 => "6mo",
            HistoryRange::Year1 => "1y",
            HistoryRange::Year2 => "2y",
            HistoryRange::Year5 => "5y",
            HistoryRange::Max => "max"
        }
    }
}

impl Default for HistoryRange {
    fn default() -> Self {
        HistoryRange::Year1
    }
}

/// Daily closes of one symbol, oldest first.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct PriceHistory {
    pub symbol : String,
    pub range : HistoryRange,
    pub points : Vec<PricePoint>
}

impl PriceHistory {
    pub fn closes(&self) -> Vec<f32> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

#[cfg_attr(test, automock)]
pub trait MarketDataService {
    fn get_daily_closes(&mut self, symbol : &str, range : HistoryRange) -> anyhow::Result<Vec<PricePoint>>;
}
