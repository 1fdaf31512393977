pub mod commands;
pub mod config;
pub mod forecaster;
pub mod scaler;
pub mod utils;

mod forecast_model;
mod market_data;
mod plotter;
mod storage;

pub use forecast_model::*;
pub use market_data::*;
pub use plotter::*;
pub use storage::*;
pub use scaler::MinMaxScaler;
pub use utils::WindowedDataset;
