use forecast_lib;
use forecast_lib::HistoryRange;
use forecast_lib::commands::{self, PredictionOptions};
use structopt::StructOpt;
use tracing::info;

mod candle_model;
mod file_storage;
mod plotters_plotter;
mod yahoo_service;

const DEFAULT_SYMBOL : &str = "BTC-USD";

#[derive(Debug, StructOpt)]
#[structopt(name = "crypto-forecast", about = "Forecasts cryptocurrency closing prices with an LSTM",
            global_settings = &[clap::AppSettings::ColoredHelp])]
enum Command {
    /// Trains a model on daily closes and forecasts the next days
    Predict {
        /// Ticker to download, defaults to BTC-USD
        #[structopt(long)]
        symbol : Option<String>,
        /// Days to forecast (1-30)
        #[structopt(long, default_value = "7")]
        horizon : usize,
        /// Lookback range to download, e.g. 1y, 6mo, Year2, defaults to 1y
        #[structopt(long)]
        range : Option<HistoryRange>,
        /// Days per input window
        #[structopt(long, default_value = "60")]
        window : usize,
        #[structopt(long, default_value = "5")]
        epochs : usize,
        #[structopt(long, default_value = "1")]
        batch_size : usize,
        #[structopt(long, default_value = "0.001")]
        learning_rate : f64,
        #[structopt(long, default_value = "1138")]
        seed : u64,
        /// Stored history to use instead of downloading, as saved by `fetch`
        #[structopt(long)]
        history : Option<String>,
        /// Chart file name without extension, defaults to <SYMBOL>_forecast
        #[structopt(long)]
        output : Option<String>
    },
    /// Downloads daily closes and stores them as JSON
    Fetch {
        #[structopt(long, default_value = "BTC-USD")]
        symbol : String,
        #[structopt(long, default_value = "1y")]
        range : HistoryRange
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    match Command::from_args() {
        Command::Predict { symbol, horizon, range, window, epochs, batch_size, learning_rate, seed, history, output } => {
            let price_history = match history {
                Some(name) => {
                    let mut storage = file_storage::FileStorage::create()?;
                    let price_history = commands::load_price_history(&mut storage, &name)?;
                    commands::history_matches_request(&price_history, symbol.as_deref(), range);
                    price_history
                }
                None => {
                    let symbol = symbol.unwrap_or_else(|| String::from(DEFAULT_SYMBOL));
                    let mut service = yahoo_service::YahooMarketDataService::create()?;
                    commands::acquire_price_history(&mut service, &symbol, range.unwrap_or_default())?
                }
            };

            let mut options = PredictionOptions::default();
            options.set_window_width(window).set_horizon(horizon);
            let training_params = candle_model::CandleTrainingParams { epochs, batch_size, learning_rate, seed,
                ..Default::default() };
            let output_name = output.unwrap_or_else(|| format!("{}_forecast", price_history.symbol.replace("/", "_")));

            let mut model = candle_model::CandleModel::new();
            let mut plotter = plotters_plotter::PlottersPlotter::create()?;
            let report = commands::predict_prices(&mut model, &mut plotter, &price_history, &training_params,
                                                  &options, &output_name)?;

            info!("Chart written to {}.png", output_name);
            println!("Latest Close Price ({}): ${:.2}", report.latest_date, report.latest_close);
            println!("Price After {} Days ({}): ${:.2}", report.horizon,
                     report.forecast.last().map(|p| p.date.to_string()).unwrap_or_default(), report.forecast_price);
            if let (Some(train_rmse), Some(test_rmse)) = (report.train_rmse, report.test_rmse) {
                println!("Train RMSE: {:.2}, Test RMSE: {:.2}", train_rmse, test_rmse);
            }
        }
        Command::Fetch { symbol, range } => {
            let mut service = yahoo_service::YahooMarketDataService::create()?;
            let mut storage = file_storage::FileStorage::create()?;
            let entry_name = commands::fetch_price_history(&mut service, &mut storage, &symbol, range)?;
            println!("Saved {} history of {} to {}.json", range, symbol, entry_name);
        }
    }

    Ok(())
}
