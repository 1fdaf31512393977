use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use getset::{Setters};
use tracing::info;

use crate::config;
use crate::forecast_model::*;
use crate::forecaster;
use crate::market_data::*;
use crate::plotter::*;
use crate::scaler::MinMaxScaler;
use crate::utils;

#[derive(Debug, Setters)]
#[getset(set = "pub")]
pub struct PredictionOptions {
    pub window_width : usize,
    pub train_ratio : f32,
    pub horizon : usize
}

impl Default for PredictionOptions {
    fn default() -> Self {
        PredictionOptions { window_width : config::WINDOW_WIDTH, train_ratio : config::TRAIN_SPLIT,
            horizon : config::DEFAULT_HORIZON }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PredictionReport {
    pub symbol : String,
    pub latest_date : NaiveDate,
    pub latest_close : f32,
    pub horizon : usize,
    pub forecast : Vec<PricePoint>,
    pub forecast_price : f32,
    pub train_rmse : Option<f32>,
    pub test_rmse : Option<f32>
}

pub fn predict_prices<T : ForecastModel>(model : &mut T,
                                         plotter : &mut impl Plotter,
                                         history : &PriceHistory,
                                         extra_training_params : &T::TrainingParams,
                                         options : &PredictionOptions,
                                         output_name : &str) -> anyhow::Result<PredictionReport> {
    let window_width = options.window_width;
    let horizon = options.horizon;
    if horizon < 1 || horizon > config::MAX_HORIZON {
        return Err(anyhow!("Horizon {} is outside the supported range 1..={}", horizon, config::MAX_HORIZON));
    }
    if window_width == 0 {
        return Err(anyhow!("Window width must be at least 1"));
    }

    let latest = *history.latest().ok_or(anyhow!("Price history for '{}' is empty", history.symbol))?;
    let closes = history.closes();
    let dates = history.dates();
    if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(anyhow!("Price history for '{}' is not in chronological order ({} followed by {})",
            history.symbol, pair[0], pair[1]));
    }

    let train_size = utils::split_point(closes.len(), options.train_ratio);
    if train_size <= window_width {
        return Err(anyhow!("History of {} days is too short for window width {} (training segment has {} days)",
            closes.len(), window_width, train_size));
    }

    let scaler = MinMaxScaler::fit(&closes).context("Failed to normalize closing prices")?;
    let scaled = scaler.transform_all(&closes);

    let train_dataset = utils::create_dataset(&scaled[..train_size], window_width);
    let test_dataset = utils::create_dataset(&scaled[train_size - window_width..], window_width);
    info!("Training on {} windows of {} days, testing on {} windows", train_dataset.len(), window_width, test_dataset.len());

    model.train(&train_dataset, extra_training_params)?;

    let train_predictions = predict_windows(model, &train_dataset.inputs)?;
    let test_predictions = predict_windows(model, &test_dataset.inputs)?;

    let train_predictions = scaler.inverse_transform_all(&train_predictions);
    let test_predictions = scaler.inverse_transform_all(&test_predictions);
    let train_rmse = utils::root_mean_squared_error(&train_predictions, &closes[window_width..train_size]);
    let test_rmse = utils::root_mean_squared_error(&test_predictions, &closes[train_size..]);
    info!("Train RMSE: {:?}, test RMSE: {:?}", train_rmse, test_rmse);

    let forecast_scaled = forecaster::rolling_forecast(model, &scaled[scaled.len() - window_width..], horizon)?;
    let forecast : Vec<PricePoint> = utils::forecast_dates(latest.date, horizon).into_iter()
        .zip(scaler.inverse_transform_all(&forecast_scaled))
        .map(|(date, close)| PricePoint { date, close })
        .collect();
    let forecast_price = forecast.last().map(|p| p.close).context("Forecast came back empty")?;

    let chart = ForecastChart {
        title : format!("{} LSTM Model Predictions", history.symbol),
        x_label : String::from("Date"),
        y_label : String::from("Price (USD)"),
        series : vec!(
            ChartSeries { label : String::from("Actual"), points : history.points.iter().map(|p| (p.date, p.close)).collect() },
            ChartSeries { label : String::from("Train Predictions"), points : dated(&dates[window_width..train_size], &train_predictions) },
            ChartSeries { label : String::from("Test Predictions"), points : dated(&dates[train_size..], &test_predictions) },
            ChartSeries { label : format!("{}-Day Forecast", horizon), points : forecast.iter().map(|p| (p.date, p.close)).collect() }),
        split_date : dates.get(train_size).copied()
    };
    plotter.plot_chart(&chart, output_name)?;

    Ok(PredictionReport {
        symbol : history.symbol.clone(),
        latest_date : latest.date,
        latest_close : latest.close,
        horizon,
        forecast,
        forecast_price,
        train_rmse,
        test_rmse
    })
}

fn predict_windows<T : ForecastModel>(model : &mut T, windows : &[Vec<f32>]) -> anyhow::Result<Vec<f32>> {
    if windows.is_empty() {
        return Ok(Vec::new());
    }

    let predictions = model.predict(windows)?;
    if predictions.len() != windows.len() {
        return Err(anyhow!("Model returned {} predictions for {} windows", predictions.len(), windows.len()));
    }

    Ok(predictions)
}

fn dated(dates : &[NaiveDate], values : &[f32]) -> Vec<(NaiveDate, f32)> {
    dates.iter().copied().zip(values.iter().copied()).collect()
}
