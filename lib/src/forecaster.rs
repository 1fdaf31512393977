use std::collections::VecDeque;
use anyhow::{anyhow, Context};

use crate::forecast_model::*;

/// Forecasts `horizon` steps by feeding every prediction back into the input window.
///
/// The window keeps its initial width: each step drops the oldest value and appends the newest
/// prediction. Nothing corrects for drift, so errors compound with the horizon.
pub fn rolling_forecast<T : ForecastModel>(model : &mut T, initial_window : &[f32], horizon : usize) -> anyhow::Result<Vec<f32>> {
    let mut forecast = Vec::with_capacity(horizon);
    if horizon == 0 {
        return Ok(forecast);
    }
    if initial_window.is_empty() {
        return Err(anyhow!("Cannot forecast {} steps from an empty window", horizon));
    }

    let mut window : VecDeque<f32> = initial_window.iter().copied().collect();
    for step in 0..horizon {
        let input = vec!(window.iter().copied().collect::<Vec<f32>>());
        let next_value = *model.predict(&input)?
            .first()
            .with_context(|| format!("Model returned no prediction for forecast step {}", step + 1))?;

        forecast.push(next_value);
        window.pop_front();
        window.push_back(next_value);
    }

    Ok(forecast)
}
