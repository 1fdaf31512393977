use chrono::{Duration, NaiveDate};

/// Input windows paired with the value that immediately follows each of them.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct WindowedDataset {
    pub inputs : Vec<Vec<f32>>,
    pub targets : Vec<f32>
}

impl WindowedDataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Builds one (window, next value) pair per starting offset. A series no longer than the window
/// yields an empty dataset.
pub fn create_dataset(series : &[f32], window_width : usize) -> WindowedDataset {
    let mut dataset = WindowedDataset::default();
    if series.len() <= window_width {
        return dataset;
    }

    for i in 0..series.len() - window_width {
        let input_end = i + window_width;
        dataset.inputs.push(Vec::from(&series[i..input_end]));
        dataset.targets.push(series[input_end]);
    }

    dataset
}

pub fn split_point(len : usize, train_ratio : f32) -> usize {
    ((len as f64 * train_ratio as f64).floor() as usize).min(len)
}

pub fn root_mean_squared_error(predictions : &[f32], expectations : &[f32]) -> Option<f32> {
    let count = predictions.len().min(expectations.len());
    if count == 0 {
        return None;
    }

    let squared_error_sum : f64 = predictions.iter().zip(expectations)
        .map(|(p, e)| (*p as f64 - *e as f64).powi(2))
        .sum();
    Some((squared_error_sum / count as f64).sqrt() as f32)
}

/// Calendar days following `last_date`.
pub fn forecast_dates(last_date : NaiveDate, horizon : usize) -> Vec<NaiveDate> {
    (1..=horizon as i64).map(|d| last_date + Duration::days(d)).collect()
}
