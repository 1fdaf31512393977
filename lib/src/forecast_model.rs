use crate::utils::WindowedDataset;

#[cfg(test)]
use mockall::{automock};

/// One-step-ahead regressor over fixed-width windows of scaled prices.
#[cfg_attr(test, automock(type TrainingParams = u32;))]
pub trait ForecastModel {
    type TrainingParams;

    fn train(&mut self, dataset : &WindowedDataset, extra_params : &Self::TrainingParams) -> anyhow::Result<()>;
    /// Returns one prediction per window, in order.
    fn predict(&mut self, windows : &[Vec<f32>]) -> anyhow::Result<Vec<f32>>;
}
