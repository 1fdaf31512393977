use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Min-max scaler fit once over a whole series.
///
/// A series with a single distinct value gets a unit scale, so every value maps to the lower
/// bound of the feature range and inverts back to itself. Bounds and coefficients are kept in
/// f64 so five-digit prices survive a round trip to the cent; only the inputs and outputs are f32.
#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct MinMaxScaler {
    data_min : f64,
    data_max : f64,
    scale : f64,
    offset : f64
}

impl MinMaxScaler {
    pub fn fit(values : &[f32]) -> anyhow::Result<MinMaxScaler> {
        MinMaxScaler::fit_with_range(values, (0.0, 1.0))
    }

    pub fn fit_with_range(values : &[f32], (range_min, range_max) : (f32, f32)) -> anyhow::Result<MinMaxScaler> {
        if range_min >= range_max {
            return Err(anyhow!("Invalid feature range ({}, {})", range_min, range_max));
        }
        if values.is_empty() {
            return Err(anyhow!("Cannot fit scaler on an empty series"));
        }

        let mut data_min = f64::INFINITY;
        let mut data_max = f64::NEG_INFINITY;
        for &v in values {
            if !v.is_finite() {
                return Err(anyhow!("Cannot fit scaler on non-finite value {}", v));
            }
            data_min = data_min.min(v as f64);
            data_max = data_max.max(v as f64);
        }

        let data_range = if data_max > data_min { data_max - data_min } else { 1.0 };
        let scale = (range_max as f64 - range_min as f64) / data_range;
        let offset = range_min as f64 - data_min * scale;

        Ok(MinMaxScaler { data_min, data_max, scale, offset })
    }

    pub fn data_min(&self) -> f64 {
        self.data_min
    }

    pub fn data_max(&self) -> f64 {
        self.data_max
    }

    pub fn transform(&self, value : f32) -> f32 {
        (value as f64 * self.scale + self.offset) as f32
    }

    pub fn inverse_transform(&self, value : f32) -> f32 {
        ((value as f64 - self.offset) / self.scale) as f32
    }

    pub fn transform_all(&self, values : &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    pub fn inverse_transform_all(&self, values : &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.inverse_transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual : &[f32], expected : &[f32], tolerance : f32) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tolerance, "{} != {} (tolerance {})", a, e, tolerance);
        }
    }

    #[test]
    fn scales_series_into_unit_range() -> anyhow::Result<()> {
        let scaler = MinMaxScaler::fit(&[10.0, 20.0, 15.0, 30.0])?;
        assert_close(&scaler.transform_all(&[10.0, 20.0, 15.0, 30.0]), &[0.0, 0.5, 0.25, 1.0], 1e-6);
        assert_eq!(scaler.data_min(), 10.0);
        assert_eq!(scaler.data_max(), 30.0);
        Ok(())
    }

    #[test]
    fn scales_into_custom_range() -> anyhow::Result<()> {
        let scaler = MinMaxScaler::fit_with_range(&[0.0, 4.0], (-1.0, 1.0))?;
        assert_close(&scaler.transform_all(&[0.0, 2.0, 4.0]), &[-1.0, 0.0, 1.0], 1e-6);
        Ok(())
    }

    #[test]
    fn inverse_transform_restores_prices() -> anyhow::Result<()> {
        let prices = [43250.12, 44890.5, 41002.75, 39876.0, 47120.33, 45000.0];
        let scaler = MinMaxScaler::fit(&prices)?;
        let restored = scaler.inverse_transform_all(&scaler.transform_all(&prices));
        assert_close(&restored, &prices, 0.01);
        Ok(())
    }

    #[test]
    fn large_prices_round_trip_to_the_cent() -> anyhow::Result<()> {
        let prices : Vec<f32> = (0..365).map(|i| 60000.0 + 37.25 * i as f32).collect();
        let scaler = MinMaxScaler::fit(&prices)?;
        assert_eq!(scaler.data_min(), 60000.0);
        assert_eq!(scaler.data_max(), 60000.0 + 37.25 * 364.0);

        let restored = scaler.inverse_transform_all(&scaler.transform_all(&prices));
        assert_close(&restored, &prices, 0.01);
        Ok(())
    }

    #[test]
    fn values_outside_fitted_range_extrapolate() -> anyhow::Result<()> {
        let scaler = MinMaxScaler::fit(&[100.0, 200.0])?;
        assert_close(&[scaler.transform(250.0), scaler.inverse_transform(-0.5)], &[1.5, 50.0], 1e-4);
        Ok(())
    }

    #[test]
    fn constant_series_maps_to_range_min_and_back() -> anyhow::Result<()> {
        let scaler = MinMaxScaler::fit(&[7.5, 7.5, 7.5])?;
        assert_close(&scaler.transform_all(&[7.5, 7.5]), &[0.0, 0.0], 1e-6);
        assert_close(&[scaler.inverse_transform(0.0)], &[7.5], 1e-6);
        Ok(())
    }

    #[test]
    fn fit_rejects_empty_and_non_finite_series() {
        assert!(MinMaxScaler::fit(&[]).is_err());
        assert!(MinMaxScaler::fit(&[1.0, f32::NAN]).is_err());
        assert!(MinMaxScaler::fit_with_range(&[1.0, 2.0], (1.0, 0.0)).is_err());
    }
}
