use forecast_lib;
use forecast_lib::ForecastChart;
use anyhow::anyhow;
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

const ORANGE : RGBColor = RGBColor(255, 165, 0);
const SPLIT_GRAY : RGBColor = RGBColor(128, 128, 128);

pub struct PlottersPlotter {
    size : (u32, u32)
}

impl PlottersPlotter {
    pub fn create() -> anyhow::Result<PlottersPlotter> {
        Ok(PlottersPlotter { size : (1400, 500) })
    }
}

impl forecast_lib::Plotter for PlottersPlotter {
    fn plot_chart(&mut self, chart : &ForecastChart, filename : &str) -> anyhow::Result<()> {
        let all_points : Vec<(NaiveDate, f32)> = chart.series.iter().flat_map(|s| s.points.iter().copied()).collect();
        let min_date = all_points.iter().map(|p| p.0).min().ok_or(anyhow!("Chart '{}' has no points", chart.title))?;
        let max_date = all_points.iter().map(|p| p.0).max().unwrap_or(min_date);
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for &(_date, value) in &all_points {
            min_y = min_y.min(value);
            max_y = max_y.max(value);
        }
        let max_date = if max_date > min_date { max_date } else { min_date + Duration::days(1) };
        let y_margin = ((max_y - min_y) * 0.05).max(1.0);

        let png_filename = format!("{}.png", filename);
        let root_area = BitMapBackend::new(&png_filename, self.size).into_drawing_area();
        root_area.fill(&WHITE)?;

        let mut cc = ChartBuilder::on(&root_area)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(10)
            .set_all_label_area_size(60)
            .build_cartesian_2d(RangedDate::from(min_date..max_date), (min_y - y_margin)..(max_y + y_margin))?;

        cc.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(12)
            .y_labels(10)
            .x_label_formatter(&|d : &NaiveDate| d.format("%Y-%m-%d").to_string())
            .y_label_formatter(&|v : &f32| format!("{:.0}", v))
            .draw()?;

        if let Some(split_date) = chart.split_date {
            let split_line = vec!((split_date, min_y - y_margin), (split_date, max_y + y_margin));
            cc.draw_series(LineSeries::new(split_line, &SPLIT_GRAY))?
                .label("Train/Test Split")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SPLIT_GRAY));
        }

        for (i, series) in chart.series.iter().enumerate() {
            let color = PlottersPlotter::get_color(i);
            cc.draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root_area.present()?;
        Ok(())
    }
}

impl PlottersPlotter {
    fn get_color(i : usize) -> RGBColor {
        match i {
            0 => BLUE,
            1 => GREEN,
            2 => ORANGE,
            3 => RED,
            4 => CYAN,
            _ => MAGENTA
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_lib::{ChartSeries, Plotter};

    fn build_series(label : &str, start : NaiveDate, num_days : i64) -> ChartSeries {
        let points = (0..num_days).map(|i| (start + Duration::days(i), 40000.0 + 250.0 * (i as f32 * 0.2).sin())).collect();
        ChartSeries { label : String::from(label), points }
    }

    #[test]
    fn renders_chart_with_empty_series() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or(anyhow!("Invalid date"))?;
        let chart = ForecastChart {
            title : String::from("BTC-USD LSTM Model Predictions"),
            x_label : String::from("Date"),
            y_label : String::from("Price (USD)"),
            series : vec!(
                build_series("Actual", start, 100),
                build_series("Train Predictions", start + Duration::days(10), 70),
                ChartSeries { label : String::from("Test Predictions"), points : Vec::new() },
                build_series("7-Day Forecast", start + Duration::days(100), 7)),
            split_date : Some(start + Duration::days(80))
        };

        let filename = dir.path().join("chart");
        let mut plotter = PlottersPlotter::create()?;
        plotter.plot_chart(&chart, filename.to_str().ok_or(anyhow!("Non UTF-8 path"))?)?;

        assert!(dir.path().join("chart.png").exists());
        Ok(())
    }

    #[test]
    fn chart_without_points_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let chart = ForecastChart {
            title : String::from("Empty"),
            x_label : String::from("Date"),
            y_label : String::from("Price (USD)"),
            series : vec!(ChartSeries { label : String::from("Actual"), points : Vec::new() }),
            split_date : None
        };

        let filename = dir.path().join("empty");
        let mut plotter = PlottersPlotter::create()?;
        assert!(plotter.plot_chart(&chart, filename.to_str().ok_or(anyhow!("Non UTF-8 path"))?).is_err());
        assert!(!dir.path().join("empty.png").exists());
        Ok(())
    }
}
