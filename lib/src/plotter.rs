use chrono::NaiveDate;

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone)]
pub struct ChartSeries {
    pub label : String,
    pub points : Vec<(NaiveDate, f32)>
}

#[derive(Debug, PartialEq, Clone)]
pub struct ForecastChart {
    pub title : String,
    pub x_label : String,
    pub y_label : String,
    pub series : Vec<ChartSeries>,
    /// First date of the out-of-sample segment.
    pub split_date : Option<NaiveDate>
}

#[cfg_attr(test, automock)]
pub trait Plotter {
    fn plot_chart(&mut self, chart : &ForecastChart, filename : &str) -> anyhow::Result<()>;
}
