//! Time-series aggregation of questionnaire metrics for the analytics charts.
//!
//! All functions are pure and recompute from the observation set they are
//! given; nothing is cached between calls.

pub mod chart;
pub mod filter;
pub mod series;

pub use chart::{build_chart, population_averages, ChartPoint, ChartSeries, PopulationAverages};
pub use filter::{local_date, ObservationFilter};
pub use series::{daily_average, exponential_moving_average, period_average, DailyMean, DEFAULT_EMA_PERIOD};
