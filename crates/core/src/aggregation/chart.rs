//! Chart-ready series and summary averages.
//!
//! The presentation layer receives a list of dated points where each metric
//! is a key on the point. A key missing from a point means "no data that
//! day", never zero. Averages with no qualifying value serialize as `null`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::aggregation::filter::ObservationFilter;
use crate::aggregation::series::{daily_average, exponential_moving_average, period_average};
use crate::observation::Observation;
use crate::types::DbId;

/// One day on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// One smoothed value, aligned with a day that has data for the metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything a metric chart needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Daily means, ascending by date.
    pub points: Vec<ChartPoint>,
    /// Whole-period mean per metric; `None` when the metric has no data.
    pub averages: BTreeMap<String, Option<f64>>,
    /// EMA of the daily means per metric.
    pub ema: BTreeMap<String, Vec<EmaPoint>>,
}

/// Build chart data for `metrics` from the observations passing `filter`.
pub fn build_chart(
    observations: &[Observation],
    filter: &ObservationFilter,
    metrics: &[String],
    offset: &FixedOffset,
    ema_period: usize,
) -> ChartSeries {
    let selected = filter.apply(observations, offset);

    let mut days: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut averages = BTreeMap::new();
    let mut ema = BTreeMap::new();

    for metric in metrics.iter().filter(|m| filter.allows_metric(m)) {
        let daily = daily_average(selected.iter().copied(), metric, offset);

        let means: Vec<f64> = daily.iter().map(|d| d.mean).collect();
        let smoothed = exponential_moving_average(&means, ema_period)
            .into_iter()
            .zip(&daily)
            .map(|(value, d)| EmaPoint {
                date: d.date,
                value,
            })
            .collect();

        for d in &daily {
            days.entry(d.date)
                .or_default()
                .insert(metric.clone(), d.mean);
        }

        averages.insert(metric.clone(), period_average(selected.iter().copied(), metric));
        ema.insert(metric.clone(), smoothed);
    }

    ChartSeries {
        points: days
            .into_iter()
            .map(|(date, values)| ChartPoint { date, values })
            .collect(),
        averages,
        ema,
    }
}

/// Period averages of `metrics` over the observations passing `filter`.
pub fn metric_averages(
    observations: &[Observation],
    filter: &ObservationFilter,
    metrics: &[String],
    offset: &FixedOffset,
) -> BTreeMap<String, Option<f64>> {
    let selected = filter.apply(observations, offset);
    metrics
        .iter()
        .filter(|m| filter.allows_metric(m))
        .map(|m| (m.clone(), period_average(selected.iter().copied(), m)))
        .collect()
}

/// Averages for a selected group next to the same averages for everyone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationAverages {
    pub filtered: BTreeMap<String, Option<f64>>,
    pub global: BTreeMap<String, Option<f64>>,
}

/// Compare the subjects selected by `filter` with the whole `population`.
///
/// Both sides share the filter's date, kind and metric criteria; only the
/// subject set differs. When the selection is the whole population (or no
/// subject restriction is set) the global result is reused for the filtered
/// side, so the two are identical.
pub fn population_averages(
    observations: &[Observation],
    filter: &ObservationFilter,
    population: &BTreeSet<DbId>,
    metrics: &[String],
    offset: &FixedOffset,
) -> PopulationAverages {
    let global_filter = ObservationFilter {
        subjects: Some(population.clone()),
        ..filter.clone()
    };
    let global = metric_averages(observations, &global_filter, metrics, offset);

    let selection_is_population = filter
        .subjects
        .as_ref()
        .map_or(true, |selected| selected == population);

    let filtered = if selection_is_population {
        global.clone()
    } else {
        metric_averages(observations, filter, metrics, offset)
    };

    PopulationAverages { filtered, global }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
