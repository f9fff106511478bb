//! Per-metric aggregations: daily mean, period mean, exponential moving average.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::aggregation::filter::local_date;
use crate::observation::Observation;

/// Smoothing window used by the charts.
pub const DEFAULT_EMA_PERIOD: usize = 7;

/// Mean of one metric over one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub mean: f64,
    /// Number of qualifying values behind `mean` (always at least 1).
    pub count: usize,
}

/// Mean of `metric` per local calendar day, ascending by date.
///
/// Days without a single qualifying value are omitted rather than reported
/// as zero. Grouping keys are real dates, so ordering stays correct across
/// month and year boundaries.
pub fn daily_average<'a, I>(observations: I, metric: &str, offset: &FixedOffset) -> Vec<DailyMean>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for obs in observations {
        if let Some(value) = obs.metric(metric) {
            let bucket = buckets
                .entry(local_date(obs.created_at, offset))
                .or_insert((0.0, 0));
            bucket.0 += value;
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (sum, count))| DailyMean {
            date,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Mean of every qualifying value of `metric`, ignoring dates.
///
/// `None` when nothing qualifies; callers render that as "N/A", never 0.
pub fn period_average<'a, I>(observations: I, metric: &str) -> Option<f64>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let (sum, count) = observations
        .into_iter()
        .filter_map(|o| o.metric(metric))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Exponential moving average of `values`, one output per input.
///
/// The first output is the first input; each following output moves toward
/// the current value by `2 / (period + 1)` of the gap. The whole series is
/// recomputed from the first value on every call. A `period` of 0 is treated
/// as 1 (no smoothing).
pub fn exponential_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    let mut iter = values.iter().copied();
    let Some(mut ema) = iter.next() else {
        return out;
    };
    out.push(ema);
    for value in iter {
        ema += alpha * (value - ema);
        out.push(ema);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
