//! Observation filtering ahead of aggregation.
//!
//! Filtering always happens before any grouping so that excluded
//! observations cannot influence a mean.

use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

use crate::observation::{Observation, QuestionnaireKind};
use crate::types::{DbId, Timestamp};

/// Calendar day of `ts` in the club's reporting time zone.
///
/// Observations are grouped by the day the player experienced, not by the
/// UTC day, so a response sent at 00:30 local time lands on the local date.
pub fn local_date(ts: Timestamp, offset: &FixedOffset) -> NaiveDate {
    ts.with_timezone(offset).date_naive()
}

/// Selection criteria applied to an observation set.
///
/// Every criterion is optional; `None` means "no restriction". Date bounds
/// are inclusive and compared against the local calendar date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subjects: Option<BTreeSet<DbId>>,
    pub kinds: Option<BTreeSet<QuestionnaireKind>>,
    pub metrics: Option<Vec<String>>,
}

impl ObservationFilter {
    /// Restrict to the inclusive local date range `[from, to]`.
    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Restrict to the given subjects.
    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = DbId>) -> Self {
        self.subjects = Some(subjects.into_iter().collect());
        self
    }

    /// Restrict to the given questionnaire kinds.
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = QuestionnaireKind>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Restrict the metrics that aggregations report on.
    pub fn with_metrics(mut self, metrics: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.metrics = Some(metrics.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `obs` passes the date, subject and kind criteria.
    pub fn matches(&self, obs: &Observation, offset: &FixedOffset) -> bool {
        if let Some(subjects) = &self.subjects {
            if !subjects.contains(&obs.subject_id) {
                return false;
            }
        }
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&obs.kind) {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let day = local_date(obs.created_at, offset);
            if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
                return false;
            }
        }
        true
    }

    /// Whether `metric` is on the allow-list (always true without one).
    pub fn allows_metric(&self, metric: &str) -> bool {
        self.metrics
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|m| m == metric))
    }

    /// The observations of `observations` that pass the filter, in input order.
    pub fn apply<'a>(
        &self,
        observations: &'a [Observation],
        offset: &FixedOffset,
    ) -> Vec<&'a Observation> {
        observations
            .iter()
            .filter(|o| self.matches(o, offset))
            .collect()
    }

    /// UTC instants bounding the date range: `[start of from, start of the
    /// day after to)` in local time. Used to narrow database queries before
    /// the exact local-date filter runs.
    pub fn utc_bounds(&self, offset: &FixedOffset) -> (Option<Timestamp>, Option<Timestamp>) {
        let start_of = |day: NaiveDate| {
            day.and_hms_opt(0, 0, 0)
                .and_then(|midnight| offset.from_local_datetime(&midnight).single())
                .map(|local| local.with_timezone(&Utc))
        };
        let since = self.from.and_then(start_of);
        let until = self.to.and_then(|to| to.succ_opt()).and_then(start_of);
        (since, until)
    }

    /// Metrics to report on: the allow-list when one is set, otherwise
    /// `candidates`.
    pub fn resolve_metrics(&self, candidates: &[&str]) -> Vec<String> {
        match &self.metrics {
            Some(allowed) => allowed.clone(),
            None => candidates.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obs(subject_id: DbId, kind: QuestionnaireKind, ts: Timestamp) -> Observation {
        Observation {
            id: 1,
            subject_id,
            kind,
            data: json!({}),
            created_at: ts,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn local_date_uses_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        let paris = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(local_date(ts, &utc()), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(local_date(ts, &paris), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn date_range_is_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let filter = ObservationFilter::default().with_range(Some(day(10)), Some(day(12)));

        let at = |d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap();
        assert!(!filter.matches(&obs(1, QuestionnaireKind::Pre, at(9)), &utc()));
        assert!(filter.matches(&obs(1, QuestionnaireKind::Pre, at(10)), &utc()));
        assert!(filter.matches(&obs(1, QuestionnaireKind::Pre, at(12)), &utc()));
        assert!(!filter.matches(&obs(1, QuestionnaireKind::Pre, at(13)), &utc()));
    }

    #[test]
    fn subject_and_kind_restrictions() {
        let ts = Utc::now();
        let filter = ObservationFilter::default()
            .with_subjects([1, 2])
            .with_kinds([QuestionnaireKind::Post]);

        assert!(filter.matches(&obs(1, QuestionnaireKind::Post, ts), &utc()));
        assert!(!filter.matches(&obs(3, QuestionnaireKind::Post, ts), &utc()));
        assert!(!filter.matches(&obs(2, QuestionnaireKind::Pre, ts), &utc()));
    }

    #[test]
    fn utc_bounds_cover_whole_local_days() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let filter = ObservationFilter::default().with_range(Some(day(10)), Some(day(11)));

        let (since, until) = filter.utc_bounds(&paris);
        assert_eq!(since, Some(Utc.with_ymd_and_hms(2024, 6, 9, 22, 0, 0).unwrap()));
        assert_eq!(until, Some(Utc.with_ymd_and_hms(2024, 6, 11, 22, 0, 0).unwrap()));

        assert_eq!(ObservationFilter::default().utc_bounds(&paris), (None, None));
    }

    #[test]
    fn metric_allow_list() {
        let open = ObservationFilter::default();
        assert!(open.allows_metric("fatigue"));

        let restricted = ObservationFilter::default().with_metrics(["rpe"]);
        assert!(restricted.allows_metric("rpe"));
        assert!(!restricted.allows_metric("fatigue"));
        assert_eq!(restricted.resolve_metrics(&["fatigue", "rpe"]), vec!["rpe"]);
        assert_eq!(open.resolve_metrics(&["fatigue", "rpe"]), vec!["fatigue", "rpe"]);
    }
}
