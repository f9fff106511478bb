//! Well-known questionnaire field names.
//!
//! These are the keys used inside an observation's `data` object and by the
//! alert rules. Well-being metrics are on a 1-20 scale where a low value is
//! bad (a low `fatigue` score means the player is exhausted); `rpe` is on the
//! same scale but a high value means a hard session.

/// Well-being fatigue score (1 = exhausted, 20 = fresh).
pub const METRIC_FATIGUE: &str = "fatigue";

/// Motivation score.
pub const METRIC_MOTIVATION: &str = "motivation";

/// Rate of perceived exertion for the session just played.
pub const METRIC_RPE: &str = "rpe";

/// Sleep quality of the previous night.
pub const METRIC_SLEEP_QUALITY: &str = "sleep_quality";

/// Muscle soreness score.
pub const METRIC_SORENESS: &str = "soreness";

/// Stress score.
pub const METRIC_STRESS: &str = "stress";

/// List of injury entries (`{ location, intensity, active }`).
pub const FIELD_INJURIES: &str = "injuries";

/// Optional free-text comment.
pub const FIELD_COMMENT: &str = "comment";

/// Every 1-20 score a questionnaire can carry; the default chart metrics.
pub const SCORE_METRICS: &[&str] = &[
    METRIC_FATIGUE,
    METRIC_MOTIVATION,
    METRIC_SLEEP_QUALITY,
    METRIC_SORENESS,
    METRIC_STRESS,
    METRIC_RPE,
];

/// Metrics checked by the variation rule.
pub const VARIATION_METRICS: &[&str] = SCORE_METRICS;

/// Upper bound of the well-being scale.
pub const SCALE_MAX: u8 = 20;

/// Upper bound of the injury pain scale.
pub const PAIN_SCALE_MAX: u8 = 10;
