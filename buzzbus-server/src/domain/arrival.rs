//! Live arrival estimates.

/// One vehicle's predicted arrival at a stop.
///
/// `vehicle_id` and `seconds` may be missing when upstream is inconsistent.
/// Such estimates are still shown but cannot be direction-checked.
/// `minutes` is always populated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrivalEstimate {
    pub vehicle_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub seconds: Option<i64>,
    pub minutes: i64,
    /// Estimated clock time exactly as upstream sent it.
    pub raw_clock_time: Option<String>,
    pub scheduled_clock_time: Option<String>,
    pub is_arriving: bool,
    pub on_time_status: Option<i64>,
}

impl ArrivalEstimate {
    /// Vehicle id and seconds, when both are known.
    pub fn timing(&self) -> Option<(&str, i64)> {
        Some((self.vehicle_id.as_deref()?, self.seconds?))
    }
}

/// Derive whole minutes from the available timing fields.
///
/// Seconds win when present (floored); then an explicit minutes value;
/// otherwise zero.
pub fn derive_minutes(seconds: Option<i64>, minutes: Option<i64>) -> i64 {
    match (seconds, minutes) {
        (Some(s), _) => s.div_euclid(60),
        (None, Some(m)) => m,
        (None, None) => 0,
    }
}

/// Sort estimates soonest first; those without seconds go last in input order.
pub fn sort_by_seconds(estimates: &mut [ArrivalEstimate]) {
    estimates.sort_by_key(|e| match e.seconds {
        Some(s) => (0, s),
        None => (1, 0),
    });
}
