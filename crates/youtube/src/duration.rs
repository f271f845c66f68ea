//! ISO-8601 durations as used by `contentDetails.duration`.

use regex::Regex;
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

/// Total seconds of a duration like `PT1H2M3S` or `P1DT5M`.
///
/// Returns `None` for anything that isn't a duration, including a bare `P`.
pub fn parse_seconds(raw: &str) -> Option<u64> {
    let captures = ISO_DURATION.captures(raw.trim())?;
    let mut total: u64 = 0;
    let mut matched = false;
    for (group, unit) in [(1, 86_400), (2, 3_600), (3, 60), (4, 1)] {
        if let Some(value) = captures.get(group) {
            matched = true;
            total = total.checked_add(value.as_str().parse::<u64>().ok()?.checked_mul(unit)?)?;
        }
    }
    matched.then_some(total)
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
