// core/src/percentages.rs
use crate::error::{HrError, Result};
use crate::types::{DateWindow, GroupedData, Percentages, WindowResult};

/// Total tid (sek) og prosent per bånd. Tom map gir `NoData`, aldri deling på null.
pub fn calculate_percentages(grouped: &GroupedData) -> Result<(u64, Percentages)> {
    let total: u64 = grouped.values().sum();
    if total == 0 {
        return Err(HrError::NoData);
    }
    let percentages = grouped
        .iter()
        .map(|(k, &secs)| (*k, 100.0 * secs as f64 / total as f64))
        .collect();
    Ok((total, percentages))
}

/// Hele minutter, avkortet (aldri avrundet).
#[inline]
pub fn total_minutes(total_seconds: u64) -> u64 {
    total_seconds / 60
}

/// Setter sammen vindusresultatet fra grupperte data.
pub fn summarize(window: &DateWindow, grouped: GroupedData) -> Result<WindowResult> {
    let (total, percentages) = calculate_percentages(&grouped)?;
    Ok(WindowResult {
        label: window.label(),
        from_date: window.start_date,
        to_date: window.end_date,
        grouped_data: grouped,
        total_time_minutes: total_minutes(total),
        percentages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BucketKey;

    fn key(lower: u32) -> BucketKey {
        BucketKey { lower, upper: lower + 9 }
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let mut g = GroupedData::new();
        g.insert(key(60), 7_200);
        g.insert(key(70), 1_234);
        g.insert(key(150), 17);
        let (total, pct) = calculate_percentages(&g).unwrap();
        assert_eq!(total, 8_451);
        let sum: f64 = pct.values().sum();
        assert!((sum - 100.0).abs() < 1e-9 * 100.0);
    }

    #[test]
    fn minutes_are_floored() {
        assert_eq!(total_minutes(119), 1);
        assert_eq!(total_minutes(120), 2);
        assert_eq!(total_minutes(59), 0);
    }

    #[test]
    fn empty_is_no_data() {
        assert!(matches!(calculate_percentages(&GroupedData::new()), Err(HrError::NoData)));
    }

    #[test]
    fn zero_duration_only_is_no_data() {
        let mut g = GroupedData::new();
        g.insert(key(60), 0);
        assert!(matches!(calculate_percentages(&g), Err(HrError::NoData)));
    }
}
