// core/src/bucketing.rs
use crate::types::{BucketKey, GroupedData, Observation};

/// Båndet en puls faller i: `lower = floor(hr / step) * step`.
/// `step` må være > 0 (sjekkes av `EngineConfig::validate`).
/// Øverste bånd kappes ved `u32::MAX`, så `upper >= lower` alltid holder.
#[inline]
pub fn bucket_for(heart_rate: u32, step: u32) -> BucketKey {
    let lower = (heart_rate / step) * step;
    BucketKey { lower, upper: lower.saturating_add(step - 1) }
}

/// Summerer varighet per bånd. Tom input gir tom map.
pub fn group_observations(observations: &[Observation], step: u32) -> GroupedData {
    let mut grouped = GroupedData::new();
    for o in observations {
        *grouped.entry(bucket_for(o.heart_rate, step)).or_insert(0) += u64::from(o.duration);
    }
    grouped
}
