//! Merging independently slotted series onto a shared slot grid.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::core::{interval::Interval, rate::Rate};

/// Re-slot both series onto the union of their slot boundaries.
///
/// The values are treated as amounts per slot, so each source slot spreads its value
/// over the new sub-slots proportionally to their duration.
///
/// When a sub-slot falls into a gap between two source slots, it receives the average of
/// the neighbouring values scaled by its share of the gap. This is an approximation:
/// the total amount over a gap is not guaranteed to be preserved.
///
/// Does nothing when either series is empty.
pub fn align(lhs: &mut Vec<Rate>, rhs: &mut Vec<Rate>) {
    if lhs.is_empty() || rhs.is_empty() {
        return;
    }

    let boundaries: BTreeSet<_> = lhs
        .iter()
        .chain(rhs.iter())
        .flat_map(|rate| [rate.start(), rate.end()])
        .collect();

    let (aligned_lhs, aligned_rhs): (Vec<_>, Vec<_>) = boundaries
        .into_iter()
        .tuple_windows()
        .map(|(start, end)| {
            let slot = Interval::new(start, end);
            (Rate::new(slot, prorate(lhs, slot)), Rate::new(slot, prorate(rhs, slot)))
        })
        .unzip();

    *lhs = aligned_lhs;
    *rhs = aligned_rhs;
}

/// Amount of the series attributable to the slot.
fn prorate(rates: &[Rate], slot: Interval) -> f64 {
    if let Some(rate) = rates.iter().find(|rate| rate.interval.covers(slot)) {
        return rate.prorate(slot);
    }

    // Gap between two known slots:
    rates
        .iter()
        .tuple_windows()
        .find(|(before, after)| (slot.start < after.start()) && (slot.end > before.end()))
        .and_then(|(before, after)| {
            let gap = (after.start() - before.end()).as_seconds_f64();
            (gap > 0.0).then(|| {
                0.5 * (before.value + after.value) * (slot.duration().as_seconds_f64() / gap)
            })
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::rate::tests::rate;

    fn boundaries(rates: &[Rate]) -> Vec<Interval> {
        rates.iter().map(|rate| rate.interval).collect()
    }

    #[test]
    fn test_align_splits_proportionally() {
        let mut hourly = vec![rate((0, 0), (1, 0), 0.40), rate((1, 0), (2, 0), 0.20)];
        let mut half_hourly = vec![rate((0, 30), (1, 30), 600.0)];

        align(&mut hourly, &mut half_hourly);

        assert_eq!(boundaries(&hourly), boundaries(&half_hourly));
        assert_eq!(
            boundaries(&hourly),
            [
                rate((0, 0), (0, 30), 0.0).interval,
                rate((0, 30), (1, 0), 0.0).interval,
                rate((1, 0), (1, 30), 0.0).interval,
                rate((1, 30), (2, 0), 0.0).interval,
            ],
        );

        let values = hourly.iter().map(|rate| rate.value).collect_vec();
        assert_abs_diff_eq!(values.as_slice(), [0.20, 0.20, 0.10, 0.10].as_slice());

        let values = half_hourly.iter().map(|rate| rate.value).collect_vec();
        assert_abs_diff_eq!(values.as_slice(), [0.0, 300.0, 300.0, 0.0].as_slice());
    }

    #[test]
    fn test_align_empty_is_noop() {
        let original = vec![rate((0, 0), (1, 0), 1.0), rate((1, 0), (3, 0), 2.0)];
        let mut lhs = original.clone();
        let mut rhs = Vec::new();

        align(&mut lhs, &mut rhs);

        assert_eq!(lhs, original);
        assert!(rhs.is_empty());
    }

    #[test]
    fn test_align_is_idempotent() {
        let mut lhs = vec![rate((0, 0), (1, 0), 0.30), rate((1, 0), (2, 0), 0.25)];
        let mut rhs = vec![rate((0, 0), (1, 0), 100.0), rate((1, 0), (2, 0), 200.0)];
        let (original_lhs, original_rhs) = (lhs.clone(), rhs.clone());

        align(&mut lhs, &mut rhs);
        assert_eq!(lhs, original_lhs);
        assert_eq!(rhs, original_rhs);

        align(&mut lhs, &mut rhs);
        assert_eq!(lhs, original_lhs);
        assert_eq!(rhs, original_rhs);
    }

    #[test]
    fn test_align_preserves_total() {
        let original =
            vec![rate((0, 0), (1, 0), 300.0), rate((1, 0), (1, 45), 700.0), rate((1, 45), (3, 0), 50.0)];
        let mut lhs = original.clone();
        let mut rhs = original.clone();
        align(&mut lhs, &mut rhs);
        assert_abs_diff_eq!(lhs.iter().map(|rate| rate.value).sum::<f64>(), 1050.0, epsilon = 1e-9);

        let mut series = original;
        let mut quarters = (0..12)
            .map(|quarter| {
                let (from, to) = (quarter * 15, (quarter + 1) * 15);
                rate((from / 60, from % 60), (to / 60, to % 60), 1.0)
            })
            .collect_vec();
        align(&mut series, &mut quarters);
        assert_eq!(series.len(), 12);
        assert_abs_diff_eq!(series.iter().map(|rate| rate.value).sum::<f64>(), 1050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_align_gap_is_interpolated() {
        let mut lhs = vec![rate((0, 0), (1, 0), 100.0), rate((2, 0), (3, 0), 300.0)];
        let mut rhs = vec![rate((1, 0), (1, 30), 1.0), rate((1, 30), (2, 0), 1.0)];

        align(&mut lhs, &mut rhs);

        let values = lhs.iter().map(|rate| rate.value).collect_vec();
        assert_abs_diff_eq!(values.as_slice(), [100.0, 100.0, 100.0, 300.0].as_slice());
    }

    #[test]
    fn test_align_outside_of_data_is_zero() {
        let mut lhs = vec![rate((0, 0), (1, 0), 100.0)];
        let mut rhs = vec![rate((2, 0), (3, 0), 5.0)];

        align(&mut lhs, &mut rhs);

        let values = lhs.iter().map(|rate| rate.value).collect_vec();
        assert_abs_diff_eq!(values.as_slice(), [100.0, 0.0, 0.0].as_slice());
        let values = rhs.iter().map(|rate| rate.value).collect_vec();
        assert_abs_diff_eq!(values.as_slice(), [0.0, 0.0, 5.0].as_slice());
    }
}
