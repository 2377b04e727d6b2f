use serde::{Deserialize, Serialize};

use crate::scale::{PriceRange, TimeRange};

/// One OHLC(V) bar of market data at a fixed nominal duration.
///
/// Supplied by the embedding application, sorted ascending by `time`;
/// read-only once handed to the chart. Ordering is the caller's contract
/// and is not re-validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub time: u64,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
    #[serde(default)]
    pub volume: Option<f32>,
}

/// Inclusive index bounds into an [`IntervalSeries`] for the currently
/// visible time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn iter(self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }

    /// Inclusive bounds: a range is never empty.
    pub fn count(self) -> usize {
        self.end - self.start + 1
    }
}

/// The interval store: an ordered, non-overlapping sequence of bars with a
/// uniform nominal spacing.
#[derive(Debug, Clone, Default)]
pub struct IntervalSeries {
    intervals: Vec<Interval>,
    interval_ms: u64,
}

impl IntervalSeries {
    pub fn new(intervals: Vec<Interval>, interval_ms: u64) -> Self {
        Self {
            intervals,
            interval_ms: interval_ms.max(1),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn first_time(&self) -> Option<u64> {
        self.intervals.first().map(|i| i.time)
    }

    pub fn last_time(&self) -> Option<u64> {
        self.intervals.last().map(|i| i.time)
    }

    /// Full extent of the data on the time axis, end exclusive: the last
    /// bar still occupies one nominal interval.
    pub fn time_bounds(&self) -> Option<TimeRange> {
        let first = self.first_time()?;
        let last = self.last_time()?;
        Some(TimeRange {
            start: first,
            end: last + self.interval_ms,
        })
    }

    /// Inclusive index bounds covering `range`, clamped to the store.
    ///
    /// Uses the uniform nominal spacing: `floor/ceil((bound - first) / dt)`.
    /// Returns `None` when the store is empty or the window lies entirely
    /// outside the data.
    pub fn visible_indices(&self, range: TimeRange) -> Option<IndexRange> {
        let first = self.first_time()?;
        let last = self.last_time()?;

        if range.end <= first || range.start > last + self.interval_ms {
            return None;
        }

        let dt = self.interval_ms as f64;
        let start_offset = range.start.saturating_sub(first) as f64;
        let end_offset = range.end.saturating_sub(first) as f64;

        let start = (start_offset / dt).floor() as usize;
        let end = (end_offset / dt).ceil() as usize;

        let max_idx = self.intervals.len() - 1;
        Some(IndexRange {
            start: start.min(max_idx),
            end: end.min(max_idx),
        })
    }

    /// High/low extrema over the given index range, with the degenerate
    /// flat-span guard applied by [`PriceRange::from_min_max`].
    pub fn price_range(&self, indices: IndexRange) -> PriceRange {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for idx in indices.iter() {
            if let Some(interval) = self.intervals.get(idx) {
                min = min.min(interval.low);
                max = max.max(interval.high);
            }
        }

        if min > max {
            PriceRange::from_min_max(0.0, 0.0)
        } else {
            PriceRange::from_min_max(min, max)
        }
    }

    /// Volume extrema over the given index range, floored at zero.
    /// `None` when no interval in range carries a volume.
    pub fn volume_range(&self, indices: IndexRange) -> Option<PriceRange> {
        let mut max = None::<f32>;

        for idx in indices.iter() {
            if let Some(v) = self.intervals.get(idx).and_then(|i| i.volume) {
                max = Some(max.map_or(v, |m: f32| m.max(v)));
            }
        }

        max.map(|m| PriceRange::from_min_max(0.0, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_series(count: usize) -> IntervalSeries {
        let intervals = (0..count)
            .map(|i| Interval {
                time: i as u64 * 60_000,
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: Some(1.0 + i as f32),
            })
            .collect();
        IntervalSeries::new(intervals, 60_000)
    }

    #[test]
    fn visible_indices_clamp_to_store() {
        let series = flat_series(5);

        let full = series
            .visible_indices(TimeRange { start: 0, end: 240_000 })
            .unwrap();
        assert_eq!(full, IndexRange { start: 0, end: 4 });

        // window reaching far past the data clamps to the last index
        let overshoot = series
            .visible_indices(TimeRange { start: 120_000, end: 900_000 })
            .unwrap();
        assert_eq!(overshoot, IndexRange { start: 2, end: 4 });

        // window entirely before the data
        assert!(
            flat_series(5)
                .visible_indices(TimeRange { start: 0, end: 0 })
                .is_none()
        );
    }

    #[test]
    fn empty_store_yields_nothing() {
        let series = IntervalSeries::new(vec![], 60_000);
        assert!(series.visible_indices(TimeRange { start: 0, end: 1 }).is_none());
        assert!(series.time_bounds().is_none());
    }

    #[test]
    fn price_range_covers_extrema() {
        let series = flat_series(3);
        let range = series.price_range(IndexRange { start: 0, end: 2 });
        assert_eq!(range.min, 90.0);
        assert_eq!(range.max, 110.0);
        assert_eq!(range.range, 20.0);
    }

    #[test]
    fn volume_range_floors_at_zero() {
        let series = flat_series(3);
        let range = series.volume_range(IndexRange { start: 0, end: 2 }).unwrap();
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 3.0);
    }

    #[test]
    fn volume_range_absent_without_volumes() {
        let intervals = vec![Interval {
            time: 0,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: None,
        }];
        let series = IntervalSeries::new(intervals, 60_000);
        assert!(series.volume_range(IndexRange { start: 0, end: 0 }).is_none());
    }
}
