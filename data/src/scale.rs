pub mod linear;
pub mod timeseries;

use serde::{Deserialize, Serialize};

/// Visible duration never shrinks below this many nominal intervals.
pub const MIN_VISIBLE_INTERVALS: u64 = 5;

/// The currently displayed time window, milliseconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

impl TimeRange {
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn contains(&self, time: u64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Rescales the window around the horizontal ratio of the pointer,
    /// so the domain value under the cursor stays put.
    ///
    /// `factor > 1` zooms out, `< 1` zooms in. The result is floored at
    /// `min_duration` and pushed back inside `bounds` without changing
    /// its duration (unless the data span itself is smaller).
    pub fn zoomed(
        &self,
        anchor_ratio: f32,
        factor: f64,
        min_duration: u64,
        bounds: TimeRange,
    ) -> TimeRange {
        let duration = self.duration().max(1) as f64;
        let new_duration = (duration * factor).max(min_duration as f64);

        let anchor = self.start as f64 + duration * f64::from(anchor_ratio.clamp(0.0, 1.0));
        let start = anchor - new_duration * f64::from(anchor_ratio.clamp(0.0, 1.0));

        let range = TimeRange {
            start: start.max(0.0) as u64,
            end: (start.max(0.0) + new_duration) as u64,
        };
        range.clamped_to(bounds)
    }

    /// Shifts the window by `delta_ms` (positive = forward in time),
    /// then pushes it back inside `bounds`.
    pub fn panned(&self, delta_ms: i64, bounds: TimeRange) -> TimeRange {
        let start = self.start as i64 + delta_ms;
        let duration = self.duration() as i64;

        let range = TimeRange {
            start: start.max(0) as u64,
            end: (start.max(0) + duration) as u64,
        };
        range.clamped_to(bounds)
    }

    /// Translates the window so it lies within `bounds`, preserving the
    /// duration where possible. A window wider than the data snaps to it.
    fn clamped_to(&self, bounds: TimeRange) -> TimeRange {
        let duration = self.duration();

        if duration >= bounds.duration() {
            return bounds;
        }

        if self.start < bounds.start {
            TimeRange {
                start: bounds.start,
                end: bounds.start + duration,
            }
        } else if self.end > bounds.end {
            TimeRange {
                start: bounds.end - duration,
                end: bounds.end,
            }
        } else {
            *self
        }
    }
}

/// The currently displayed price window. `range` is pre-computed with the
/// degenerate guard applied: a flat span substitutes `1.0` so coordinate
/// math stays defined (a flat line renders at vertical center).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f32,
    pub max: f32,
    pub range: f32,
}

impl PriceRange {
    pub fn from_min_max(min: f32, max: f32) -> Self {
        let span = max - min;
        if span > 0.0 {
            Self { min, max, range: span }
        } else {
            // widen a flat span to a nominal 1.0, centered on the value
            Self {
                min: min - 0.5,
                max: min + 0.5,
                range: 1.0,
            }
        }
    }
}

/// Converts a timestamp to an x pixel. Linear, unclamped: off-screen
/// times map to negative or overflowing x on purpose, the painters clip
/// visually via their own bounds.
pub fn time_to_x(time: u64, width: f32, range: TimeRange) -> f32 {
    let duration = range.duration().max(1) as f64;
    let offset = time as i64 - range.start as i64;

    ((offset as f64 / duration) * f64::from(width)) as f32
}

/// Inverse of [`time_to_x`]. Saturates below the epoch.
pub fn x_to_time(x: f32, width: f32, range: TimeRange) -> u64 {
    if width <= 0.0 {
        return range.start;
    }

    let duration = range.duration() as f64;
    let time = range.start as f64 + (f64::from(x) / f64::from(width)) * duration;
    time.max(0.0) as u64
}

/// Converts a price to a y pixel, inverted: higher price, smaller y.
pub fn price_to_y(price: f32, height: f32, range: &PriceRange) -> f32 {
    height * (1.0 - (price - range.min) / range.range)
}

/// Inverse of [`price_to_y`].
pub fn y_to_price(y: f32, height: f32, range: &PriceRange) -> f32 {
    if height <= 0.0 {
        return range.min;
    }
    range.min + (1.0 - y / height) * range.range
}

/// The per-frame render snapshot: every painter, the tick generator, and
/// hit-testing read from one of these instead of reaching into mutable
/// chart state mid-paint, so a single pass always observes one consistent
/// `{time, price, width, height}` tuple.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub time: TimeRange,
    pub price: PriceRange,
}

impl Viewport {
    pub fn x(&self, time: u64) -> f32 {
        time_to_x(time, self.width, self.time)
    }

    pub fn y(&self, price: f32) -> f32 {
        price_to_y(price, self.height, &self.price)
    }

    pub fn time_at(&self, x: f32) -> u64 {
        x_to_time(x, self.width, self.time)
    }

    pub fn price_at(&self, y: f32) -> f32 {
        y_to_price(y, self.height, &self.price)
    }
}

/// A labeled axis mark at a computed pixel position. Regenerated every
/// render pass, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f32,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 500.0;
    const HEIGHT: f32 = 300.0;

    fn range() -> TimeRange {
        TimeRange { start: 1_000_000, end: 1_600_000 }
    }

    #[test]
    fn time_x_round_trip() {
        let range = range();
        for x in [0.0_f32, 12.5, 250.0, 499.0, 500.0] {
            let time = x_to_time(x, WIDTH, range);
            let back = time_to_x(time, WIDTH, range);
            assert!((back - x).abs() < 0.01, "x={x} came back as {back}");
        }
    }

    #[test]
    fn price_y_round_trip() {
        let pr = PriceRange::from_min_max(90.0, 110.0);
        for y in [0.0_f32, 1.0, 150.0, 299.0, 300.0] {
            let price = y_to_price(y, HEIGHT, &pr);
            let back = price_to_y(price, HEIGHT, &pr);
            assert!((back - y).abs() < 0.01, "y={y} came back as {back}");
        }
    }

    #[test]
    fn off_screen_times_are_not_clamped() {
        let range = range();
        assert!(time_to_x(range.start - 300_000, WIDTH, range) < 0.0);
        assert!(time_to_x(range.end + 300_000, WIDTH, range) > WIDTH);
    }

    #[test]
    fn degenerate_price_range_stays_finite() {
        let pr = PriceRange::from_min_max(100.0, 100.0);
        assert_eq!(pr.range, 1.0);

        let y = price_to_y(100.0, HEIGHT, &pr);
        assert!(y.is_finite());
        // flat data sits at the vertical center
        assert_eq!(y, HEIGHT * 0.5);
    }

    #[test]
    fn higher_price_maps_to_smaller_y() {
        let pr = PriceRange::from_min_max(90.0, 110.0);
        assert!(price_to_y(110.0, HEIGHT, &pr) < price_to_y(90.0, HEIGHT, &pr));
        assert_eq!(price_to_y(110.0, HEIGHT, &pr), 0.0);
        assert_eq!(price_to_y(90.0, HEIGHT, &pr), HEIGHT);
    }

    #[test]
    fn pan_clamps_to_data_bounds() {
        let bounds = TimeRange { start: 0, end: 300_000 };
        let mut visible = TimeRange { start: 60_000, end: 180_000 };

        for _ in 0..100 {
            visible = visible.panned(50_000, bounds);
        }
        assert_eq!(visible.end, bounds.end);
        assert_eq!(visible.duration(), 120_000);

        for _ in 0..100 {
            visible = visible.panned(-50_000, bounds);
        }
        assert_eq!(visible.start, bounds.start);
        assert_eq!(visible.duration(), 120_000);
    }

    #[test]
    fn zoom_floors_at_min_duration() {
        let bounds = TimeRange { start: 0, end: 300_000 };
        let floor = MIN_VISIBLE_INTERVALS * 60_000;
        let mut visible = bounds;

        for _ in 0..200 {
            visible = visible.zoomed(0.5, 0.8, floor, bounds);
        }
        assert_eq!(visible.duration(), floor);
        assert!(visible.start >= bounds.start && visible.end <= bounds.end);
    }

    #[test]
    fn zoom_out_clamps_to_data_bounds() {
        let bounds = TimeRange { start: 0, end: 300_000 };
        let mut visible = TimeRange { start: 100_000, end: 200_000 };

        for _ in 0..50 {
            visible = visible.zoomed(0.3, 1.25, 60_000, bounds);
        }
        assert_eq!(visible, bounds);
    }

    #[test]
    fn zoom_keeps_anchor_time_fixed() {
        let bounds = TimeRange { start: 0, end: 10_000_000 };
        let visible = TimeRange { start: 1_000_000, end: 2_000_000 };

        let anchor_ratio = 0.25;
        let anchor_time = x_to_time(anchor_ratio * WIDTH, WIDTH, visible);

        let zoomed = visible.zoomed(anchor_ratio, 0.5, 1_000, bounds);
        let anchor_after = x_to_time(anchor_ratio * WIDTH, WIDTH, zoomed);

        assert!(anchor_time.abs_diff(anchor_after) <= 2);
    }
}
