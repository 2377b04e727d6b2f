use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use super::{Tick, TimeRange, time_to_x};
use crate::config::timezone::{Clock, UserTimezone};
use crate::util::{
    reset_to_start_of_day_utc, reset_to_start_of_hour_utc, reset_to_start_of_minute_utc,
    reset_to_start_of_month_utc, reset_to_start_of_second_utc, reset_to_start_of_year_utc,
};

/// Minimum horizontal room a time label needs before another tick fits.
pub const MIN_TICK_SPACING: f32 = 80.0;
/// Gap kept between adjacent labels during overlap suppression.
pub const LABEL_MARGIN: f32 = 8.0;

/// User-facing granularity override for the time axis. `Auto` picks a
/// calendar unit from the visible duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeDetail {
    #[default]
    Auto,
    Low,
    Medium,
    High,
}

impl TimeDetail {
    pub const ALL: [TimeDetail; 4] = [
        TimeDetail::Auto,
        TimeDetail::Low,
        TimeDetail::Medium,
        TimeDetail::High,
    ];
}

impl std::fmt::Display for TimeDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeDetail::Auto => write!(f, "Auto"),
            TimeDetail::Low => write!(f, "Monthly"),
            TimeDetail::Medium => write!(f, "Daily"),
            TimeDetail::High => write!(f, "Hourly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    fn millis(self) -> u64 {
        match self {
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Day => 86_400_000,
            // Month and year use nominal lengths; stepping itself is
            // calendar-exact via chrono.
            TimeUnit::Month => 30 * 86_400_000,
            TimeUnit::Year => 365 * 86_400_000,
        }
    }
}

fn select_unit(duration_ms: u64, detail: TimeDetail) -> TimeUnit {
    match detail {
        TimeDetail::High => TimeUnit::Hour,
        TimeDetail::Medium => TimeUnit::Day,
        TimeDetail::Low => TimeUnit::Month,
        TimeDetail::Auto => match duration_ms {
            d if d <= 3 * 60_000 => TimeUnit::Second,
            d if d <= 3 * 3_600_000 => TimeUnit::Minute,
            d if d <= 12 * 3_600_000 => TimeUnit::Hour,
            d if d <= 45 * 86_400_000 => TimeUnit::Day,
            d if d <= 366 * 86_400_000 => TimeUnit::Month,
            _ => TimeUnit::Year,
        },
    }
}

/// Truncates to the unit boundary at or before `dt`.
fn truncate(dt: DateTime<Utc>, unit: TimeUnit) -> DateTime<Utc> {
    match unit {
        TimeUnit::Second => reset_to_start_of_second_utc(dt),
        TimeUnit::Minute => reset_to_start_of_minute_utc(dt),
        TimeUnit::Hour => reset_to_start_of_hour_utc(dt),
        TimeUnit::Day => reset_to_start_of_day_utc(dt),
        TimeUnit::Month => reset_to_start_of_month_utc(dt),
        TimeUnit::Year => reset_to_start_of_year_utc(dt),
    }
}

fn advance(dt: DateTime<Utc>, unit: TimeUnit, step: u32) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => dt.checked_add_signed(Duration::seconds(step.into())),
        TimeUnit::Minute => dt.checked_add_signed(Duration::minutes(step.into())),
        TimeUnit::Hour => dt.checked_add_signed(Duration::hours(step.into())),
        TimeUnit::Day => dt.checked_add_signed(Duration::days(step.into())),
        TimeUnit::Month => dt
            .checked_add_months(Months::new(step))
            .map(reset_to_start_of_month_utc),
        TimeUnit::Year => dt
            .checked_add_months(Months::new(step.checked_mul(12)?))
            .map(reset_to_start_of_year_utc),
    }
}

/// First unit boundary at or after `start_ms`.
fn anchor_after(start_ms: u64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    let dt = DateTime::from_timestamp_millis(i64::try_from(start_ms).ok()?)?;
    let truncated = truncate(dt, unit);

    if truncated.timestamp_millis() >= start_ms as i64 {
        Some(truncated)
    } else {
        advance(truncated, unit, 1)
    }
}

fn format_label(
    dt: DateTime<Utc>,
    unit: TimeUnit,
    timezone: UserTimezone,
    clock: Clock,
) -> String {
    let fmt = match unit {
        TimeUnit::Second => clock.hour_minute_second(),
        TimeUnit::Minute | TimeUnit::Hour => clock.hour_minute(),
        TimeUnit::Day => "%b %-d",
        TimeUnit::Month => "%b %Y",
        TimeUnit::Year => "%Y",
    };
    timezone.format(dt, fmt)
}

/// Generates time-axis ticks at calendar boundaries of an adaptive unit.
///
/// Ticks land on whole seconds, minutes, hours, midnights, month firsts
/// or January firsts, stepped towards `requested` labels and hard-capped
/// at `width / 80px`. Positions are ascending and stay inside `[0, width]`.
/// An invalid range, non-positive width or zero request yields no ticks.
pub fn generate_time_ticks(
    range: TimeRange,
    width: f32,
    requested: usize,
    detail: TimeDetail,
    timezone: UserTimezone,
    clock: Clock,
) -> Vec<Tick> {
    if !range.is_valid() || width <= 0.0 || requested == 0 {
        return vec![];
    }

    let fit_by_width = (width / MIN_TICK_SPACING).floor() as usize;
    let max_ticks = requested.min(fit_by_width);
    if max_ticks == 0 {
        return vec![];
    }

    let unit = select_unit(range.duration(), detail);
    let total_units = range.duration().div_ceil(unit.millis()).max(1);
    let step = (total_units.div_ceil(max_ticks as u64)).max(1);
    let step = u32::try_from(step).unwrap_or(u32::MAX);

    let mut ticks = Vec::new();
    let mut current = anchor_after(range.start, unit);

    while let Some(dt) = current {
        let ts = dt.timestamp_millis();
        if ts < 0 || ts as u64 > range.end {
            break;
        }
        if ts as u64 >= range.start {
            ticks.push(Tick {
                position: time_to_x(ts as u64, width, range),
                label: format_label(dt, unit, timezone, clock),
            });
        }
        current = advance(dt, unit, step);
    }

    if ticks.is_empty() {
        return endpoint_fallback(range, width, unit, timezone, clock);
    }

    // A window with both edges on unit boundaries emits one tick past the
    // cap; the count must never exceed what the width can hold.
    ticks.truncate(fit_by_width);
    ticks
}

/// When no unit boundary falls inside the window, label both edges so
/// the axis is never blank.
fn endpoint_fallback(
    range: TimeRange,
    width: f32,
    unit: TimeUnit,
    timezone: UserTimezone,
    clock: Clock,
) -> Vec<Tick> {
    let mut ticks = Vec::with_capacity(2);

    for (ms, position) in [(range.start, 0.0), (range.end, width)] {
        let Some(dt) = DateTime::from_timestamp_millis(ms as i64) else {
            continue;
        };
        ticks.push(Tick {
            position,
            label: format_label(dt, unit, timezone, clock),
        });
    }

    ticks
}

/// Marks which of an ascending tick run keep their label after overlap
/// suppression. Labels are centered on their tick; a label survives only
/// if its left edge clears the previous survivor by [`LABEL_MARGIN`].
pub fn visible_labels(ticks: &[Tick], char_width: f32) -> Vec<bool> {
    let mut keep = Vec::with_capacity(ticks.len());
    let mut last_right = f32::NEG_INFINITY;

    for tick in ticks {
        let half = ticks_label_width(tick, char_width) / 2.0;
        let (left, right) = (tick.position - half, tick.position + half);

        if left >= last_right + LABEL_MARGIN {
            keep.push(true);
            last_right = right;
        } else {
            keep.push(false);
        }
    }

    keep
}

fn ticks_label_width(tick: &Tick, char_width: f32) -> f32 {
    tick.label.chars().count() as f32 * char_width
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2023: u64 = 1_672_531_200_000;
    const DAY_MS: u64 = 86_400_000;

    fn ticks(
        range: TimeRange,
        width: f32,
        requested: usize,
        detail: TimeDetail,
    ) -> Vec<Tick> {
        generate_time_ticks(
            range,
            width,
            requested,
            detail,
            UserTimezone::Utc,
            Clock::TwentyFourHour,
        )
    }

    #[test]
    fn ten_days_from_jan_1_yield_daily_labels() {
        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + 10 * DAY_MS,
        };
        let got = ticks(range, 1000.0, 10, TimeDetail::Auto);

        assert!(got.len() == 10 || got.len() == 11, "got {} ticks", got.len());
        assert_eq!(got[0].label, "Jan 1");
        assert_eq!(got[1].label, "Jan 2");
        assert_eq!(got.last().unwrap().label, "Jan 11");
    }

    #[test]
    fn ticks_stay_inside_the_canvas_in_ascending_order() {
        let range = TimeRange {
            start: JAN_1_2023 + 3 * 3_600_000 + 17 * 60_000,
            end: JAN_1_2023 + 90 * DAY_MS + 5 * 3_600_000,
        };
        let width = 640.0;
        let got = ticks(range, width, 20, TimeDetail::Auto);

        assert!(!got.is_empty());
        for pair in got.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
        for tick in &got {
            assert!(tick.position >= 0.0 && tick.position <= width);
        }
    }

    #[test]
    fn narrow_canvas_produces_fewer_ticks() {
        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + 30 * DAY_MS,
        };
        let wide = ticks(range, 1200.0, 30, TimeDetail::Auto);
        let narrow = ticks(range, 240.0, 30, TimeDetail::Auto);

        assert!(narrow.len() <= (240.0_f32 / MIN_TICK_SPACING) as usize);
        assert!(narrow.len() < wide.len());
    }

    #[test]
    fn boundary_aligned_window_respects_the_width_cap() {
        // Both edges on midnight: the emit loop reaches 6 boundaries,
        // but 400px only has room for 5 labels.
        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + 5 * DAY_MS,
        };
        let width = 400.0;
        let got = ticks(range, width, 10, TimeDetail::Auto);

        let cap = (width / MIN_TICK_SPACING) as usize;
        assert!(got.len() <= cap, "{} ticks, room for {cap}", got.len());
        assert_eq!(got[0].label, "Jan 1");
    }

    #[test]
    fn detail_override_forces_the_unit() {
        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + 400 * DAY_MS,
        };
        let monthly = ticks(range, 1000.0, 12, TimeDetail::Low);
        assert_eq!(monthly[0].label, "Jan 2023");
        assert!(monthly.len() <= 13);

        let daily = ticks(range, 1000.0, 12, TimeDetail::Medium);
        assert!(daily[0].label.starts_with("Jan"));
        assert!(daily.len() <= 12);
    }

    #[test]
    fn sub_unit_window_falls_back_to_both_endpoints() {
        // 200ms window: no whole-second boundary inside.
        let start = JAN_1_2023 + 300;
        let range = TimeRange {
            start,
            end: start + 200,
        };
        let got = ticks(range, 800.0, 10, TimeDetail::Auto);

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].position, 0.0);
        assert_eq!(got[1].position, 800.0);
    }

    #[test]
    fn invalid_inputs_yield_no_ticks() {
        let inverted = TimeRange {
            start: JAN_1_2023 + DAY_MS,
            end: JAN_1_2023,
        };
        assert!(ticks(inverted, 800.0, 10, TimeDetail::Auto).is_empty());

        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + DAY_MS,
        };
        assert!(ticks(range, 0.0, 10, TimeDetail::Auto).is_empty());
        assert!(ticks(range, 800.0, 0, TimeDetail::Auto).is_empty());
    }

    #[test]
    fn year_spans_label_january_firsts() {
        let range = TimeRange {
            start: JAN_1_2023,
            end: JAN_1_2023 + 3 * 365 * DAY_MS,
        };
        let got = ticks(range, 900.0, 8, TimeDetail::Auto);

        assert!(got.iter().any(|t| t.label == "2024"));
        assert!(got.iter().all(|t| t.label.len() == 4));
    }

    #[test]
    fn overlap_suppression_keeps_spaced_labels() {
        let crowded = vec![
            Tick { position: 10.0, label: "Jan 1".into() },
            Tick { position: 20.0, label: "Jan 2".into() },
            Tick { position: 200.0, label: "Jan 3".into() },
        ];
        let keep = visible_labels(&crowded, 7.0);
        assert_eq!(keep, vec![true, false, true]);
    }
}
