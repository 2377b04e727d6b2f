use data::scale::{Viewport, price_to_y};
use data::series::{IndexRange, IntervalSeries};
use iced::theme::palette::Extended;
use iced::widget::canvas::{Frame, Path, Stroke};
use iced::{Point, Size};

use super::slot_width;

const BODY_FACTOR: f32 = 0.8;

/// Pixel geometry of one candle, pre-clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Left edge of the interval's slot, unclipped.
    pub slot_x: f32,
    pub body_x: f32,
    pub body_width: f32,
    pub body_top: f32,
    pub body_height: f32,
    pub wick_x: f32,
    pub wick_top: f32,
    pub wick_bottom: f32,
    pub bullish: bool,
}

/// Lays out every visible candle. Partially visible edge candles are
/// clipped by adjusting their draw-x and width instead of dropping them;
/// a flat body still gets 1px of height.
pub fn layout(
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
) -> Vec<Candle> {
    let slot = slot_width(series.interval_ms(), view);
    let body_width = (slot * BODY_FACTOR).max(1.0);

    visible
        .iter()
        .filter_map(|index| {
            let interval = series.get(index)?;
            let slot_x = view.x(interval.time);

            let mut body_x = slot_x + (slot - body_width) / 2.0;
            let mut body_w = body_width;
            if body_x < 0.0 {
                body_w += body_x;
                body_x = 0.0;
            }
            if body_x + body_w > view.width {
                body_w = view.width - body_x;
            }
            let body_w = body_w.max(0.0);

            let top = price_to_y(interval.open.max(interval.close), view.height, &view.price);
            let bottom = price_to_y(interval.open.min(interval.close), view.height, &view.price);

            Some(Candle {
                slot_x,
                body_x,
                body_width: body_w,
                body_top: top,
                body_height: (bottom - top).max(1.0),
                wick_x: slot_x + slot / 2.0,
                wick_top: view.y(interval.high),
                wick_bottom: view.y(interval.low),
                bullish: interval.close >= interval.open,
            })
        })
        .collect()
}

pub fn draw(
    frame: &mut Frame,
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
    palette: &Extended,
) {
    for candle in layout(series, visible, view) {
        let color = if candle.bullish {
            palette.success.base.color
        } else {
            palette.danger.base.color
        };

        if candle.wick_x >= 0.0 && candle.wick_x <= view.width {
            frame.stroke(
                &Path::line(
                    Point::new(candle.wick_x, candle.wick_top),
                    Point::new(candle.wick_x, candle.wick_bottom),
                ),
                Stroke::default().with_width(1.0).with_color(color),
            );
        }

        if candle.body_width > 0.0 {
            frame.fill_rectangle(
                Point::new(candle.body_x, candle.body_top),
                Size::new(candle.body_width, candle.body_height),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::scale::{PriceRange, TimeRange};
    use data::series::Interval;

    fn constant_series(count: usize, interval_ms: u64) -> IntervalSeries {
        let intervals = (0..count)
            .map(|i| Interval {
                time: i as u64 * interval_ms,
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: None,
            })
            .collect();
        IntervalSeries::new(intervals, interval_ms)
    }

    #[test]
    fn five_constant_intervals_fill_the_canvas() {
        let series = constant_series(5, 60_000);
        let time = TimeRange { start: 0, end: 240_000 };
        let view = Viewport {
            width: 500.0,
            height: 300.0,
            time,
            price: PriceRange::from_min_max(90.0, 110.0),
        };

        let visible = series.visible_indices(time).unwrap();
        let candles = layout(&series, visible, &view);

        assert_eq!(candles.len(), 5);

        let wick_high = view.y(110.0);
        let wick_low = view.y(90.0);
        for pair in candles.windows(2) {
            assert!(pair[0].slot_x < pair[1].slot_x);
            // Bodies never overlap horizontally.
            assert!(pair[0].body_x + pair[0].body_width <= pair[1].body_x + 1e-3);
        }
        for candle in &candles {
            assert!(candle.slot_x >= 0.0 && candle.slot_x <= 500.0);
            assert!((candle.wick_top - wick_high).abs() < 1e-4);
            assert!((candle.wick_bottom - wick_low).abs() < 1e-4);
            assert!(candle.bullish);
        }
    }

    #[test]
    fn flat_body_keeps_one_pixel_of_height() {
        let intervals = vec![Interval {
            time: 0,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: None,
        }];
        let series = IntervalSeries::new(intervals, 60_000);
        let time = TimeRange { start: 0, end: 60_000 };
        let view = Viewport {
            width: 100.0,
            height: 100.0,
            time,
            price: PriceRange::from_min_max(99.0, 101.0),
        };

        let candles = layout(&series, series.visible_indices(time).unwrap(), &view);
        assert_eq!(candles.len(), 1);
        assert!(candles[0].body_height >= 1.0);
    }

    #[test]
    fn edge_candles_are_clipped_not_dropped() {
        let series = constant_series(5, 60_000);
        // Window starts mid-way through the first interval.
        let time = TimeRange { start: 30_000, end: 270_000 };
        let view = Viewport {
            width: 400.0,
            height: 300.0,
            time,
            price: PriceRange::from_min_max(90.0, 110.0),
        };

        let candles = layout(&series, series.visible_indices(time).unwrap(), &view);

        let first = candles.first().unwrap();
        assert_eq!(first.body_x, 0.0);
        assert!(first.body_width > 0.0);
        assert!(first.body_width < slot_width(60_000, &view) * BODY_FACTOR);

        let last = candles.last().unwrap();
        assert!(last.body_x + last.body_width <= view.width + 1e-3);
    }
}
