use data::scale::Viewport;
use data::series::{IndexRange, IntervalSeries};
use iced::theme::palette::Extended;
use iced::widget::canvas::{Frame, Path, Stroke};
use iced::Point;

use super::slot_width;

/// One OHLC bar reduced to its open-to-close stem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    pub bullish: bool,
}

pub fn layout(
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
) -> Vec<Bar> {
    let slot = slot_width(series.interval_ms(), view);

    visible
        .iter()
        .filter_map(|index| {
            let interval = series.get(index)?;
            let x = view.x(interval.time) + slot / 2.0;
            if x < 0.0 || x > view.width {
                return None;
            }

            let open_y = view.y(interval.open);
            let close_y = view.y(interval.close);
            let top = open_y.min(close_y);

            Some(Bar {
                x,
                top,
                // A flat interval still shows a visible stem.
                bottom: open_y.max(close_y).max(top + 1.0),
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
    for bar in layout(series, visible, view) {
        let color = if bar.bullish {
            palette.success.base.color
        } else {
            palette.danger.base.color
        };

        frame.stroke(
            &Path::line(Point::new(bar.x, bar.top), Point::new(bar.x, bar.bottom)),
            Stroke::default().with_width(2.0).with_color(color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::scale::{PriceRange, TimeRange};
    use data::series::Interval;

    #[test]
    fn stems_span_open_to_close_at_slot_centers() {
        let intervals = vec![
            Interval { time: 0, open: 100.0, high: 106.0, low: 94.0, close: 105.0, volume: None },
            Interval { time: 60_000, open: 105.0, high: 106.0, low: 94.0, close: 95.0, volume: None },
        ];
        let series = IntervalSeries::new(intervals, 60_000);
        let time = TimeRange { start: 0, end: 120_000 };
        let view = Viewport {
            width: 200.0,
            height: 120.0,
            time,
            price: PriceRange::from_min_max(94.0, 106.0),
        };

        let bars = layout(&series, series.visible_indices(time).unwrap(), &view);
        assert_eq!(bars.len(), 2);

        assert_eq!(bars[0].x, 50.0);
        assert_eq!(bars[1].x, 150.0);
        assert!(bars[0].bullish);
        assert!(!bars[1].bullish);
        assert!((bars[0].top - view.y(105.0)).abs() < 1e-4);
        assert!((bars[0].bottom - view.y(100.0)).abs() < 1e-4);
    }
}
