use data::scale::Viewport;
use data::series::{IndexRange, IntervalSeries};
use iced::theme::palette::Extended;
use iced::widget::canvas::{Frame, Path, Stroke};
use iced::Point;

use super::slot_width;

/// Close-price polyline points at interval slot centers, in pixels.
/// Points far outside the canvas are skipped; the stroke clips the rest.
pub fn layout(
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
) -> Vec<(f32, f32)> {
    let slot = slot_width(series.interval_ms(), view);
    let (min_x, max_x) = (-slot, view.width + slot / 2.0);

    visible
        .iter()
        .filter_map(|index| {
            let interval = series.get(index)?;
            let x = view.x(interval.time) + slot / 2.0;
            if x < min_x || x > max_x {
                return None;
            }
            Some((x, view.y(interval.close)))
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
    let points = layout(series, visible, view);
    if points.len() < 2 {
        return;
    }

    let path = Path::new(|builder| {
        builder.move_to(Point::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            builder.line_to(Point::new(x, y));
        }
    });

    frame.stroke(
        &path,
        Stroke::default()
            .with_width(1.5)
            .with_color(palette.primary.base.color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::scale::{PriceRange, TimeRange};
    use data::series::Interval;

    fn ramp_series(count: usize) -> IntervalSeries {
        let intervals = (0..count)
            .map(|i| Interval {
                time: i as u64 * 60_000,
                open: 100.0,
                high: 101.0 + i as f32,
                low: 99.0,
                close: 100.0 + i as f32,
                volume: None,
            })
            .collect();
        IntervalSeries::new(intervals, 60_000)
    }

    #[test]
    fn points_follow_closes_in_order() {
        let series = ramp_series(4);
        let time = TimeRange { start: 0, end: 240_000 };
        let view = Viewport {
            width: 400.0,
            height: 200.0,
            time,
            price: PriceRange::from_min_max(99.0, 104.0),
        };

        let points = layout(&series, series.visible_indices(time).unwrap(), &view);
        assert_eq!(points.len(), 4);
        for pair in points.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            // Rising closes mean falling y.
            assert!(pair[0].1 > pair[1].1);
        }
    }
}
