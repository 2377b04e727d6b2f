use data::scale::Viewport;
use data::series::{IndexRange, IntervalSeries};
use iced::theme::palette::Extended;
use iced::widget::canvas::{Frame, Path, Stroke};
use iced::Point;

use super::slot_width;

/// Close-price polyline clipped exactly to the canvas edges. One extra
/// interval on each side feeds the boundary interpolation, so a window
/// that splits an interval still produces a path starting at x=0 and
/// ending at x=width with no jump.
pub fn layout(
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
) -> Vec<(f32, f32)> {
    let slot = slot_width(series.interval_ms(), view);
    let extended = IndexRange {
        start: visible.start.saturating_sub(1),
        end: (visible.end + 1).min(series.len().saturating_sub(1)),
    };

    let raw: Vec<(f32, f32)> = extended
        .iter()
        .filter_map(|index| {
            let interval = series.get(index)?;
            Some((
                view.x(interval.time) + slot / 2.0,
                view.y(interval.close),
            ))
        })
        .collect();

    boundary_clipped(&raw, view.width)
}

/// Clips an x-ascending polyline to `[0, width]`, replacing off-canvas
/// endpoints with the exact linear interpolation at the crossed edge.
pub fn boundary_clipped(points: &[(f32, f32)], width: f32) -> Vec<(f32, f32)> {
    let mut out = Vec::with_capacity(points.len());

    for (i, &(x, y)) in points.iter().enumerate() {
        if x < 0.0 {
            continue;
        }
        if x > width {
            if let Some(&(px, py)) = i.checked_sub(1).and_then(|p| points.get(p))
                && px <= width
            {
                out.push((width, interp_at(width, (px, py), (x, y))));
            }
            break;
        }

        if out.is_empty()
            && let Some(&(px, py)) = i.checked_sub(1).and_then(|p| points.get(p))
            && px < 0.0
            && x > 0.0
        {
            out.push((0.0, interp_at(0.0, (px, py), (x, y))));
        }
        out.push((x, y));
    }

    out
}

fn interp_at(x: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    if dx.abs() < f32::EPSILON {
        return a.1;
    }
    a.1 + (x - a.0) / dx * (b.1 - a.1)
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

    let outline = Path::new(|builder| {
        builder.move_to(Point::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            builder.line_to(Point::new(x, y));
        }
    });

    let filled = Path::new(|builder| {
        builder.move_to(Point::new(points[0].0, view.height));
        for &(x, y) in &points {
            builder.line_to(Point::new(x, y));
        }
        builder.line_to(Point::new(points[points.len() - 1].0, view.height));
        builder.close();
    });

    frame.fill(&filled, palette.primary.base.color.scale_alpha(0.15));
    frame.stroke(
        &outline,
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

    #[test]
    fn clipping_interpolates_exact_edge_values() {
        let points = vec![(-20.0, 10.0), (30.0, 60.0), (80.0, 20.0), (130.0, 70.0)];
        let clipped = boundary_clipped(&points, 100.0);

        assert_eq!(clipped.first(), Some(&(0.0, 30.0)));
        assert_eq!(clipped.last(), Some(&(100.0, 40.0)));
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn fully_inside_points_pass_through() {
        let points = vec![(10.0, 5.0), (50.0, 9.0)];
        assert_eq!(boundary_clipped(&points, 100.0), points);
    }

    #[test]
    fn split_boundary_intervals_reach_both_edges_exactly() {
        let intervals: Vec<Interval> = (0..5u64)
            .map(|i| Interval {
                time: i * 60_000,
                open: 100.0,
                high: 105.0,
                low: 95.0,
                close: 100.0 + i as f32,
                volume: None,
            })
            .collect();
        let series = IntervalSeries::new(intervals, 60_000);

        // The window splits the second and fourth intervals.
        let time = TimeRange { start: 80_000, end: 200_000 };
        let view = Viewport {
            width: 240.0,
            height: 200.0,
            time,
            price: PriceRange::from_min_max(95.0, 105.0),
        };

        let points = layout(&series, series.visible_indices(time).unwrap(), &view);

        assert!(points.len() >= 2);
        assert_eq!(points.first().unwrap().0, 0.0);
        assert_eq!(points.last().unwrap().0, 240.0);
    }
}
