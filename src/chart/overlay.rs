use data::drawing::{Drawing, Shape, SYMBOL_HALF_SIZE, TEXT_LINE_HEIGHT};
use data::scale::Viewport;

use iced::theme::palette::Extended;
use iced::widget::canvas::path::arc::Elliptical;
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::{Alignment, Color, Point, Radians, Size, Vector};

use crate::style;

const ARROW_HEAD_LENGTH: f32 = 12.0;
const HANDLE_RADIUS: f32 = 3.5;

/// Paints committed drawings in insertion order, then the in-progress
/// draft, then selection handles on top.
pub fn draw_shapes(
    frame: &mut Frame,
    drawings: &[Drawing],
    selected: Option<usize>,
    draft: Option<&Shape>,
    view: &Viewport,
    palette: &Extended,
) {
    for (index, drawing) in drawings.iter().enumerate() {
        let color = if selected == Some(index) {
            style::selection_color(palette)
        } else {
            drawing
                .color
                .as_deref()
                .and_then(style::hex_to_color)
                .unwrap_or_else(|| style::shape_color(palette))
        };
        draw_shape(frame, &drawing.shape, view, color, palette);
    }

    if let Some(draft) = draft {
        draw_shape(frame, draft, view, style::draft_shape_color(palette), palette);
    }

    if let Some(drawing) = selected.and_then(|index| drawings.get(index)) {
        let accent = style::selection_color(palette);
        for point in drawing.shape.points() {
            let center = Point::new(view.x(point.time), view.y(point.price));
            frame.fill(&Path::circle(center, HANDLE_RADIUS), accent);
        }
    }
}

fn draw_shape(
    frame: &mut Frame,
    shape: &Shape,
    view: &Viewport,
    color: Color,
    palette: &Extended,
) {
    let stroke = Stroke::default().with_width(1.5).with_color(color);
    let px = |p: &data::drawing::ChartPoint| Point::new(view.x(p.time), view.y(p.price));

    match shape {
        Shape::Line { start, end } => {
            frame.stroke(&Path::line(px(start), px(end)), stroke);
        }
        Shape::Arrow { start, end } => {
            let (a, b) = (px(start), px(end));
            frame.stroke(&Path::line(a, b), stroke.clone());
            frame.stroke(&arrow_head(a, b), stroke);
        }
        Shape::Rectangle { a, b } => {
            let (pa, pb) = (px(a), px(b));
            let top_left = Point::new(pa.x.min(pb.x), pa.y.min(pb.y));
            let size = Size::new((pa.x - pb.x).abs(), (pa.y - pb.y).abs());
            frame.stroke(&Path::rectangle(top_left, size), stroke);
        }
        Shape::Ellipse { a, b } => {
            let (pa, pb) = (px(a), px(b));
            let path = Path::new(|builder| {
                builder.ellipse(Elliptical {
                    center: Point::new((pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0),
                    radii: Vector::new((pa.x - pb.x).abs() / 2.0, (pa.y - pb.y).abs() / 2.0),
                    rotation: Radians(0.0),
                    start_angle: Radians(0.0),
                    end_angle: Radians(std::f32::consts::TAU),
                });
            });
            frame.stroke(&path, stroke);
        }
        Shape::Triangle { a, b, c } => {
            let path = Path::new(|builder| {
                builder.move_to(px(a));
                builder.line_to(px(b));
                builder.line_to(px(c));
                builder.close();
            });
            frame.stroke(&path, stroke);
        }
        Shape::Angle { vertex, through } => {
            let (v, t) = (px(vertex), px(through));
            let reach = (t.x - v.x).hypot(t.y - v.y);
            let reference = Point::new(v.x + reach * (t.x - v.x).signum(), v.y);

            frame.stroke(&Path::line(v, t), stroke.clone());
            frame.stroke(&Path::line(v, reference), stroke);

            let degrees = (v.y - t.y).atan2(t.x - v.x).to_degrees().abs();
            frame.fill_text(canvas::Text {
                content: format!("{degrees:.0}°"),
                position: Point::new(v.x, v.y - 8.0),
                color,
                size: iced::Pixels(11.0),
                align_x: Alignment::Center.into(),
                align_y: Alignment::End.into(),
                ..Default::default()
            });
        }
        Shape::Polyline { points } => {
            if points.len() < 2 {
                return;
            }
            let path = Path::new(|builder| {
                builder.move_to(px(&points[0]));
                for point in &points[1..] {
                    builder.line_to(px(point));
                }
            });
            frame.stroke(&path, stroke);
        }
        Shape::Symbol { at } => {
            frame.fill(&Path::circle(px(at), SYMBOL_HALF_SIZE / 2.0), color);
            frame.stroke(&Path::circle(px(at), SYMBOL_HALF_SIZE), stroke);
        }
        Shape::Text { at, content } => {
            let position = px(at);
            frame.fill_text(canvas::Text {
                content: content.clone(),
                position: Point::new(position.x, position.y + TEXT_LINE_HEIGHT / 2.0),
                color: if content.is_empty() {
                    palette.background.strong.color
                } else {
                    color
                },
                size: iced::Pixels(TEXT_LINE_HEIGHT - 2.0),
                align_x: Alignment::Start.into(),
                align_y: Alignment::Center.into(),
                ..Default::default()
            });
        }
    }
}

/// Two short strokes forming the head at the arrow's end point.
fn arrow_head(from: Point, to: Point) -> Path {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let spread = std::f32::consts::PI / 7.0;

    Path::new(|builder| {
        for side in [-1.0, 1.0] {
            let theta = angle + std::f32::consts::PI + side * spread;
            builder.move_to(to);
            builder.line_to(Point::new(
                to.x + ARROW_HEAD_LENGTH * theta.cos(),
                to.y + ARROW_HEAD_LENGTH * theta.sin(),
            ));
        }
    })
}
