pub mod axis;
pub mod overlay;
pub mod plot;

use crate::style;
use axis::{AxisLabelsX, AxisLabelsY};
use data::chart::{AxisSide, ChartType};
use data::config::ChartConfig;
use data::config::timezone::{Clock, UserTimezone};
use data::drawing::{self, ChartPoint, Drawing, Shape, ToolMode};
use data::scale::timeseries::TimeDetail;
use data::scale::{MIN_VISIBLE_INTERVALS, PriceRange, TimeRange, Viewport};
use data::series::IntervalSeries;

use iced::widget::canvas::{self, Cache, Canvas, Event, Frame, LineDash, Path, Stroke};
use iced::{
    Alignment, Element, Length, Point, Rectangle, Renderer, Size, Theme, keyboard, mouse,
    widget::{column, container, row, rule},
};

const ZOOM_SENSITIVITY: f32 = 30.0;
const TEXT_SIZE: f32 = 12.0;
const AXIS_X_HEIGHT: f32 = 26.0;
const AXIS_Y_WIDTH: f32 = 60.0;

/// Per-layer geometry caches. Series geometry survives crosshair moves;
/// everything is rebuilt when the visible window changes.
#[derive(Default)]
pub struct Caches {
    main: Cache,
    x_labels: Cache,
    y_labels: Cache,
    crosshair: Cache,
}

impl Caches {
    fn clear_all(&self) {
        self.main.clear();
        self.x_labels.clear();
        self.y_labels.clear();
        self.crosshair.clear();
    }

    fn clear_crosshair(&self) {
        self.crosshair.clear();
        self.x_labels.clear();
        self.y_labels.clear();
    }
}

/// Canvas-local pointer state.
#[derive(Default, Debug, Clone, Copy)]
pub enum Interaction {
    #[default]
    None,
    Panning {
        last: Point,
    },
    Drawing {
        start: ChartPoint,
        current: ChartPoint,
    },
}

#[derive(Debug, Clone)]
pub enum Message {
    BoundsChanged(Rectangle),
    Panned(i64),
    Zoomed { factor: f64, anchor_ratio: f32 },
    CrosshairMoved,
    ShapeCommitted(Shape),
    ShapeSelected(Option<usize>),
    SelectionDeleted,
    SelectionCleared,
}

pub struct ChartView {
    series: IntervalSeries,
    pub chart_type: ChartType,
    pub tool: ToolMode,
    visible: TimeRange,
    shapes: Vec<Drawing>,
    selected: Option<usize>,
    pub timezone: UserTimezone,
    pub clock: Clock,
    pub time_detail: TimeDetail,
    axis_side: AxisSide,
    x_tick_count: usize,
    y_tick_count: usize,
    bounds: Rectangle,
    caches: Caches,
}

impl ChartView {
    pub fn new(series: IntervalSeries, config: &ChartConfig) -> Self {
        let visible = series
            .time_bounds()
            .unwrap_or(TimeRange { start: 0, end: 1 });

        Self {
            series,
            chart_type: config.chart_type,
            tool: ToolMode::default(),
            visible,
            shapes: Vec::new(),
            selected: None,
            timezone: config.timezone,
            clock: config.clock,
            time_detail: config.time_detail,
            axis_side: config.axis_side,
            x_tick_count: config.x_tick_count,
            y_tick_count: config.y_tick_count,
            bounds: Rectangle::default(),
            caches: Caches::default(),
        }
    }

    /// The consistent per-frame snapshot every painter and hit-test
    /// reads from. `None` until the first layout pass reports bounds.
    pub fn viewport(&self) -> Option<Viewport> {
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 {
            return None;
        }

        let price = self
            .series
            .visible_indices(self.visible)
            .map_or(PriceRange::from_min_max(0.0, 0.0), |indices| {
                self.series.price_range(indices)
            });

        Some(Viewport {
            width: self.bounds.width,
            height: self.bounds.height,
            time: self.visible,
            price,
        })
    }

    fn min_visible_duration(&self) -> u64 {
        MIN_VISIBLE_INTERVALS * self.series.interval_ms()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::BoundsChanged(bounds) => {
                self.bounds = bounds;
                self.caches.clear_all();
            }
            Message::Panned(delta_ms) => {
                if let Some(bounds) = self.series.time_bounds() {
                    self.visible = self.visible.panned(delta_ms, bounds);
                    self.caches.clear_all();
                }
            }
            Message::Zoomed { factor, anchor_ratio } => {
                if let Some(bounds) = self.series.time_bounds() {
                    self.visible = self.visible.zoomed(
                        anchor_ratio,
                        factor,
                        self.min_visible_duration(),
                        bounds,
                    );
                    self.caches.clear_all();
                }
            }
            Message::CrosshairMoved => {
                self.caches.clear_crosshair();
            }
            Message::ShapeCommitted(shape) => {
                self.shapes.push(Drawing::new(shape));
            }
            Message::ShapeSelected(index) => {
                self.selected = index;
            }
            Message::SelectionDeleted => {
                if let Some(index) = self.selected.take()
                    && index < self.shapes.len()
                {
                    self.shapes.remove(index);
                }
            }
            Message::SelectionCleared => {
                self.selected = None;
            }
        }
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
        self.caches.clear_all();
    }

    pub fn set_timezone(&mut self, timezone: UserTimezone) {
        self.timezone = timezone;
        self.caches.clear_all();
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
        self.caches.clear_all();
    }

    pub fn set_time_detail(&mut self, detail: TimeDetail) {
        self.time_detail = detail;
        self.caches.clear_all();
    }

    /// Snapshot of the chart-owned persistable settings; the caller
    /// fills in the app-level ones (theme).
    pub fn config(&self) -> ChartConfig {
        ChartConfig {
            chart_type: self.chart_type,
            time_detail: self.time_detail,
            timezone: self.timezone,
            clock: self.clock,
            axis_side: self.axis_side,
            x_tick_count: self.x_tick_count,
            y_tick_count: self.y_tick_count,
            ..ChartConfig::default()
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let Some(view) = self.viewport() else {
            // First frame: mount the canvas so it can report its bounds.
            return Canvas::new(self)
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        };

        let axis_x = Canvas::new(AxisLabelsX {
            cache: &self.caches.x_labels,
            viewport: view,
            timezone: self.timezone,
            clock: self.clock,
            detail: self.time_detail,
            requested: self.x_tick_count,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let axis_y = Canvas::new(AxisLabelsY {
            cache: &self.caches.y_labels,
            viewport: view,
            requested: self.y_tick_count,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let chart_canvas = container(
            Canvas::new(self).width(Length::Fill).height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill);

        let y_column = container(axis_y)
            .width(Length::Fixed(AXIS_Y_WIDTH))
            .height(Length::Fill);

        let upper: Element<_> = match self.axis_side {
            AxisSide::Right => row![chart_canvas, rule::vertical(1), y_column].into(),
            AxisSide::Left => row![y_column, rule::vertical(1), chart_canvas].into(),
        };

        let x_row: Element<_> = {
            let labels = container(axis_x)
                .width(Length::Fill)
                .height(Length::Fixed(AXIS_X_HEIGHT));
            let corner = container(iced::widget::Space::new())
                .width(Length::Fixed(AXIS_Y_WIDTH))
                .height(Length::Fixed(AXIS_X_HEIGHT));

            match self.axis_side {
                AxisSide::Right => row![labels, corner].into(),
                AxisSide::Left => row![corner, labels].into(),
            }
        };

        column![upper, rule::horizontal(1), x_row].into()
    }

    fn draft_shape(&self, interaction: &Interaction) -> Option<Shape> {
        if let Interaction::Drawing { start, current } = interaction {
            Shape::create(self.tool, *start, *current)
        } else {
            None
        }
    }

    fn draw_crosshair(
        &self,
        frame: &mut Frame,
        theme: &Theme,
        view: &Viewport,
        cursor_position: Point,
    ) {
        let dashed = style::dashed_line(theme);
        let palette = theme.extended_palette();

        // Vertical line snaps to the hovered interval's center.
        let interval_ms = self.series.interval_ms();
        let hovered_time = view.time_at(cursor_position.x);
        let snapped_time =
            (hovered_time as f64 / interval_ms as f64).round() as u64 * interval_ms;
        let snap_x = view.x(snapped_time) + plot::slot_width(interval_ms, view) / 2.0;

        if snap_x >= 0.0 && snap_x <= view.width {
            frame.stroke(
                &Path::line(
                    Point::new(snap_x, 0.0),
                    Point::new(snap_x, view.height),
                ),
                dashed.clone(),
            );

            if let Some(label) = self
                .timezone
                .format_ms(snapped_time as i64, self.clock.hour_minute())
            {
                draw_label(
                    frame,
                    &label,
                    Point::new(snap_x, view.height - TEXT_SIZE),
                    Alignment::Center,
                    palette,
                );
            }
        }

        let price = view.price_at(cursor_position.y);
        frame.stroke(
            &Path::line(
                Point::new(0.0, cursor_position.y),
                Point::new(view.width, cursor_position.y),
            ),
            dashed,
        );
        draw_label(
            frame,
            &format!("{price:.2}"),
            Point::new(view.width - 4.0, cursor_position.y),
            Alignment::End,
            palette,
        );
    }

    fn draw_last_price_line(
        &self,
        frame: &mut Frame,
        palette: &iced::theme::palette::Extended,
        view: &Viewport,
    ) {
        let Some(last) = self.series.iter().last() else {
            return;
        };

        let color = if last.close >= last.open {
            palette.success.base.color
        } else {
            palette.danger.base.color
        };
        let y = view.y(last.close);

        let marker = Stroke::with_color(
            Stroke {
                width: 1.0,
                line_dash: LineDash {
                    segments: &[2.0, 2.0],
                    offset: 4,
                },
                ..Default::default()
            },
            color.scale_alpha(0.5),
        );

        frame.stroke(
            &Path::line(Point::new(0.0, y), Point::new(view.width, y)),
            marker,
        );
    }
}

fn draw_label(
    frame: &mut Frame,
    content: &str,
    position: Point,
    align_x: Alignment,
    palette: &iced::theme::palette::Extended,
) {
    let width = content.chars().count() as f32 * TEXT_SIZE * 0.6;
    let background_x = match align_x {
        Alignment::Start => position.x,
        Alignment::Center => position.x - width / 2.0,
        Alignment::End => position.x - width,
    };

    frame.fill_rectangle(
        Point::new(background_x - 2.0, position.y - TEXT_SIZE * 0.7),
        Size::new(width + 4.0, TEXT_SIZE * 1.4),
        palette.background.weakest.color.scale_alpha(0.9),
    );

    frame.fill_text(canvas::Text {
        content: content.to_string(),
        position,
        color: palette.background.base.text,
        size: iced::Pixels(11.0),
        align_x: align_x.into(),
        align_y: Alignment::Center.into(),
        ..Default::default()
    });
}

fn canvas_interaction(
    chart: &ChartView,
    interaction: &mut Interaction,
    event: &Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
) -> Option<canvas::Action<Message>> {
    if chart.bounds != bounds {
        return Some(canvas::Action::publish(Message::BoundsChanged(bounds)));
    }

    let cursor_position = cursor.position_in(bounds);

    // Leaving the surface cancels a drag without committing anything.
    if cursor_position.is_none()
        && matches!(
            interaction,
            Interaction::Drawing { .. } | Interaction::Panning { .. }
        )
    {
        *interaction = Interaction::None;
        return Some(canvas::Action::request_redraw());
    }

    match event {
        Event::Mouse(mouse_event) => match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let position = cursor_position?;
                let view = chart.viewport()?;

                if chart.tool.is_drawing() {
                    let point = ChartPoint {
                        time: view.time_at(position.x),
                        price: view.price_at(position.y),
                    };
                    *interaction = Interaction::Drawing {
                        start: point,
                        current: point,
                    };
                    Some(canvas::Action::request_redraw().and_capture())
                } else if chart.tool == ToolMode::Select {
                    let hit =
                        drawing::hit_shape(&chart.shapes, position.x, position.y, &view);
                    Some(canvas::Action::publish(Message::ShapeSelected(hit)).and_capture())
                } else {
                    *interaction = Interaction::Panning { last: position };
                    Some(canvas::Action::capture())
                }
            }
            mouse::Event::CursorMoved { .. } => match interaction {
                Interaction::Panning { last } => {
                    let position = cursor_position?;
                    let view = chart.viewport()?;

                    let delta_px = position.x - last.x;
                    *last = position;

                    let delta_ms = (-f64::from(delta_px)
                        * view.time.duration() as f64
                        / f64::from(view.width)) as i64;
                    Some(canvas::Action::publish(Message::Panned(delta_ms)).and_capture())
                }
                Interaction::Drawing { current, .. } => {
                    let position = cursor_position?;
                    let view = chart.viewport()?;

                    *current = ChartPoint {
                        time: view.time_at(position.x),
                        price: view.price_at(position.y),
                    };
                    Some(canvas::Action::request_redraw().and_capture())
                }
                Interaction::None => {
                    cursor_position?;
                    Some(canvas::Action::publish(Message::CrosshairMoved))
                }
            },
            mouse::Event::ButtonReleased(mouse::Button::Left) => match *interaction {
                Interaction::Drawing { start, current } => {
                    *interaction = Interaction::None;
                    Shape::create(chart.tool, start, current).map(|shape| {
                        canvas::Action::publish(Message::ShapeCommitted(shape)).and_capture()
                    })
                }
                Interaction::Panning { .. } => {
                    *interaction = Interaction::None;
                    Some(canvas::Action::capture())
                }
                Interaction::None => None,
            },
            mouse::Event::WheelScrolled { delta } => {
                let position = cursor_position?;
                let view = chart.viewport()?;

                let (x, y) = match delta {
                    mouse::ScrollDelta::Lines { x, y }
                    | mouse::ScrollDelta::Pixels { x, y } => (*x, *y),
                };

                if y.abs() >= x.abs() {
                    // Dominant vertical delta zooms around the pointer.
                    let growth = (1.0 + y / ZOOM_SENSITIVITY).max(0.2);
                    let message = Message::Zoomed {
                        factor: 1.0 / f64::from(growth),
                        anchor_ratio: position.x / view.width,
                    };
                    Some(canvas::Action::publish(message).and_capture())
                } else {
                    let delta_ms = (-f64::from(x) * view.time.duration() as f64
                        / f64::from(view.width)) as i64;
                    Some(canvas::Action::publish(Message::Panned(delta_ms)).and_capture())
                }
            }
            _ => None,
        },
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match key.as_ref() {
            keyboard::Key::Named(keyboard::key::Named::Delete)
            | keyboard::Key::Named(keyboard::key::Named::Backspace) => {
                Some(canvas::Action::publish(Message::SelectionDeleted).and_capture())
            }
            keyboard::Key::Named(keyboard::key::Named::Escape) => {
                *interaction = Interaction::None;
                Some(canvas::Action::publish(Message::SelectionCleared).and_capture())
            }
            _ => None,
        },
        _ => None,
    }
}

impl canvas::Program<Message> for ChartView {
    type State = Interaction;

    fn update(
        &self,
        interaction: &mut Interaction,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        canvas_interaction(self, interaction, event, bounds, cursor)
    }

    fn draw(
        &self,
        interaction: &Interaction,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let Some(view) = self.viewport() else {
            return vec![];
        };
        let palette = theme.extended_palette();

        let main = self.caches.main.draw(renderer, bounds.size(), |frame| {
            plot::draw_series(frame, &self.series, self.chart_type, &view, palette);
            self.draw_last_price_line(frame, palette, &view);
        });

        // Shapes redraw uncached: the draft changes on every pointer move.
        let shapes = {
            let mut frame = Frame::new(renderer, bounds.size());
            overlay::draw_shapes(
                &mut frame,
                &self.shapes,
                self.selected,
                self.draft_shape(interaction).as_ref(),
                &view,
                palette,
            );
            frame.into_geometry()
        };

        let crosshair = self.caches.crosshair.draw(renderer, bounds.size(), |frame| {
            if matches!(interaction, Interaction::None)
                && let Some(position) = cursor.position_in(bounds)
            {
                self.draw_crosshair(frame, theme, &view, position);
            }
        });

        vec![main, shapes, crosshair]
    }

    fn mouse_interaction(
        &self,
        interaction: &Interaction,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match interaction {
            Interaction::Panning { .. } => mouse::Interaction::Grabbing,
            Interaction::Drawing { .. } => mouse::Interaction::Crosshair,
            Interaction::None if cursor.is_over(bounds) => {
                if self.tool.is_drawing() || self.tool == ToolMode::Select {
                    mouse::Interaction::Crosshair
                } else {
                    mouse::Interaction::default()
                }
            }
            Interaction::None => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::series::Interval;

    fn chart_with_series(count: usize) -> ChartView {
        let intervals = (0..count as u64)
            .map(|i| Interval {
                time: i * 60_000,
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: Some(10.0),
            })
            .collect();
        let series = IntervalSeries::new(intervals, 60_000);

        let mut chart = ChartView::new(series, &ChartConfig::default());
        chart.update(Message::BoundsChanged(Rectangle {
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 300.0,
        }));
        chart
    }

    #[test]
    fn panning_left_stops_at_the_first_interval() {
        let mut chart = chart_with_series(10);

        for _ in 0..50 {
            chart.update(Message::Panned(-120_000));
        }

        assert_eq!(chart.visible.start, 0);
    }

    #[test]
    fn zooming_in_floors_at_five_intervals() {
        let mut chart = chart_with_series(100);

        for _ in 0..200 {
            chart.update(Message::Zoomed { factor: 0.8, anchor_ratio: 0.5 });
        }

        assert_eq!(chart.visible.duration(), 5 * 60_000);
    }

    #[test]
    fn committed_shapes_can_be_selected_and_deleted() {
        let mut chart = chart_with_series(10);
        let shape = Shape::Line {
            start: ChartPoint { time: 0, price: 100.0 },
            end: ChartPoint { time: 60_000, price: 105.0 },
        };

        chart.update(Message::ShapeCommitted(shape.clone()));
        chart.update(Message::ShapeCommitted(shape));
        chart.update(Message::ShapeSelected(Some(1)));

        chart.update(Message::SelectionDeleted);
        assert_eq!(chart.shapes.len(), 1);
        assert_eq!(chart.selected, None);

        // Deleting with nothing selected is a no-op.
        chart.update(Message::SelectionDeleted);
        assert_eq!(chart.shapes.len(), 1);
    }

    #[test]
    fn viewport_tracks_visible_price_extrema() {
        let chart = chart_with_series(10);
        let view = chart.viewport().unwrap();

        assert_eq!(view.width, 500.0);
        assert_eq!(view.price.min, 90.0);
        assert_eq!(view.price.max, 110.0);
    }
}
