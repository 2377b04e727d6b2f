use data::config::timezone::{Clock, UserTimezone};
use data::scale::timeseries::{self, TimeDetail};
use data::scale::{Viewport, linear};

use iced::widget::canvas::{self, Cache, Event, Path, Stroke};
use iced::{Alignment, Point, Rectangle, Renderer, Theme, mouse};

use super::Message;

const TEXT_SIZE: f32 = 12.0;
const CHAR_WIDTH: f32 = TEXT_SIZE * 0.6;
const MARK_LENGTH: f32 = 4.0;

/// Time axis strip under the chart. Wheel input zooms the chart around
/// the hovered position.
pub struct AxisLabelsX<'a> {
    pub cache: &'a Cache,
    pub viewport: Viewport,
    pub timezone: UserTimezone,
    pub clock: Clock,
    pub detail: TimeDetail,
    pub requested: usize,
}

impl canvas::Program<Message> for AxisLabelsX<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let position = cursor.position_in(bounds)?;

        if let Event::Mouse(mouse::Event::WheelScrolled { delta }) = event {
            let y = match delta {
                mouse::ScrollDelta::Lines { y, .. }
                | mouse::ScrollDelta::Pixels { y, .. } => *y,
            };
            let growth = (1.0 + y / super::ZOOM_SENSITIVITY).max(0.2);
            let message = Message::Zoomed {
                factor: 1.0 / f64::from(growth),
                anchor_ratio: position.x / bounds.width,
            };
            return Some(canvas::Action::publish(message).and_capture());
        }

        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let palette = theme.extended_palette();

        let labels = self.cache.draw(renderer, bounds.size(), |frame| {
            let ticks = timeseries::generate_time_ticks(
                self.viewport.time,
                self.viewport.width,
                self.requested,
                self.detail,
                self.timezone,
                self.clock,
            );
            let keep = timeseries::visible_labels(&ticks, CHAR_WIDTH);

            for (tick, keep_label) in ticks.iter().zip(keep) {
                frame.stroke(
                    &Path::line(
                        Point::new(tick.position, 0.0),
                        Point::new(tick.position, MARK_LENGTH),
                    ),
                    Stroke::default()
                        .with_width(1.0)
                        .with_color(palette.background.strong.color),
                );

                if keep_label {
                    frame.fill_text(canvas::Text {
                        content: tick.label.clone(),
                        position: Point::new(tick.position, bounds.height / 2.0 + 2.0),
                        color: palette.background.base.text,
                        size: iced::Pixels(TEXT_SIZE),
                        align_x: Alignment::Center.into(),
                        align_y: Alignment::Center.into(),
                        ..Default::default()
                    });
                }
            }
        });

        vec![labels]
    }
}

/// Price axis strip beside the chart.
pub struct AxisLabelsY<'a> {
    pub cache: &'a Cache,
    pub viewport: Viewport,
    pub requested: usize,
}

impl canvas::Program<Message> for AxisLabelsY<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        _event: &Event,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let palette = theme.extended_palette();

        let labels = self.cache.draw(renderer, bounds.size(), |frame| {
            let ticks = linear::generate_price_ticks(
                &self.viewport.price,
                self.viewport.height,
                self.requested,
            );

            for tick in &ticks {
                frame.stroke(
                    &Path::line(
                        Point::new(0.0, tick.position),
                        Point::new(MARK_LENGTH, tick.position),
                    ),
                    Stroke::default()
                        .with_width(1.0)
                        .with_color(palette.background.strong.color),
                );

                // Clamp edge labels into the strip.
                let y = tick
                    .position
                    .clamp(TEXT_SIZE / 2.0, bounds.height - TEXT_SIZE / 2.0);

                frame.fill_text(canvas::Text {
                    content: tick.label.clone(),
                    position: Point::new(MARK_LENGTH + 4.0, y),
                    color: palette.background.base.text,
                    size: iced::Pixels(TEXT_SIZE),
                    align_x: Alignment::Start.into(),
                    align_y: Alignment::Center.into(),
                    ..Default::default()
                });
            }
        });

        vec![labels]
    }
}
