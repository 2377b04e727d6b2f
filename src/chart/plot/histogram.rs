use data::scale::Viewport;
use data::series::{IndexRange, IntervalSeries};
use iced::theme::palette::Extended;
use iced::widget::canvas::Frame;
use iced::{Point, Size};

use super::slot_width;

const BAR_FACTOR: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub bullish: bool,
}

/// Volume bars scaled against the largest visible volume. Intervals
/// without a volume are skipped; if none carries one, nothing is drawn.
pub fn layout(
    series: &IntervalSeries,
    visible: IndexRange,
    view: &Viewport,
) -> Vec<VolumeBar> {
    let Some(volume_range) = series.volume_range(visible) else {
        return vec![];
    };
    let max_volume = volume_range.max;
    if max_volume <= 0.0 {
        return vec![];
    }

    let slot = slot_width(series.interval_ms(), view);
    let bar_width = (slot * BAR_FACTOR).max(1.0);

    visible
        .iter()
        .filter_map(|index| {
            let interval = series.get(index)?;
            let volume = interval.volume?;

            let mut x = view.x(interval.time) + (slot - bar_width) / 2.0;
            let mut width = bar_width;
            if x < 0.0 {
                width += x;
                x = 0.0;
            }
            if x + width > view.width {
                width = view.width - x;
            }
            if width <= 0.0 {
                return None;
            }

            Some(VolumeBar {
                x,
                width,
                height: (volume / max_volume) * view.height,
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

        frame.fill_rectangle(
            Point::new(bar.x, view.height - bar.height),
            Size::new(bar.width, bar.height),
            color.scale_alpha(0.8),
        );
    }
}
