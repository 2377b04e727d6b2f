pub mod area;
pub mod bar;
pub mod candlestick;
pub mod histogram;
pub mod line;

use data::chart::ChartType;
use data::scale::Viewport;
use data::series::IntervalSeries;
use iced::theme::palette::Extended;
use iced::widget::canvas::Frame;

/// Pixel width one interval occupies at the current zoom.
pub fn slot_width(interval_ms: u64, view: &Viewport) -> f32 {
    let duration = view.time.duration().max(1) as f64;
    ((interval_ms as f64 / duration) * f64::from(view.width)) as f32
}

/// Paints the visible part of `series` in the selected style. Every
/// painter maps through `view` only, so series and axes stay aligned.
/// An empty visible window paints nothing.
pub fn draw_series(
    frame: &mut Frame,
    series: &IntervalSeries,
    chart_type: ChartType,
    view: &Viewport,
    palette: &Extended,
) {
    let Some(visible) = series.visible_indices(view.time) else {
        return;
    };

    match chart_type {
        ChartType::Candlestick => candlestick::draw(frame, series, visible, view, palette),
        ChartType::Line => line::draw(frame, series, visible, view, palette),
        ChartType::Area => area::draw(frame, series, visible, view, palette),
        ChartType::Bar => bar::draw(frame, series, visible, view, palette),
        ChartType::Histogram => histogram::draw(frame, series, visible, view, palette),
    }
}
