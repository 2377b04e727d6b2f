#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod chart;
mod logger;
mod style;

use chart::ChartView;
use data::chart::ChartType;
use data::config::{self, ChartConfig};
use data::config::timezone::{Clock, UserTimezone};
use data::drawing::ToolMode;
use data::scale::timeseries::TimeDetail;
use data::series::{Interval, IntervalSeries};

use iced::{
    Element, Length, Task, Theme, padding,
    widget::{button, column, container, pick_list, row, text},
};

fn main() -> iced::Result {
    logger::setup(cfg!(debug_assertions)).expect("Failed to initialize logger");

    iced::application(CandleView::new, CandleView::update, CandleView::view)
        .settings(iced::Settings {
            antialiasing: true,
            default_text_size: iced::Pixels(12.0),
            ..Default::default()
        })
        .title("candleview")
        .theme(CandleView::theme)
        .run()
}

struct CandleView {
    chart: ChartView,
    theme: Theme,
}

#[derive(Debug, Clone)]
enum Message {
    Chart(chart::Message),
    ChartTypeSelected(ChartType),
    ToolSelected(ToolMode),
    DetailSelected(TimeDetail),
    TimezoneSelected(UserTimezone),
    ClockSelected(Clock),
    ThemeSelected(Theme),
}

impl CandleView {
    fn new() -> (Self, Task<Message>) {
        let config = config::load();
        let chart = ChartView::new(synthetic_series(), &config);
        let theme = theme_by_name(&config.theme);

        (Self { chart, theme }, Task::none())
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::Chart(message) => self.chart.update(message),
            Message::ChartTypeSelected(chart_type) => {
                self.chart.set_chart_type(chart_type);
                self.persist_config();
            }
            Message::ToolSelected(tool) => {
                self.chart.tool = tool;
            }
            Message::DetailSelected(detail) => {
                self.chart.set_time_detail(detail);
                self.persist_config();
            }
            Message::TimezoneSelected(timezone) => {
                self.chart.set_timezone(timezone);
                self.persist_config();
            }
            Message::ClockSelected(clock) => {
                self.chart.set_clock(clock);
                self.persist_config();
            }
            Message::ThemeSelected(theme) => {
                self.theme = theme;
                self.persist_config();
            }
        }
    }

    fn persist_config(&self) {
        let config = ChartConfig {
            theme: self.theme.to_string(),
            ..self.chart.config()
        };

        if let Err(err) = config::save(&config) {
            log::error!("failed to save config: {err}");
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let selectors = row![
            pick_list(
                ChartType::ALL,
                Some(self.chart.chart_type),
                Message::ChartTypeSelected,
            ),
            pick_list(
                TimeDetail::ALL,
                Some(self.chart.time_detail),
                Message::DetailSelected,
            ),
            pick_list(
                [UserTimezone::Utc, UserTimezone::Local],
                Some(self.chart.timezone),
                Message::TimezoneSelected,
            ),
            pick_list(
                [Clock::TwentyFourHour, Clock::TwelveHour],
                Some(self.chart.clock),
                Message::ClockSelected,
            ),
            pick_list(Theme::ALL, Some(self.theme.clone()), Message::ThemeSelected),
        ]
        .spacing(4);

        let tools = row(ToolMode::ALL.into_iter().map(|tool| {
            button(text(tool.to_string()).size(11))
                .style(style::toolbar_button(self.chart.tool == tool))
                .on_press(Message::ToolSelected(tool))
                .padding(padding::all(4).left(8).right(8))
                .into()
        }))
        .spacing(2);

        let toolbar = row![selectors, tools]
            .spacing(12)
            .padding(4)
            .align_y(iced::Alignment::Center)
            .wrap();

        column![
            toolbar,
            container(self.chart.view().map(Message::Chart))
                .width(Length::Fill)
                .height(Length::Fill),
        ]
        .into()
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

/// Resolves a persisted theme name, falling back to the default theme
/// when the name is unknown.
fn theme_by_name(name: &str) -> Theme {
    Theme::ALL
        .iter()
        .find(|theme| theme.to_string() == name)
        .cloned()
        .unwrap_or_else(|| {
            log::warn!("unknown theme {name:?}, falling back to Ferra");
            Theme::Ferra
        })
}

/// Deterministic hourly random walk so the demo always opens on the
/// same data.
fn synthetic_series() -> IntervalSeries {
    const START: u64 = 1_672_531_200_000; // 2023-01-01 00:00 UTC
    const INTERVAL_MS: u64 = 3_600_000;
    const COUNT: u64 = 720;

    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut open = 100.0_f32;

    let intervals = (0..COUNT)
        .map(|i| {
            let drift = (next_unit(&mut seed) - 0.5) * 2.0;
            let close = (open * (1.0 + drift * 0.01)).max(1.0);
            let high = open.max(close) * (1.0 + next_unit(&mut seed) * 0.004);
            let low = open.min(close) * (1.0 - next_unit(&mut seed) * 0.004);
            let volume = 50.0 + next_unit(&mut seed) * 200.0;

            let interval = Interval {
                time: START + i * INTERVAL_MS,
                open,
                high,
                low,
                close,
                volume: Some(volume),
            };
            open = close;
            interval
        })
        .collect();

    IntervalSeries::new(intervals, INTERVAL_MS)
}

fn next_unit(state: &mut u64) -> f32 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    (*state >> 40) as f32 / (1u64 << 24) as f32
}
