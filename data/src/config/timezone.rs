use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timezone used when turning axis timestamps into label text. Series
/// data itself always stays in UTC milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserTimezone {
    #[default]
    Utc,
    Local,
}

impl UserTimezone {
    /// Formats `dt` with the given chrono format string in this timezone.
    pub fn format(&self, dt: DateTime<Utc>, fmt: &str) -> String {
        match self {
            UserTimezone::Utc => dt.format(fmt).to_string(),
            UserTimezone::Local => dt.with_timezone(&Local).format(fmt).to_string(),
        }
    }

    /// Converts a UTC millisecond timestamp for display, if representable.
    pub fn format_ms(&self, timestamp_ms: i64, fmt: &str) -> Option<String> {
        let dt = Utc.timestamp_millis_opt(timestamp_ms).single()?;
        Some(self.format(dt, fmt))
    }
}

impl std::fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => write!(f, "Local"),
        }
    }
}

/// Hour convention for time-of-day axis labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    #[default]
    TwentyFourHour,
    TwelveHour,
}

impl Clock {
    /// Format string for hour-and-minute labels.
    pub fn hour_minute(&self) -> &'static str {
        match self {
            Clock::TwentyFourHour => "%-H:%M",
            Clock::TwelveHour => "%-I:%M %P",
        }
    }

    /// Format string for labels that carry seconds.
    pub fn hour_minute_second(&self) -> &'static str {
        match self {
            Clock::TwentyFourHour => "%-H:%M:%S",
            Clock::TwelveHour => "%-I:%M:%S %P",
        }
    }
}

impl std::fmt::Display for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clock::TwentyFourHour => write!(f, "24h"),
            Clock::TwelveHour => write!(f, "12h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_labels_use_both_clock_conventions() {
        // 2023-01-01 13:05:30 UTC
        let ts = 1_672_578_330_000;

        let utc = UserTimezone::Utc;
        assert_eq!(
            utc.format_ms(ts, Clock::TwentyFourHour.hour_minute()).unwrap(),
            "13:05"
        );
        assert_eq!(
            utc.format_ms(ts, Clock::TwelveHour.hour_minute()).unwrap(),
            "1:05 pm"
        );
        assert_eq!(
            utc.format_ms(ts, Clock::TwentyFourHour.hour_minute_second())
                .unwrap(),
            "13:05:30"
        );
    }
}
