use chrono::{DateTime, Timelike};
use serde::{Deserialize, Deserializer};

/// Deserializes into the default value instead of failing, so a stale or
/// hand-edited config file never prevents startup.
pub fn ok_or_default<'a, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'a> + Default,
    D: Deserializer<'a>,
{
    let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(T::deserialize(v).unwrap_or_default())
}

/// Counts decimal digits of a value, used to pick price label precision.
pub fn count_decimals(value: f32) -> usize {
    let value_str = value.to_string();
    if let Some(pos) = value_str.find('.') {
        value_str.len() - pos - 1
    } else {
        0
    }
}

pub fn reset_to_start_of_second_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub fn reset_to_start_of_minute_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    dt.with_second(0)
        .unwrap_or(dt)
        .with_nanosecond(0)
        .unwrap_or(dt)
}

pub fn reset_to_start_of_hour_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    reset_to_start_of_minute_utc(dt.with_minute(0).unwrap_or(dt))
}

pub fn reset_to_start_of_day_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    reset_to_start_of_hour_utc(dt.with_hour(0).unwrap_or(dt))
}

pub fn reset_to_start_of_month_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    use chrono::Datelike;
    reset_to_start_of_day_utc(dt.with_day(1).unwrap_or(dt))
}

pub fn reset_to_start_of_year_utc(dt: DateTime<chrono::Utc>) -> DateTime<chrono::Utc> {
    use chrono::Datelike;
    reset_to_start_of_month_utc(dt.with_month(1).unwrap_or(dt))
}
