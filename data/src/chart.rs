use serde::{Deserialize, Serialize};

/// How the visible intervals are painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Candlestick,
    Line,
    Area,
    Bar,
    Histogram,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Candlestick,
        ChartType::Line,
        ChartType::Area,
        ChartType::Bar,
        ChartType::Histogram,
    ];

    /// Resolves a configured name, falling back to candlestick with a
    /// diagnostic when the name is unknown.
    pub fn from_name(name: &str) -> ChartType {
        match name.to_ascii_lowercase().as_str() {
            "candlestick" => ChartType::Candlestick,
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "bar" => ChartType::Bar,
            "histogram" => ChartType::Histogram,
            other => {
                log::warn!("unknown chart type {other:?}, falling back to candlestick");
                ChartType::Candlestick
            }
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartType::Candlestick => write!(f, "Candlestick"),
            ChartType::Line => write!(f, "Line"),
            ChartType::Area => write!(f, "Area"),
            ChartType::Bar => write!(f, "Bar"),
            ChartType::Histogram => write!(f, "Histogram"),
        }
    }
}

/// Which edge the price axis occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    #[default]
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_candlestick() {
        assert_eq!(ChartType::from_name("AREA"), ChartType::Area);
        assert_eq!(ChartType::from_name("renko"), ChartType::Candlestick);
        assert_eq!(ChartType::from_name(""), ChartType::Candlestick);
    }

    #[test]
    fn serde_names_are_lowercase() {
        let json = serde_json::to_string(&ChartType::Histogram).unwrap();
        assert_eq!(json, "\"histogram\"");
        let back: ChartType = serde_json::from_str("\"line\"").unwrap();
        assert_eq!(back, ChartType::Line);
    }
}
