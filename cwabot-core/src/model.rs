use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of forecast windows in a 36-hour outlook.
pub const PERIOD_COUNT: usize = 3;

/// Day period a forecast window starts in, classified by its start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Dawn,
    Morning,
    Daytime,
    Night,
}

impl Period {
    /// Classify an hour of day (0-23). Total: the four buckets partition the
    /// range.
    pub fn from_hour(hour: u32) -> Period {
        match hour {
            5..=11 => Period::Morning,
            12..=17 => Period::Daytime,
            18..=23 => Period::Night,
            _ => Period::Dawn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Dawn => "凌晨",
            Period::Morning => "早上",
            Period::Daytime => "白天",
            Period::Night => "晚上",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Period::Dawn => "🌙",
            Period::Morning => "🌅",
            Period::Daytime => "☀️",
            Period::Night => "🌃",
        }
    }
}

/// Rain-probability severity tier driving the card's color accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainTier {
    Alert,
    Caution,
    Normal,
}

impl RainTier {
    /// Thresholds are inclusive lower bounds: ≥70 alert, ≥30 caution.
    pub fn from_pop(pop: u8) -> RainTier {
        if pop >= 70 {
            RainTier::Alert
        } else if pop >= 30 {
            RainTier::Caution
        } else {
            RainTier::Normal
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RainTier::Alert => "#E53935",
            RainTier::Caution => "#FB8C00",
            RainTier::Normal => "#43A047",
        }
    }
}

/// One derived forecast window.
///
/// `label` is the display form of `period`, already carrying the 明天
/// qualifier when the last window rolls into the next day's morning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodForecast {
    pub period: Period,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub weather: String,
    pub comfort: String,
    pub min_temp: i32,
    pub max_temp: i32,
    pub rain_pop: u8,
}

/// A successful 36-hour forecast: the provider's display name for the
/// location plus one entry per window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub periods: Vec<PeriodForecast>,
}

/// Everything that can go wrong between a fetch request and a usable
/// [`Forecast`]. All variants are recovered into user-facing replies by the
/// reply policy; none are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("CWA API key is not configured")]
    ApiKeyMissing,

    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),

    #[error("request to CWA timed out")]
    Timeout,

    #[error("CWA request failed with HTTP status {0}")]
    Transport(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed CWA response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_buckets_partition_the_day() {
        assert_eq!(Period::from_hour(0), Period::Dawn);
        assert_eq!(Period::from_hour(4), Period::Dawn);
        assert_eq!(Period::from_hour(5), Period::Morning);
        assert_eq!(Period::from_hour(11), Period::Morning);
        assert_eq!(Period::from_hour(12), Period::Daytime);
        assert_eq!(Period::from_hour(17), Period::Daytime);
        assert_eq!(Period::from_hour(18), Period::Night);
        assert_eq!(Period::from_hour(23), Period::Night);
    }

    #[test]
    fn rain_tier_boundaries_are_inclusive() {
        assert_eq!(RainTier::from_pop(100), RainTier::Alert);
        assert_eq!(RainTier::from_pop(70), RainTier::Alert);
        assert_eq!(RainTier::from_pop(69), RainTier::Caution);
        assert_eq!(RainTier::from_pop(30), RainTier::Caution);
        assert_eq!(RainTier::from_pop(29), RainTier::Normal);
        assert_eq!(RainTier::from_pop(0), RainTier::Normal);
    }

    #[test]
    fn tier_colors_are_distinct() {
        let colors = [
            RainTier::Alert.color(),
            RainTier::Caution.color(),
            RainTier::Normal.color(),
        ];
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }
}
