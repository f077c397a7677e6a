//! Weight-trend computation with unit normalization.

use serde::{Deserialize, Serialize};

/// Pounds per kilogram.
const LB_PER_KG: f64 = 2.2046226218;

/// Band (in percent) within which a change counts as stable.
const STABLE_BAND_PCT: f64 = 2.0;

/// Supported weight units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    /// Parse a unit name, accepting the common plural spellings.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

/// A single weight reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightReading {
    pub value: f64,
    pub unit: WeightUnit,
}

/// Direction of a weight trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
    Unknown,
}

impl TrendDirection {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
            TrendDirection::Unknown => "unknown",
        }
    }
}

/// Signed percentage change between two readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    /// Change in percent, rounded to one decimal; absent when unknown
    pub percent_change: Option<f64>,
    pub direction: TrendDirection,
}

impl WeightTrend {
    fn unknown() -> Self {
        Self {
            percent_change: None,
            direction: TrendDirection::Unknown,
        }
    }
}

/// Convert a weight value between units.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Kg, WeightUnit::Kg) | (WeightUnit::Lb, WeightUnit::Lb) => value,
        (WeightUnit::Kg, WeightUnit::Lb) => value * LB_PER_KG,
        (WeightUnit::Lb, WeightUnit::Kg) => value / LB_PER_KG,
    }
}

/// Compute the trend from `previous` to `current`.
///
/// `current` is normalized into `previous`'s unit before comparing.
/// Changes under 2% in magnitude count as stable. A zero, negative, or
/// non-finite reading yields `Unknown` with no percentage, never NaN or
/// infinity.
pub fn compute_weight_trend(previous: &WeightReading, current: &WeightReading) -> WeightTrend {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(previous.value) || !valid(current.value) {
        return WeightTrend::unknown();
    }

    let normalized = convert_weight(current.value, current.unit, previous.unit);
    let raw = (normalized - previous.value) / previous.value * 100.0;

    let direction = if raw.abs() < STABLE_BAND_PCT {
        TrendDirection::Stable
    } else if raw > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    WeightTrend {
        percent_change: Some((raw * 10.0).round() / 10.0),
        direction,
    }
}
