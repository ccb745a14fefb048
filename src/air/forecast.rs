use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ForecastEntry;

/// Display band for the OWM 1-5 air-quality scale.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwmAqiBand {
    pub label: &'static str,
    /// Rough position on the 0-500 scale, for charts shared with US AQI.
    pub score: u16,
    pub color: &'static str,
}

const OWM_BANDS: [OwmAqiBand; 5] = [
    OwmAqiBand { label: "Good", score: 20, color: "#10b981" },
    OwmAqiBand { label: "Fair", score: 70, color: "#f59e0b" },
    OwmAqiBand { label: "Moderate", score: 120, color: "#f97316" },
    OwmAqiBand { label: "Poor", score: 180, color: "#ef4444" },
    OwmAqiBand { label: "Very Poor", score: 250, color: "#7e22ce" },
];

/// Unknown values fall back to "Good".
pub fn map_owm_aqi(aqi: u8) -> OwmAqiBand {
    match aqi {
        1..=5 => OWM_BANDS[aqi as usize - 1],
        _ => OWM_BANDS[0],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub at: DateTime<Utc>,
    pub aqi: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInsights {
    /// Worst hour ahead.
    pub peak: ForecastPoint,
    /// Cleanest hour ahead.
    pub golden: ForecastPoint,
}

/// Earliest worst and earliest best entries, or `None` for an empty forecast.
pub fn analyze_forecast(entries: &[ForecastEntry]) -> Option<ForecastInsights> {
    let first = entries.first()?;
    let mut peak = first;
    let mut golden = first;

    for entry in entries {
        if entry.aqi > peak.aqi {
            peak = entry;
        }
        if entry.aqi < golden.aqi {
            golden = entry;
        }
    }

    Some(ForecastInsights {
        peak: ForecastPoint { at: peak.at, aqi: peak.aqi },
        golden: ForecastPoint { at: golden.at, aqi: golden.aqi },
    })
}
