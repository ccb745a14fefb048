//! Rule-based guess at the dominant pollution source from the pollutant mix.

use serde::{Deserialize, Serialize};

use crate::models::Pollutants;

// OWM reports CO in µg/m³; above this counts as elevated.
const CO_HIGH: f64 = 1000.0;
const NO2_HIGH: f64 = 50.0;
const SO2_HIGH: f64 = 20.0;
const PM10_DUSTY: f64 = 50.0;
const PM25_SMOKY: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Vehicular,
    Industrial,
    DustConstruction,
    SmokeCombustion,
    Background,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Vehicular => "Vehicular Emissions",
            SourceKind::Industrial => "Industrial Activity",
            SourceKind::DustConstruction => "Dust & Construction",
            SourceKind::SmokeCombustion => "Smoke & Combustion",
            SourceKind::Background => "Background Dispersion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SourceKind::Vehicular => {
                "High nitrogen and carbon monoxide levels suggest heavy traffic or exhaust proximity."
            }
            SourceKind::Industrial => {
                "Elevated sulfur dioxide levels typically indicate industrial fuel burning or power plants."
            }
            SourceKind::DustConstruction => {
                "Large particulates (PM10) dominant. Likely road dust, construction, or wind-blown soil."
            }
            SourceKind::SmokeCombustion => {
                "Fine particulates (PM2.5) dominant. Likely biomass burning, smoke, or residential heating."
            }
            SourceKind::Background => {
                "Pollutant levels are balanced. No single dominant pollution source detected."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceClassification {
    pub kind: SourceKind,
    pub label: String,
    pub description: String,
}

impl From<SourceKind> for SourceClassification {
    fn from(kind: SourceKind) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// First matching signature wins, in order: traffic, industry, dust, smoke.
pub fn classify_source(pollutants: &Pollutants) -> SourceClassification {
    let pm25 = pollutants.pm25.value;
    let pm10 = pollutants.pm10.value;
    let no2 = pollutants.no2.value;
    let co = pollutants.co.value;
    let so2 = pollutants.so2.value;

    let kind = if no2 > NO2_HIGH && co > CO_HIGH {
        SourceKind::Vehicular
    } else if so2 > SO2_HIGH {
        SourceKind::Industrial
    } else if pm10 > PM10_DUSTY && pm25 / pm10 < 0.5 {
        SourceKind::DustConstruction
    } else if pm25 > PM25_SMOKY && fine_fraction(pm25, pm10) > 0.8 {
        SourceKind::SmokeCombustion
    } else {
        SourceKind::Background
    };

    kind.into()
}

/// PM2.5/PM10, treating a missing PM10 reading as "all fine particulate".
fn fine_fraction(pm25: f64, pm10: f64) -> f64 {
    if pm10 > 0.0 {
        pm25 / pm10
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(pm25: f64, pm10: f64, no2: f64, so2: f64, co: f64) -> Pollutants {
        Pollutants::from_values(pm25, pm10, no2, 0.0, so2, co)
    }

    #[test]
    fn traffic_needs_both_no2_and_co() {
        assert_eq!(classify_source(&mix(10.0, 20.0, 60.0, 0.0, 1500.0)).kind, SourceKind::Vehicular);
        assert_eq!(classify_source(&mix(10.0, 20.0, 60.0, 0.0, 500.0)).kind, SourceKind::Background);
    }

    #[test]
    fn traffic_outranks_industry() {
        assert_eq!(classify_source(&mix(10.0, 20.0, 60.0, 30.0, 1500.0)).kind, SourceKind::Vehicular);
        assert_eq!(classify_source(&mix(10.0, 20.0, 10.0, 30.0, 100.0)).kind, SourceKind::Industrial);
    }

    #[test]
    fn coarse_particulates_mean_dust() {
        let result = classify_source(&mix(20.0, 80.0, 0.0, 0.0, 0.0));
        assert_eq!(result.kind, SourceKind::DustConstruction);
        assert_eq!(result.label, "Dust & Construction");
    }

    #[test]
    fn fine_particulates_mean_smoke() {
        assert_eq!(classify_source(&mix(90.0, 100.0, 0.0, 0.0, 0.0)).kind, SourceKind::SmokeCombustion);
        assert_eq!(classify_source(&mix(30.0, 0.0, 0.0, 0.0, 0.0)).kind, SourceKind::SmokeCombustion);
    }

    #[test]
    fn clean_air_is_background() {
        assert_eq!(classify_source(&Pollutants::default()).kind, SourceKind::Background);
    }
}
