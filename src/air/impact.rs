//! Back-of-envelope impact estimates shown next to the live reading.

use serde::{Deserialize, Serialize};

/// PM2.5 (µg/m³ over a day) roughly equal to smoking one cigarette.
const PM25_PER_CIGARETTE: f64 = 22.0;
/// WHO-style daily PM2.5 guideline used for the safe-hours countdown.
const PM25_DAILY_LIMIT: f64 = 25.0;
const HIGH_DOSE_UG: f64 = 50.0;
/// 5 kW array at 5 peak sun hours.
const THEORETICAL_DAILY_KWH: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CigaretteEquivalent {
    pub cigarettes: f64,
    /// Icons to draw, capped at 10.
    pub icon_count: u8,
}

pub fn cigarette_equivalent(pm25: f64) -> CigaretteEquivalent {
    let cigarettes = (pm25 / PM25_PER_CIGARETTE).max(0.0);
    // Icons follow the one-decimal figure shown next to them.
    let shown = (cigarettes * 10.0).round() / 10.0;
    CigaretteEquivalent {
        cigarettes,
        icon_count: shown.ceil().min(10.0) as u8,
    }
}

/// Hours of outdoor exposure before the daily PM2.5 budget is spent.
pub fn safe_exposure_hours(pm25: f64) -> f64 {
    if pm25 <= PM25_DAILY_LIMIT {
        24.0
    } else {
        (PM25_DAILY_LIMIT / pm25 * 24.0).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Activity {
    Commute,
    Walking,
    Biking,
    Running,
}

impl Activity {
    /// Breathing rate in litres per minute.
    pub fn respiratory_rate(&self) -> f64 {
        match self {
            Activity::Commute => 7.0,
            Activity::Walking => 15.0,
            Activity::Biking => 30.0,
            Activity::Running => 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InhaledDose {
    pub micrograms: f64,
    pub high_risk: bool,
}

/// PM2.5 mass inhaled over `minutes` of `activity`.
pub fn inhaled_dose(pm25: f64, activity: Activity, minutes: f64) -> InhaledDose {
    // µg/m³ * L/min * min / 1000 L/m³
    let micrograms = (pm25 * activity.respiratory_rate() * minutes / 1000.0).max(0.0);
    InhaledDose {
        micrograms,
        high_risk: micrograms > HIGH_DOSE_UG,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SolarTier {
    Bright,
    Reduced,
    Dim,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolarEstimate {
    pub cloud_loss_pct: f64,
    pub pollution_loss_pct: f64,
    pub efficiency_pct: f64,
    pub daily_kwh: f64,
    pub lost_kwh: f64,
    pub tier: SolarTier,
}

pub fn solar_efficiency(clouds_pct: f64, pm25: f64) -> SolarEstimate {
    let cloud_loss_pct = (clouds_pct.max(0.0) * 0.8).min(80.0);
    let pollution_loss_pct = (pm25.max(0.0) / 500.0 * 30.0).min(30.0);
    let efficiency_pct = (100.0 - (cloud_loss_pct + pollution_loss_pct).min(100.0)).max(0.0);
    let daily_kwh = THEORETICAL_DAILY_KWH * efficiency_pct / 100.0;

    let tier = if efficiency_pct >= 80.0 {
        SolarTier::Bright
    } else if efficiency_pct >= 50.0 {
        SolarTier::Reduced
    } else {
        SolarTier::Dim
    };

    SolarEstimate {
        cloud_loss_pct,
        pollution_loss_pct,
        efficiency_pct,
        daily_kwh,
        lost_kwh: THEORETICAL_DAILY_KWH - daily_kwh,
        tier,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Transport {
    Car,
    PublicTransit,
    BikeOrWalk,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Diet {
    Meat,
    Vegetarian,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EnergySource {
    StandardGrid,
    Renewable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonProfile {
    pub transport: Transport,
    pub diet: Diet,
    pub energy: EnergySource,
}

impl CarbonProfile {
    /// Annual footprint in tonnes CO2e.
    pub fn total_tonnes(&self) -> f64 {
        let transport = match self.transport {
            Transport::Car => 4.6,
            Transport::PublicTransit => 1.2,
            Transport::BikeOrWalk => 0.1,
        };
        let diet = match self.diet {
            Diet::Meat => 2.5,
            Diet::Vegetarian => 1.2,
        };
        let energy = match self.energy {
            EnergySource::StandardGrid => 3.0,
            EnergySource::Renewable => 0.5,
        };
        transport + diet + energy
    }
}
