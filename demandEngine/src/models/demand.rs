use std::fmt;
use serde::Serialize;
use crate::config::constants::{DECADES, DECADE_COUNT, CATEGORY_RECENT_DECADES};
use crate::models::airport::AirportId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DemandCategory {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl DemandCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandCategory::VeryHigh => "very_high",
            DemandCategory::High => "high",
            DemandCategory::Medium => "medium",
            DemandCategory::Low => "low",
            DemandCategory::VeryLow => "very_low",
        }
    }
}

impl fmt::Display for DemandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RouteType {
    DomesticRegional,
    DomesticTrunk,
    ShortHaulInternational,
    MediumHaulInternational,
    LongHaulInternational,
    IntercontinentalTrunk,
}

impl RouteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::DomesticRegional => "domestic_regional",
            RouteType::DomesticTrunk => "domestic_trunk",
            RouteType::ShortHaulInternational => "short_haul_international",
            RouteType::MediumHaulInternational => "medium_haul_international",
            RouteType::LongHaulInternational => "long_haul_international",
            RouteType::IntercontinentalTrunk => "intercontinental_trunk",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized demand for one ordered airport pair across all decades.
#[derive(Debug, Clone, Serialize)]
pub struct AirportPairDemand {
    pub from_airport: AirportId,
    pub to_airport: AirportId,
    pub from_zone: String,
    pub to_zone: String,
    pub distance_nm: f64,
    pub demand: [u8; DECADE_COUNT],
    pub category: DemandCategory,
    pub route_type: RouteType,
}

impl AirportPairDemand {
    /// Demand for a decade year; `None` when the year is not a decade key.
    pub fn demand_for(&self, year: u32) -> Option<u8> {
        DECADES
            .iter()
            .position(|decade| *decade == year)
            .map(|idx| self.demand[idx])
    }

    pub fn recent_peak(&self) -> u8 {
        recent_peak(&self.demand)
    }
}

/// Maximum over the most recent decades.
pub fn recent_peak(demand: &[u8; DECADE_COUNT]) -> u8 {
    demand[DECADE_COUNT - CATEGORY_RECENT_DECADES..]
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
}
