use crate::config::constants::{
    DECADE_COUNT, VERY_HIGH_DEMAND_THRESHOLD, HIGH_DEMAND_THRESHOLD, MEDIUM_DEMAND_THRESHOLD,
    LOW_DEMAND_THRESHOLD, DOMESTIC_REGIONAL_MAX_NM, SHORT_HAUL_MAX_NM, MEDIUM_HAUL_MAX_NM,
};
use crate::data::poi::POI;
use crate::models::airport::Airport;
use crate::models::demand::{recent_peak, DemandCategory, RouteType};

/// Coarse label from the peak of the three most recent decades.
pub fn demand_category(demand: &[u8; DECADE_COUNT]) -> DemandCategory {
    let peak = recent_peak(demand);
    if peak >= VERY_HIGH_DEMAND_THRESHOLD {
        DemandCategory::VeryHigh
    } else if peak >= HIGH_DEMAND_THRESHOLD {
        DemandCategory::High
    } else if peak >= MEDIUM_DEMAND_THRESHOLD {
        DemandCategory::Medium
    } else if peak >= LOW_DEMAND_THRESHOLD {
        DemandCategory::Low
    } else {
        DemandCategory::VeryLow
    }
}

pub fn route_type(from: &Airport, to: &Airport, distance_nm: f64) -> RouteType {
    let from_class = from.get_class();
    let to_class = to.get_class();

    if from.get_country() == to.get_country() {
        if distance_nm <= DOMESTIC_REGIONAL_MAX_NM || from_class.is_minor() || to_class.is_minor() {
            RouteType::DomesticRegional
        } else {
            RouteType::DomesticTrunk
        }
    } else if distance_nm <= SHORT_HAUL_MAX_NM {
        RouteType::ShortHaulInternational
    } else if distance_nm <= MEDIUM_HAUL_MAX_NM {
        RouteType::MediumHaulInternational
    } else if from_class.is_hub() && to_class.is_hub() {
        RouteType::IntercontinentalTrunk
    } else {
        RouteType::LongHaulInternational
    }
}
