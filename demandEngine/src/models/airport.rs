use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::config::constants::{
    LARGE_AIRPORT_WEIGHT, MEDIUM_AIRPORT_WEIGHT, SMALL_AIRPORT_WEIGHT, CLOSED_AIRPORT_WEIGHT,
};
use crate::data::poi::{GeoCoordinate, POI};
use crate::models::time_series::TimeSeries;
use crate::utils::errors::DemandError;

pub type AirportId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirportClass {
    LargeAirport,
    MediumAirport,
    SmallAirport,
    Closed,
}

impl AirportClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirportClass::LargeAirport => "large_airport",
            AirportClass::MediumAirport => "medium_airport",
            AirportClass::SmallAirport => "small_airport",
            AirportClass::Closed => "closed",
        }
    }

    /// Fallback share weight when an airport has no usable traffic history.
    pub fn share_weight(&self) -> f64 {
        match self {
            AirportClass::LargeAirport => LARGE_AIRPORT_WEIGHT,
            AirportClass::MediumAirport => MEDIUM_AIRPORT_WEIGHT,
            AirportClass::SmallAirport => SMALL_AIRPORT_WEIGHT,
            AirportClass::Closed => CLOSED_AIRPORT_WEIGHT,
        }
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, AirportClass::LargeAirport)
    }

    pub fn is_minor(&self) -> bool {
        matches!(self, AirportClass::SmallAirport | AirportClass::Closed)
    }
}

impl FromStr for AirportClass {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "large_airport" | "large" => Ok(AirportClass::LargeAirport),
            "medium_airport" | "medium" => Ok(AirportClass::MediumAirport),
            "small_airport" | "small" => Ok(AirportClass::SmallAirport),
            "closed" => Ok(AirportClass::Closed),
            other => Err(DemandError::InvalidData(format!("unknown airport class: {}", other))),
        }
    }
}

impl fmt::Display for AirportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    id: AirportId,
    code: String,
    name: String,
    country: String,
    coordinate: GeoCoordinate,
    class: AirportClass,
    active: bool,
    traffic: Option<TimeSeries>,
}

impl Airport {
    pub fn new(
        id: AirportId,
        code: String,
        name: String,
        country: String,
        coordinate: GeoCoordinate,
        class: AirportClass,
        active: bool,
    ) -> Self {
        Self {
            id,
            code,
            name,
            country,
            coordinate,
            class,
            active,
            traffic: None,
        }
    }

    pub fn with_traffic(mut self, traffic: TimeSeries) -> Self {
        self.set_traffic(traffic);
        self
    }

    pub fn set_traffic(&mut self, traffic: TimeSeries) {
        self.traffic = if traffic.is_empty() { None } else { Some(traffic) };
    }

    pub fn get_airport_id(&self) -> AirportId {
        self.id
    }

    pub fn get_code(&self) -> &str {
        &self.code
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_class(&self) -> AirportClass {
        self.class
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Historical passengers at `year`, when the airport has a traffic series.
    pub fn traffic_at(&self, year: u32) -> Option<f64> {
        self.traffic.as_ref().map(|series| series.value_at(year))
    }
}

impl POI for Airport {
    fn get_coordinate(&self) -> &GeoCoordinate {
        &self.coordinate
    }

    fn get_id(&self) -> &str {
        &self.code
    }

    fn get_country(&self) -> &str {
        &self.country
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentMethod {
    Explicit,
    Proximity,
}

impl AssignmentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMethod::Explicit => "explicit",
            AssignmentMethod::Proximity => "proximity",
        }
    }
}

/// An airport's membership in a zone and its fraction of the zone's demand.
#[derive(Debug, Clone, Serialize)]
pub struct AirportZoneAssignment {
    pub airport_id: AirportId,
    pub airport_code: String,
    pub zone_id: String,
    pub demand_share: f64,
    pub method: AssignmentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parsing() {
        assert_eq!("large_airport".parse::<AirportClass>().unwrap(), AirportClass::LargeAirport);
        assert_eq!(" Medium_Airport ".parse::<AirportClass>().unwrap(), AirportClass::MediumAirport);
        assert_eq!("closed".parse::<AirportClass>().unwrap(), AirportClass::Closed);
        assert!("heliport".parse::<AirportClass>().is_err());
    }

    #[test]
    fn test_hub_weight_dominates() {
        assert!(AirportClass::LargeAirport.share_weight() > 10.0 * AirportClass::SmallAirport.share_weight());
        assert!(AirportClass::SmallAirport.share_weight() > AirportClass::Closed.share_weight());
    }

    #[test]
    fn test_empty_traffic_is_absent() {
        let airport = Airport::new(
            1,
            "TST".to_string(),
            "Test Field".to_string(),
            "XX".to_string(),
            GeoCoordinate::new(0.0, 0.0),
            AirportClass::SmallAirport,
            true,
        )
        .with_traffic(TimeSeries::default());
        assert_eq!(airport.traffic_at(2000), None);
    }
}
