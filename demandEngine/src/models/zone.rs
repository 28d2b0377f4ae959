use serde::{Deserialize, Serialize};
use crate::config::constants::POPULATION_UNIT;
use crate::data::poi::{GeoCoordinate, POI};
use crate::models::time_series::TimeSeries;

/// A metropolitan catchment area aggregating one or more airports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    id: String,
    name: String,
    country: String,
    coordinate: GeoCoordinate,
    population: TimeSeries, // thousands
    member_airports: Vec<String>,
}

impl Zone {
    pub fn new(
        id: String,
        name: String,
        country: String,
        coordinate: GeoCoordinate,
        population: TimeSeries,
        member_airports: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            country,
            coordinate,
            population,
            member_airports,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_population_series(&self) -> &TimeSeries {
        &self.population
    }

    /// Population in persons for any year.
    pub fn population_at(&self, year: u32) -> f64 {
        self.population.value_at(year) * POPULATION_UNIT
    }

    /// Airport codes explicitly listed as members of this zone.
    pub fn get_member_airports(&self) -> &[String] {
        &self.member_airports
    }
}

impl POI for Zone {
    fn get_coordinate(&self) -> &GeoCoordinate {
        &self.coordinate
    }

    fn get_id(&self) -> &str {
        &self.id
    }

    fn get_country(&self) -> &str {
        &self.country
    }
}
