use std::collections::HashSet;
use serde::Deserialize;
use crate::config::constants::DECADE_COUNT;
use crate::data::poi::GeoCoordinate;
use crate::models::time_series::TimeSeries;
use crate::models::zone::Zone;
use crate::utils::errors::{DemandError, DemandResult};

#[derive(Debug, Deserialize)]
pub struct ZoneRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub population: Vec<f64>,
    #[serde(default)]
    pub airports: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZonesList {
    pub zones: Vec<ZoneRecord>,
}

pub fn parse_zones(contents: &str) -> DemandResult<Vec<Zone>> {
    let list: ZonesList = serde_json::from_str(contents)?;

    let mut seen = HashSet::new();
    let mut zones = Vec::with_capacity(list.zones.len());
    for record in list.zones {
        if !seen.insert(record.id.clone()) {
            return Err(DemandError::InvalidData(format!("duplicate zone id {}", record.id)));
        }
        let coordinate = GeoCoordinate::checked(record.lat, record.lon).ok_or_else(|| {
            DemandError::InvalidData(format!(
                "zone {} centroid ({}, {}) is not a valid coordinate",
                record.id, record.lat, record.lon
            ))
        })?;
        let population: [f64; DECADE_COUNT] = record.population.as_slice().try_into().map_err(|_| {
            DemandError::InvalidData(format!(
                "zone {} has {} population values, expected {}",
                record.id,
                record.population.len(),
                DECADE_COUNT
            ))
        })?;
        if population.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(DemandError::InvalidData(format!("zone {} has an invalid population value", record.id)));
        }

        zones.push(Zone::new(
            record.id,
            record.name,
            record.country,
            coordinate,
            TimeSeries::from_decades(&population),
            record.airports,
        ));
    }

    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::POI;

    #[test]
    fn test_parse_zone() {
        let zones = parse_zones(
            r#"{"zones": [{"id": "LON", "name": "London", "country": "GB", "lat": 51.5, "lon": -0.13,
                "population": [8361, 8196, 7509, 6805, 6798, 7273, 8044, 9304],
                "airports": ["LHR", "LGW"]}]}"#,
        )
        .unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].get_id(), "LON");
        assert_eq!(zones[0].get_member_airports(), &["LHR".to_string(), "LGW".to_string()]);
        assert_eq!(zones[0].population_at(1950), 8_361_000.0);
    }

    #[test]
    fn test_duplicate_zone_ids_rejected() {
        let result = parse_zones(
            r#"{"zones": [
                {"id": "A", "name": "A", "country": "XA", "lat": 0, "lon": 0, "population": [1,1,1,1,1,1,1,1]},
                {"id": "A", "name": "A2", "country": "XA", "lat": 1, "lon": 1, "population": [1,1,1,1,1,1,1,1]}
            ]}"#,
        );
        assert!(matches!(result, Err(DemandError::InvalidData(_))));
    }

    #[test]
    fn test_out_of_range_centroid_rejected() {
        let result = parse_zones(
            r#"{"zones": [{"id": "A", "name": "A", "country": "XA", "lat": 95, "lon": 0, "population": [1,1,1,1,1,1,1,1]}]}"#,
        );
        assert!(matches!(result, Err(DemandError::InvalidData(_))));
    }

    #[test]
    fn test_wrong_decade_count_rejected() {
        let result = parse_zones(
            r#"{"zones": [{"id": "A", "name": "A", "country": "XA", "lat": 0, "lon": 0, "population": [1,2,3]}]}"#,
        );
        assert!(matches!(result, Err(DemandError::InvalidData(_))));
    }
}
