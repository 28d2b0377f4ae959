use std::collections::{HashMap, HashSet};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::warn;
use crate::data::poi::{GeoCoordinate, POI};
use crate::models::airport::{Airport, AirportClass, AirportId};
use crate::models::time_series::TimeSeries;
use crate::utils::errors::{DemandError, DemandResult};

#[derive(Debug, Deserialize)]
struct AirportRecord {
    id: AirportId,
    code: String,
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "type")]
    class: String,
    active: bool,
}

pub fn parse_airports(contents: &str) -> DemandResult<Vec<Airport>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut seen = HashSet::new();
    let mut airports = Vec::new();

    for result in reader.deserialize() {
        let record: AirportRecord = result?;

        if !seen.insert(record.id) {
            return Err(DemandError::InvalidData(format!("duplicate airport id {}", record.id)));
        }
        let coordinate = GeoCoordinate::checked(record.latitude, record.longitude).ok_or_else(|| {
            DemandError::InvalidData(format!(
                "airport {} coordinates ({}, {}) are not valid",
                record.code, record.latitude, record.longitude
            ))
        })?;
        let class: AirportClass = record.class.parse()?;

        airports.push(Airport::new(
            record.id,
            record.code,
            record.name,
            record.country,
            coordinate,
            class,
            record.active,
        ));
    }

    Ok(airports)
}

/// Historical passenger series keyed by airport code.
pub fn parse_traffic(contents: &str) -> DemandResult<HashMap<String, TimeSeries>> {
    Ok(serde_json::from_str(contents)?)
}

/// Attaches traffic series to airports by code. Returns how many airports
/// received a series.
pub fn attach_traffic(airports: &mut [Airport], traffic: &HashMap<String, TimeSeries>) -> usize {
    let known: HashSet<&str> = airports.iter().map(|a| a.get_id()).collect();
    for code in traffic.keys() {
        if !known.contains(code.as_str()) {
            warn!(airport = %code, "traffic series for unknown airport ignored");
        }
    }

    let mut attached = 0;
    for airport in airports.iter_mut() {
        if let Some(series) = traffic.get(airport.get_id()) {
            airport.set_traffic(series.clone());
            attached += 1;
        }
    }
    attached
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "id,code,name,country,latitude,longitude,type,active\n\
        1,LHR,London Heathrow,GB,51.47,-0.4543,large_airport,true\n\
        2,LCY,London City,GB,51.5053,0.0553,medium_airport,true\n\
        3,TXL,Berlin Tegel,DE,52.5597,13.2877,closed,false\n";

    #[test]
    fn test_parse_airports() {
        let airports = parse_airports(SAMPLE).unwrap();
        assert_eq!(airports.len(), 3);
        assert_eq!(airports[0].get_code(), "LHR");
        assert_eq!(airports[1].get_class(), AirportClass::MediumAirport);
        assert!(!airports[2].is_active());
    }

    #[test]
    fn test_duplicate_airport_id_rejected() {
        let contents = format!("{}1,XXX,Duplicate,GB,51.0,0.0,small_airport,true\n", SAMPLE);
        assert!(matches!(parse_airports(&contents), Err(DemandError::InvalidData(_))));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let contents = format!("{}4,BAD,Off The Map,GB,51.0,181.5,small_airport,true\n", SAMPLE);
        assert!(matches!(parse_airports(&contents), Err(DemandError::InvalidData(_))));
    }

    #[test]
    fn test_unknown_class_rejected() {
        let contents = "id,code,name,country,latitude,longitude,type,active\n\
            9,HLP,Heliport,GB,51.0,0.0,heliport,true\n";
        assert!(matches!(parse_airports(contents), Err(DemandError::InvalidData(_))));
    }

    #[test]
    fn test_attach_traffic() {
        let mut airports = parse_airports(SAMPLE).unwrap();
        let traffic = parse_traffic(r#"{"LHR": [[1970, 15000], [2000, 64000]], "ZZZ": [[2000, 1]]}"#).unwrap();
        assert_eq!(attach_traffic(&mut airports, &traffic), 1);
        assert_eq!(airports[0].traffic_at(1985), Some(39_500.0));
        assert_eq!(airports[1].traffic_at(1985), None);
    }
}
