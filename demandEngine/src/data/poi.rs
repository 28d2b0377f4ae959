use serde::{Deserialize, Serialize};
use crate::config::constants::EARTH_RADIUS_NM;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `None` unless both values are finite and within +-90 / +-180 degrees.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let coordinate = Self::new(lat, lon);
        coordinate.is_valid().then_some(coordinate)
    }

    /// Great-circle distance in nautical miles.
    pub fn distance_nm(&self, other: &GeoCoordinate) -> f64 {
        haversine_nm(self.lat, self.lon, other.lat, other.lon)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_NM * c
}

pub trait POI {
    fn get_coordinate(&self) -> &GeoCoordinate;
    fn get_id(&self) -> &str;
    fn get_country(&self) -> &str;
}
