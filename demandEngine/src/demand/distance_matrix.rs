use rayon::prelude::*;
use crate::data::poi::POI;
use crate::models::zone::Zone;
use crate::utils::logging::{self, OperationCategory};

/// Great-circle distances between every pair of zone centroids.
///
/// Distance does not change between decades, so this is built once per run.
/// Each unordered pair is computed once and mirrored, so `get(i, j)` and
/// `get(j, i)` are bitwise equal.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(zones: &[Zone]) -> Self {
        let _timing = logging::start_timing("build_distance_matrix", OperationCategory::DistanceMatrix);

        let n = zones.len();
        // upper triangle, one row per zone
        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let origin = zones[i].get_coordinate();
                (i + 1..n)
                    .map(|j| origin.distance_nm(zones[j].get_coordinate()))
                    .collect()
            })
            .collect();

        let mut distances = vec![0.0; n * n];
        for (i, row) in rows.into_iter().enumerate() {
            for (offset, distance) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                distances[i * n + j] = distance;
                distances[j * n + i] = distance;
            }
        }

        Self { size: n, distances }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance between zones by position in the zone list.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.size + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::GeoCoordinate;
    use crate::models::time_series::TimeSeries;

    fn zone(id: &str, lat: f64, lon: f64) -> Zone {
        Zone::new(
            id.to_string(),
            id.to_string(),
            "XX".to_string(),
            GeoCoordinate::new(lat, lon),
            TimeSeries::from_decades(&[1.0; 8]),
            Vec::new(),
        )
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let zones = vec![
            zone("LON", 51.51, -0.13),
            zone("NYC", 40.71, -74.01),
            zone("TYO", 35.68, 139.69),
            zone("SYD", -33.87, 151.21),
        ];
        let matrix = DistanceMatrix::build(&zones);
        assert_eq!(matrix.len(), 4);
        for i in 0..4 {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_london_new_york_distance() {
        let zones = vec![zone("LON", 51.51, -0.13), zone("NYC", 40.71, -74.01)];
        let matrix = DistanceMatrix::build(&zones);
        let d = matrix.get(0, 1);
        assert!((d - 3_000.0).abs() < 30.0, "got {}", d);
        assert_eq!(matrix.get(1, 0), d);
    }
}
