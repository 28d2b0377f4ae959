use std::collections::HashMap;
use std::fmt;
use crate::config::constants::NM_PER_DEGREE_LAT;
use crate::data::poi::GeoCoordinate;

/// Fixed lat/lon grid over a set of points. Radius queries only visit the
/// cells overlapping the search box, then filter by great-circle distance.
#[derive(Clone)]
pub struct ZoneSpatialIndex {
    cell_degrees: f64,
    lon_cells: i32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    coordinates: Vec<GeoCoordinate>,
}

impl fmt::Debug for ZoneSpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneSpatialIndex")
            .field("cell_degrees", &self.cell_degrees)
            .field("points", &self.coordinates.len())
            .field("occupied_cells", &self.cells.len())
            .finish()
    }
}

impl ZoneSpatialIndex {
    pub fn new(points: impl IntoIterator<Item = GeoCoordinate>, cell_degrees: f64) -> Self {
        let cell_degrees = if cell_degrees > 0.0 { cell_degrees.min(180.0) } else { 1.0 };
        let lon_cells = (360.0 / cell_degrees).ceil() as i32;

        let mut index = Self {
            cell_degrees,
            lon_cells,
            cells: HashMap::new(),
            coordinates: Vec::new(),
        };
        for point in points {
            let cell = index.cell_of(&point);
            index.cells.entry(cell).or_default().push(index.coordinates.len());
            index.coordinates.push(point);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    fn lat_cell(&self, lat: f64) -> i32 {
        ((lat + 90.0) / self.cell_degrees).floor() as i32
    }

    fn lon_cell(&self, lon: f64) -> i32 {
        (((lon + 180.0) / self.cell_degrees).floor() as i32).rem_euclid(self.lon_cells)
    }

    fn cell_of(&self, point: &GeoCoordinate) -> (i32, i32) {
        (self.lat_cell(point.lat), self.lon_cell(point.lon))
    }

    /// Points within `radius_nm` of `center`, nearest first. Ties keep
    /// insertion order.
    pub fn within_radius(&self, center: &GeoCoordinate, radius_nm: f64) -> Vec<(usize, f64)> {
        if radius_nm < 0.0 || self.coordinates.is_empty() {
            return Vec::new();
        }

        let d_lat = radius_nm / NM_PER_DEGREE_LAT;
        let lat_lo = self.lat_cell((center.lat - d_lat).max(-90.0));
        let lat_hi = self.lat_cell((center.lat + d_lat).min(90.0));

        // longitude degrees shrink towards the poles
        let max_abs_lat = (center.lat.abs() + d_lat).min(90.0);
        let cos_lat = max_abs_lat.to_radians().cos();
        let lon_columns: Vec<i32> = if cos_lat <= 1e-6 || d_lat / cos_lat >= 180.0 {
            (0..self.lon_cells).collect()
        } else {
            let d_lon = d_lat / cos_lat;
            let lo = ((center.lon - d_lon + 180.0) / self.cell_degrees).floor() as i32;
            let hi = ((center.lon + d_lon + 180.0) / self.cell_degrees).floor() as i32;
            let span = (hi - lo + 1).min(self.lon_cells);
            (lo..lo + span).map(|column| column.rem_euclid(self.lon_cells)).collect()
        };

        let mut hits = Vec::new();
        for lat_idx in lat_lo..=lat_hi {
            for lon_idx in &lon_columns {
                if let Some(members) = self.cells.get(&(lat_idx, *lon_idx)) {
                    for &idx in members {
                        let distance = center.distance_nm(&self.coordinates[idx]);
                        if distance <= radius_nm {
                            hits.push((idx, distance));
                        }
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }

    /// Nearest point within `radius_nm` accepted by `filter`.
    pub fn nearest_within<F>(&self, center: &GeoCoordinate, radius_nm: f64, filter: F) -> Option<(usize, f64)>
    where
        F: Fn(usize) -> bool,
    {
        self.within_radius(center, radius_nm)
            .into_iter()
            .find(|(idx, _)| filter(*idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(points: &[(f64, f64)]) -> ZoneSpatialIndex {
        ZoneSpatialIndex::new(points.iter().map(|(lat, lon)| GeoCoordinate::new(*lat, *lon)), 2.0)
    }

    #[test]
    fn test_radius_query_matches_brute_force() {
        let points = [
            (51.51, -0.13),
            (48.86, 2.35),
            (52.37, 4.90),
            (50.11, 8.68),
            (53.48, -2.24),
            (40.71, -74.01),
        ];
        let idx = index(&points);
        let center = GeoCoordinate::new(51.0, 1.0);
        for radius in [50.0, 150.0, 300.0, 500.0] {
            let mut expected: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, (lat, lon))| center.distance_nm(&GeoCoordinate::new(*lat, *lon)) <= radius)
                .map(|(i, _)| i)
                .collect();
            expected.sort();
            let mut found: Vec<usize> = idx.within_radius(&center, radius).into_iter().map(|(i, _)| i).collect();
            found.sort();
            assert_eq!(found, expected, "radius {}", radius);
        }
    }

    #[test]
    fn test_wraps_across_dateline() {
        let idx = index(&[(-17.0, 179.5), (-17.0, 10.0)]);
        let hits = idx.within_radius(&GeoCoordinate::new(-17.0, -179.5), 81.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
    }

    #[test]
    fn test_nearest_within_applies_filter() {
        let idx = index(&[(51.50, -0.10), (51.70, -0.10), (55.0, 20.0)]);
        let center = GeoCoordinate::new(51.52, -0.10);
        assert_eq!(idx.nearest_within(&center, 81.0, |_| true).map(|(i, _)| i), Some(0));
        assert_eq!(idx.nearest_within(&center, 81.0, |i| i != 0).map(|(i, _)| i), Some(1));
        assert_eq!(idx.nearest_within(&center, 81.0, |i| i == 2), None);
    }
}
