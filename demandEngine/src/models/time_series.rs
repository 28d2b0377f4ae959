use serde::{Deserialize, Serialize};
use crate::config::constants::{DECADES, DECADE_COUNT};

/// Piecewise-linear series over sparse year keys.
///
/// Every time-varying quantity in the engine (population, GDP, flying
/// propensity, passenger targets, airport traffic) is one of these.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(u32, f64)>", into = "Vec<(u32, f64)>")]
pub struct TimeSeries {
    points: Vec<(u32, f64)>,
}

impl TimeSeries {
    /// Builds a series from (year, value) points. Points are sorted by year;
    /// for a repeated year the last value wins.
    pub fn new(points: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut points: Vec<(u32, f64)> = points.into_iter().collect();
        points.sort_by_key(|(year, _)| *year);

        let mut deduped: Vec<(u32, f64)> = Vec::with_capacity(points.len());
        for (year, value) in points {
            match deduped.last_mut() {
                Some(last) if last.0 == year => last.1 = value,
                _ => deduped.push((year, value)),
            }
        }

        Self { points: deduped }
    }

    pub fn from_decades(values: &[f64; DECADE_COUNT]) -> Self {
        Self::new(DECADES.iter().copied().zip(values.iter().copied()))
    }

    /// Value at `year`: exact at a key, linear between keys, clamped to the
    /// boundary values outside the covered range. An empty series is 0.
    pub fn value_at(&self, year: u32) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };

        if year <= first.0 {
            return first.1;
        }
        if year >= last.0 {
            return last.1;
        }

        // first index whose year is strictly greater than the query
        let idx = self.points.partition_point(|(y, _)| *y <= year);
        let (y0, v0) = self.points[idx - 1];
        if y0 == year {
            return v0;
        }
        let (y1, v1) = self.points[idx];

        let t = (year - y0) as f64 / (y1 - y0) as f64;
        v0 + t * (v1 - v0)
    }

    /// Decade values in `DECADES` order.
    pub fn decade_values(&self) -> [f64; DECADE_COUNT] {
        let mut values = [0.0; DECADE_COUNT];
        for (slot, year) in values.iter_mut().zip(DECADES.iter()) {
            *slot = self.value_at(*year);
        }
        values
    }

    pub fn points(&self) -> &[(u32, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<(u32, f64)>> for TimeSeries {
    fn from(points: Vec<(u32, f64)>) -> Self {
        TimeSeries::new(points)
    }
}

impl From<TimeSeries> for Vec<(u32, f64)> {
    fn from(series: TimeSeries) -> Self {
        series.points
    }
}
