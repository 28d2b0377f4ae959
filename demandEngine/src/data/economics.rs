use std::collections::{BTreeSet, HashMap};
use serde::Deserialize;
use crate::config::constants::DECADE_COUNT;
use crate::models::time_series::TimeSeries;
use crate::utils::errors::{DemandError, DemandResult};

#[derive(Debug, Deserialize)]
struct EconomicsFile {
    gdp_per_capita: HashMap<String, Vec<f64>>,
}

/// GDP per capita (constant USD) per country, keyed by decade.
#[derive(Debug, Clone, Default)]
pub struct CountryEconomics {
    gdp_per_capita: HashMap<String, TimeSeries>,
}

impl CountryEconomics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: impl Into<String>, series: TimeSeries) {
        self.gdp_per_capita.insert(country.into(), series);
    }

    pub fn from_json_str(contents: &str) -> DemandResult<Self> {
        let file: EconomicsFile = serde_json::from_str(contents)?;
        let mut economics = CountryEconomics::new();

        for (country, values) in file.gdp_per_capita {
            let decades: [f64; DECADE_COUNT] = values.as_slice().try_into().map_err(|_| {
                DemandError::InvalidData(format!(
                    "GDP series for {} has {} values, expected {}",
                    country,
                    values.len(),
                    DECADE_COUNT
                ))
            })?;
            economics.insert(country, TimeSeries::from_decades(&decades));
        }

        Ok(economics)
    }

    pub fn gdp_per_capita(&self, country: &str, year: u32) -> Option<f64> {
        self.gdp_per_capita.get(country).map(|series| series.value_at(year))
    }

    /// GDP per capita, or `fallback` when the country has no data.
    pub fn gdp_or(&self, country: &str, year: u32, fallback: f64) -> f64 {
        self.gdp_per_capita(country, year).unwrap_or(fallback)
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.gdp_per_capita.contains_key(country)
    }

    pub fn missing_countries<'a>(&self, countries: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        countries
            .into_iter()
            .filter(|country| !self.has_country(country))
            .map(|country| country.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.gdp_per_capita.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gdp_per_capita.is_empty()
    }
}
