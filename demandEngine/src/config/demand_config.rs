use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::config::constants::*;
use crate::models::time_series::TimeSeries;
use crate::utils::errors::{DemandError, DemandResult};

/// Calibration constants for one run. Every field has a default, so a JSON
/// override only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandConfig {
    pub mass_exponent: f64,
    pub distance_decay: f64,
    pub income_elasticity: f64,
    pub reference_gdp_per_capita: f64,
    pub air_mass_epsilon: f64,
    pub min_viable_distance_nm: f64,
    pub max_viable_distance_nm: f64,
    pub min_effective_distance_nm: f64,
    pub domestic_multiplier: f64,
    pub fly_propensity: TimeSeries,
    pub max_fly_rate: TimeSeries,
    pub historical_passengers: TimeSeries, // absolute passengers
    pub gdp_fallback_calibration: f64,
    pub gdp_fallback_demand: f64,
    pub proximity_radius_nm: f64,
    pub share_reference_year: u32,
    pub compression_exponent: f64,
    pub min_demand_threshold: u8,
    pub insert_batch_size: usize,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            mass_exponent: MASS_EXPONENT,
            distance_decay: DISTANCE_DECAY,
            income_elasticity: INCOME_ELASTICITY,
            reference_gdp_per_capita: REFERENCE_GDP_PER_CAPITA,
            air_mass_epsilon: AIR_MASS_EPSILON,
            min_viable_distance_nm: MIN_VIABLE_DISTANCE_NM,
            max_viable_distance_nm: MAX_VIABLE_DISTANCE_NM,
            min_effective_distance_nm: MIN_EFFECTIVE_DISTANCE_NM,
            domestic_multiplier: DOMESTIC_MULTIPLIER,
            fly_propensity: TimeSeries::new(FLY_PROPENSITY),
            max_fly_rate: TimeSeries::new(MAX_FLY_RATE),
            historical_passengers: TimeSeries::new(
                HISTORICAL_PASSENGERS_MILLIONS
                    .iter()
                    .map(|(year, millions)| (*year, millions * PASSENGER_UNIT)),
            ),
            gdp_fallback_calibration: GDP_FALLBACK_CALIBRATION,
            gdp_fallback_demand: GDP_FALLBACK_DEMAND,
            proximity_radius_nm: PROXIMITY_RADIUS_NM,
            share_reference_year: SHARE_REFERENCE_YEAR,
            compression_exponent: COMPRESSION_EXPONENT,
            min_demand_threshold: MIN_DEMAND_THRESHOLD,
            insert_batch_size: INSERT_BATCH_SIZE,
        }
    }
}

impl DemandConfig {
    pub fn load(path: impl AsRef<Path>) -> DemandResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: DemandConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DemandResult<()> {
        if self.min_viable_distance_nm > self.max_viable_distance_nm {
            return Err(DemandError::InvalidData(format!(
                "min viable distance {} nm exceeds max viable distance {} nm",
                self.min_viable_distance_nm, self.max_viable_distance_nm
            )));
        }
        if self.compression_exponent <= 0.0 {
            return Err(DemandError::InvalidData(format!(
                "compression exponent must be positive, got {}",
                self.compression_exponent
            )));
        }
        if self.reference_gdp_per_capita <= 0.0 {
            return Err(DemandError::InvalidData(
                "reference GDP per capita must be positive".to_string(),
            ));
        }
        if self.insert_batch_size == 0 {
            return Err(DemandError::InvalidData("insert batch size must be non-zero".to_string()));
        }
        for (name, series) in [
            ("fly_propensity", &self.fly_propensity),
            ("max_fly_rate", &self.max_fly_rate),
            ("historical_passengers", &self.historical_passengers),
        ] {
            if series.is_empty() {
                return Err(DemandError::InvalidData(format!("{} series is empty", name)));
            }
        }
        Ok(())
    }
}
