use rayon::prelude::*;
use tracing::debug;
use crate::data::economics::CountryEconomics;
use crate::demand::gravity::GravityModel;
use crate::demand::network::ZoneNetwork;
use crate::utils::logging::{self, DemandCalcType, OperationCategory};

/// Result of the per-decade scale solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub year: u32,
    pub total_raw_demand: f64,
    pub target_passengers: f64,
    pub scale: f64,
}

impl Calibration {
    pub fn calibrated_total(&self) -> f64 {
        self.scale * self.total_raw_demand
    }
}

/// Sum of raw gravity demand over every unordered zone pair, counted in both
/// directions. Rows are summed in parallel and combined in row order so the
/// total does not depend on thread scheduling.
pub fn total_raw_demand(network: &ZoneNetwork, air_masses: &[f64], model: &GravityModel) -> f64 {
    let n = network.len();
    let row_totals: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            (i + 1..n)
                .map(|j| model.gravity(air_masses[i], air_masses[j], network.distance(i, j), network.multiplier(i, j)))
                .sum::<f64>()
        })
        .collect();

    2.0 * row_totals.iter().sum::<f64>()
}

/// Solves `K = target(year) / total_raw(year)`. `K` is 1 when the model
/// produces no demand at all for the year.
pub fn calibrate_scale(
    network: &ZoneNetwork,
    economics: &CountryEconomics,
    model: &GravityModel,
    year: u32,
) -> Calibration {
    let _timing = logging::start_timing("calibrate_scale",
        OperationCategory::DemandComputation { subcategory: DemandCalcType::Calibration });

    let config = model.config();
    let air_masses = network.air_masses(economics, config, year, config.gdp_fallback_calibration);
    let total = total_raw_demand(network, &air_masses, model);
    let target = config.historical_passengers.value_at(year);

    let scale = if total > 0.0 && total.is_finite() { target / total } else { 1.0 };
    debug!(year, total_raw = total, target, scale, "calibration solved");

    Calibration {
        year,
        total_raw_demand: total,
        target_passengers: target,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::demand_config::DemandConfig;
    use crate::data::cultural_ties::CulturalTies;
    use crate::data::poi::GeoCoordinate;
    use crate::demand::cultural::CulturalResolver;
    use crate::models::time_series::TimeSeries;
    use crate::models::zone::Zone;

    fn zone(id: &str, country: &str, lat: f64, lon: f64, population: f64) -> Zone {
        Zone::new(
            id.to_string(),
            id.to_string(),
            country.to_string(),
            GeoCoordinate::new(lat, lon),
            TimeSeries::from_decades(&[population; 8]),
            Vec::new(),
        )
    }

    fn economics(countries: &[&str]) -> CountryEconomics {
        let mut economics = CountryEconomics::new();
        for country in countries {
            economics.insert(*country, TimeSeries::from_decades(&[
                3_000.0, 5_000.0, 8_000.0, 12_000.0, 16_000.0, 20_000.0, 25_000.0, 30_000.0,
            ]));
        }
        economics
    }

    #[test]
    fn test_scaled_total_matches_target() {
        let zones = vec![
            zone("AAA", "XA", 10.0, 10.0, 5_000.0),
            zone("BBB", "XB", 20.0, 25.0, 3_000.0),
            zone("CCC", "XA", -5.0, 40.0, 8_000.0),
            zone("DDD", "XC", 35.0, -10.0, 1_500.0),
        ];
        let config = DemandConfig::default();
        let resolver = CulturalResolver::new(&CulturalTies::default(), 1.0);
        let network = ZoneNetwork::build(&zones, &resolver);
        let model = GravityModel::new(&config, &resolver);
        let economics = economics(&["XA", "XB", "XC"]);

        for year in [1950, 1980, 2020] {
            let calibration = calibrate_scale(&network, &economics, &model, year);
            assert!(calibration.total_raw_demand > 0.0);
            let relative = (calibration.calibrated_total() - calibration.target_passengers).abs()
                / calibration.target_passengers;
            assert!(relative < 1e-9, "year {} off by {}", year, relative);
        }
    }

    #[test]
    fn test_no_viable_pairs_gives_unit_scale() {
        // both zones on the same spot: distance below the viable minimum
        let zones = vec![zone("AAA", "XA", 10.0, 10.0, 5_000.0), zone("BBB", "XB", 10.0, 10.0, 5_000.0)];
        let config = DemandConfig::default();
        let resolver = CulturalResolver::new(&CulturalTies::default(), 1.0);
        let network = ZoneNetwork::build(&zones, &resolver);
        let model = GravityModel::new(&config, &resolver);

        let calibration = calibrate_scale(&network, &economics(&["XA", "XB"]), &model, 1990);
        assert_eq!(calibration.total_raw_demand, 0.0);
        assert_eq!(calibration.scale, 1.0);
    }

    #[test]
    fn test_total_counts_both_directions() {
        let zones = vec![zone("AAA", "XA", 0.0, 0.0, 5_000.0), zone("BBB", "XB", 0.0, 20.0, 5_000.0)];
        let config = DemandConfig::default();
        let resolver = CulturalResolver::new(&CulturalTies::default(), 1.0);
        let network = ZoneNetwork::build(&zones, &resolver);
        let model = GravityModel::new(&config, &resolver);
        let masses = vec![2e5, 3e5];

        let one_way = model.gravity(2e5, 3e5, network.distance(0, 1), 1.0);
        assert_eq!(total_raw_demand(&network, &masses, &model), 2.0 * one_way);
    }
}
