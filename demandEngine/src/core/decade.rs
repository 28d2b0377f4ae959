use std::collections::HashMap;
use rayon::prelude::*;
use tracing::{debug, info};
use crate::config::demand_config::DemandConfig;
use crate::core::run_control::RunControl;
use crate::data::economics::CountryEconomics;
use crate::demand::calibration::{calibrate_scale, Calibration};
use crate::demand::gravity::GravityModel;
use crate::demand::network::ZoneNetwork;
use crate::demand::normalization::normalize_above;
use crate::models::airport::AirportId;
use crate::utils::errors::DemandResult;
use crate::utils::logging::{self, DemandCalcType, OperationCategory};

pub type AirportPair = (AirportId, AirportId);

/// Read-only inputs shared by every decade computation.
pub struct DecadeContext<'a> {
    pub config: &'a DemandConfig,
    pub network: &'a ZoneNetwork<'a>,
    pub economics: &'a CountryEconomics,
    pub model: &'a GravityModel<'a>,
    pub zone_shares: &'a [Vec<(AirportId, f64)>],
}

/// One airport pair's calibrated demand within a decade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecadePair {
    pub from_zone: usize,
    pub to_zone: usize,
    pub raw: f64,
    pub normalized: u8,
}

#[derive(Debug, Clone)]
pub struct DecadeDemand {
    pub year: u32,
    pub calibration: Calibration,
    pub max_raw: f64,
    pub candidate_pairs: usize,
    pub dropped_pairs: usize,
    /// Pairs at or above the minimum threshold.
    pub pairs: HashMap<AirportPair, DecadePair>,
}

struct RawAllocation {
    pair: AirportPair,
    from_zone: usize,
    to_zone: usize,
    raw: f64,
}

/// Computes one decade: calibrate `K`, allocate `raw * K` over every ordered
/// zone pair to its airport pairs, then normalize against the decade maximum.
///
/// Depends only on its inputs, so decades can run concurrently.
pub fn compute_decade(ctx: &DecadeContext, year: u32, control: &RunControl) -> DemandResult<DecadeDemand> {
    control.check()?;

    let calibration = calibrate_scale(ctx.network, ctx.economics, ctx.model, year);
    let scale = calibration.scale;
    let air_masses = ctx.network.air_masses(ctx.economics, ctx.config, year, ctx.config.gdp_fallback_demand);

    let allocations = {
        let _timing = logging::start_timing("allocate_decade",
            OperationCategory::DemandComputation { subcategory: DemandCalcType::Allocation });
        allocate_rows(ctx, &air_masses, scale, control)?
    };

    let _timing = logging::start_timing("normalize_decade",
        OperationCategory::DemandComputation { subcategory: DemandCalcType::Normalization });

    // several zone paths could reach one airport pair; keep the largest
    let mut raw_pairs: HashMap<AirportPair, RawAllocation> = HashMap::new();
    for row in allocations {
        for allocation in row {
            match raw_pairs.get_mut(&allocation.pair) {
                Some(existing) if existing.raw >= allocation.raw => {}
                Some(existing) => *existing = allocation,
                None => {
                    raw_pairs.insert(allocation.pair, allocation);
                }
            }
        }
    }

    let max_raw = raw_pairs.values().map(|allocation| allocation.raw).fold(0.0, f64::max);
    let candidate_pairs = raw_pairs.len();

    let threshold = ctx.config.min_demand_threshold;
    let exponent = ctx.config.compression_exponent;
    let pairs: HashMap<AirportPair, DecadePair> = raw_pairs
        .into_values()
        .filter_map(|allocation| {
            let normalized = normalize_above(allocation.raw, max_raw, exponent, threshold)?;
            Some((
                allocation.pair,
                DecadePair {
                    from_zone: allocation.from_zone,
                    to_zone: allocation.to_zone,
                    raw: allocation.raw,
                    normalized,
                },
            ))
        })
        .collect();

    let dropped_pairs = candidate_pairs - pairs.len();
    info!(
        year,
        scale,
        max_raw,
        kept = pairs.len(),
        dropped = dropped_pairs,
        "decade demand computed"
    );

    Ok(DecadeDemand {
        year,
        calibration,
        max_raw,
        candidate_pairs,
        dropped_pairs,
        pairs,
    })
}

/// First pass: calibrated raw demand per airport pair, one vector per
/// origin zone row. Rows run in parallel and come back in row order.
fn allocate_rows(
    ctx: &DecadeContext,
    air_masses: &[f64],
    scale: f64,
    control: &RunControl,
) -> DemandResult<Vec<Vec<RawAllocation>>> {
    let n = ctx.network.len();

    let rows = (0..n)
        .into_par_iter()
        .map(|i| {
            control.check()?;
            let mut row = Vec::new();
            let origin_airports = &ctx.zone_shares[i];

            if !origin_airports.is_empty() {
                for j in (0..n).filter(|j| *j != i) {
                    let destination_airports = &ctx.zone_shares[j];
                    if destination_airports.is_empty() {
                        continue;
                    }

                    let raw = ctx.model.gravity(
                        air_masses[i],
                        air_masses[j],
                        ctx.network.distance(i, j),
                        ctx.network.multiplier(i, j),
                    );
                    if raw <= 0.0 {
                        continue;
                    }
                    let scaled = raw * scale;

                    for (from_airport, from_share) in origin_airports {
                        for (to_airport, to_share) in destination_airports {
                            if from_airport == to_airport {
                                continue;
                            }
                            row.push(RawAllocation {
                                pair: (*from_airport, *to_airport),
                                from_zone: i,
                                to_zone: j,
                                raw: scaled * (from_share * to_share),
                            });
                        }
                    }
                }
            }

            control.tick();
            Ok(row)
        })
        .collect::<DemandResult<Vec<_>>>()?;

    debug!(rows = rows.len(), allocations = rows.iter().map(Vec::len).sum::<usize>(), "zone rows allocated");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cultural_ties::CulturalTies;
    use crate::data::poi::GeoCoordinate;
    use crate::demand::calibration::total_raw_demand;
    use crate::demand::cultural::CulturalResolver;
    use crate::models::time_series::TimeSeries;
    use crate::models::zone::Zone;
    use crate::utils::errors::DemandError;

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

    fn economics() -> CountryEconomics {
        let mut economics = CountryEconomics::new();
        for country in ["XA", "XB", "XC"] {
            economics.insert(country, TimeSeries::from_decades(&[
                2_000.0, 4_000.0, 7_000.0, 11_000.0, 15_000.0, 20_000.0, 24_000.0, 28_000.0,
            ]));
        }
        economics
    }

    fn three_zones() -> Vec<Zone> {
        vec![
            zone("AAA", "XA", 10.0, 10.0, 8_000.0),
            zone("BBB", "XB", 15.0, 30.0, 2_000.0),
            zone("CCC", "XC", -10.0, 20.0, 500.0),
        ]
    }

    fn run(zones: &[Zone], shares: &[Vec<(AirportId, f64)>], config: &DemandConfig, year: u32) -> DemandResult<DecadeDemand> {
        let resolver = CulturalResolver::new(&CulturalTies::default(), config.domestic_multiplier);
        let network = ZoneNetwork::build(zones, &resolver);
        let model = GravityModel::new(config, &resolver);
        let economics = economics();
        let ctx = DecadeContext {
            config,
            network: &network,
            economics: &economics,
            model: &model,
            zone_shares: shares,
        };
        compute_decade(&ctx, year, &RunControl::silent())
    }

    #[test]
    fn test_maximum_pair_normalizes_to_hundred() {
        let zones = three_zones();
        let shares = vec![vec![(1, 0.7), (2, 0.3)], vec![(3, 1.0)], vec![(4, 1.0)]];
        let config = DemandConfig::default();
        let decade = run(&zones, &shares, &config, 2000).unwrap();

        assert!(decade.max_raw > 0.0);
        let top = decade
            .pairs
            .values()
            .max_by(|a, b| a.raw.total_cmp(&b.raw))
            .unwrap();
        assert_eq!(top.normalized, 100);
        assert!(decade.pairs.values().all(|pair| pair.normalized >= config.min_demand_threshold));
    }

    #[test]
    fn test_ordered_pairs_are_symmetric() {
        let zones = three_zones();
        let shares = vec![vec![(1, 0.7), (2, 0.3)], vec![(3, 0.4), (5, 0.6)], vec![(4, 1.0)]];
        let decade = run(&zones, &shares, &DemandConfig::default(), 1970).unwrap();

        for ((from, to), pair) in &decade.pairs {
            let reverse = decade.pairs.get(&(*to, *from)).unwrap();
            assert_eq!(pair.raw, reverse.raw);
            assert_eq!(pair.normalized, reverse.normalized);
            assert_eq!(pair.from_zone, reverse.to_zone);
        }
    }

    #[test]
    fn test_sub_threshold_pairs_are_dropped() {
        let zones = three_zones();
        let shares = vec![vec![(1, 0.999_999), (2, 0.000_001)], vec![(3, 1.0)], vec![(4, 1.0)]];
        let config = DemandConfig {
            min_demand_threshold: 20,
            ..DemandConfig::default()
        };
        let decade = run(&zones, &shares, &config, 2020).unwrap();

        assert!(decade.dropped_pairs > 0);
        assert!(!decade.pairs.contains_key(&(2, 3)));
        assert!(decade.pairs.values().all(|pair| pair.normalized >= 20));
        assert_eq!(decade.candidate_pairs, decade.pairs.len() + decade.dropped_pairs);
    }

    #[test]
    fn test_calibration_and_allocation_use_separate_gdp_fallbacks() {
        let zones = three_zones();
        let shares = vec![vec![(1, 0.7), (2, 0.3)], vec![(3, 1.0)], vec![(4, 1.0)]];
        let config = DemandConfig::default();
        let resolver = CulturalResolver::new(&CulturalTies::default(), config.domestic_multiplier);
        let network = ZoneNetwork::build(&zones, &resolver);
        let model = GravityModel::new(&config, &resolver);
        // XB is missing
        let mut economics = CountryEconomics::new();
        for country in ["XA", "XC"] {
            economics.insert(country, TimeSeries::from_decades(&[20_000.0; 8]));
        }
        let ctx = DecadeContext {
            config: &config,
            network: &network,
            economics: &economics,
            model: &model,
            zone_shares: &shares,
        };
        let decade = compute_decade(&ctx, 2020, &RunControl::silent()).unwrap();

        let calibration_masses = network.air_masses(&economics, &config, 2020, config.gdp_fallback_calibration);
        let demand_masses = network.air_masses(&economics, &config, 2020, config.gdp_fallback_demand);
        assert!(calibration_masses[1] < demand_masses[1]);

        let expected_total = total_raw_demand(&network, &calibration_masses, &model);
        let merged_total = total_raw_demand(&network, &demand_masses, &model);
        assert!((decade.calibration.total_raw_demand - expected_total).abs() <= 1e-9 * expected_total);
        assert!((decade.calibration.total_raw_demand - merged_total).abs() > 1e-6 * merged_total);

        let pair = decade.pairs.get(&(1, 3)).unwrap();
        let gravity = model.gravity(demand_masses[0], demand_masses[1], network.distance(0, 1), network.multiplier(0, 1));
        let expected_raw = gravity * decade.calibration.scale * 0.7;
        assert!((pair.raw - expected_raw).abs() <= 1e-9 * expected_raw);
    }

    #[test]
    fn test_cancelled_before_start() {
        let zones = three_zones();
        let shares = vec![vec![(1, 1.0)], vec![(3, 1.0)], vec![(4, 1.0)]];
        let config = DemandConfig::default();
        let resolver = CulturalResolver::new(&CulturalTies::default(), 1.0);
        let network = ZoneNetwork::build(&zones, &resolver);
        let model = GravityModel::new(&config, &resolver);
        let economics = economics();
        let ctx = DecadeContext {
            config: &config,
            network: &network,
            economics: &economics,
            model: &model,
            zone_shares: &shares,
        };
        let control = RunControl::silent();
        control.cancel();
        assert!(matches!(compute_decade(&ctx, 1950, &control), Err(DemandError::Cancelled)));
    }
}
