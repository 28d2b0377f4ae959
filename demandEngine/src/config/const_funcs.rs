use crate::config::demand_config::DemandConfig;

/// Fraction of a population expected to fly in `year`.
///
/// Income elastic: `A(year) * (gdp / reference)^eta`, clamped to
/// `[0, max_rate(year)]`.
pub fn fly_rate(config: &DemandConfig, gdp_per_capita: f64, year: u32) -> f64 {
    let propensity = config.fly_propensity.value_at(year);
    let max_rate = config.max_fly_rate.value_at(year).max(0.0);

    let income_ratio = gdp_per_capita.max(0.0) / config.reference_gdp_per_capita;
    let rate = propensity * income_ratio.powf(config.income_elasticity);

    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, max_rate)
}

/// Effective flying population; the gravity model's mass term.
pub fn air_mass(config: &DemandConfig, population: f64, gdp_per_capita: f64, year: u32) -> f64 {
    population.max(0.0) * fly_rate(config, gdp_per_capita, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::DECADES;

    #[test]
    fn test_fly_rate_within_bounds() {
        let config = DemandConfig::default();
        for year in [1945, 1950, 1963, 1985, 2000, 2017, 2020, 2030] {
            let max_rate = config.max_fly_rate.value_at(year);
            for gdp in [0.0, 150.0, 1_000.0, 10_000.0, 50_000.0, 1_000_000.0] {
                let rate = fly_rate(&config, gdp, year);
                assert!(rate >= 0.0, "negative rate for gdp {} in {}", gdp, year);
                assert!(rate <= max_rate, "rate {} above cap {} in {}", rate, max_rate, year);
            }
        }
    }

    #[test]
    fn test_fly_rate_non_decreasing_in_gdp() {
        let config = DemandConfig::default();
        for year in DECADES {
            let mut previous = 0.0;
            for step in 0..200 {
                let gdp = step as f64 * 500.0;
                let rate = fly_rate(&config, gdp, year);
                assert!(rate >= previous);
                previous = rate;
            }
        }
    }

    #[test]
    fn test_reference_gdp_gives_propensity() {
        let config = DemandConfig::default();
        let rate = fly_rate(&config, config.reference_gdp_per_capita, 1990);
        assert!((rate - 0.28).abs() < 1e-12);
    }

    #[test]
    fn test_air_mass_scales_population() {
        let config = DemandConfig::default();
        let rate = fly_rate(&config, 8_000.0, 1980);
        assert!((air_mass(&config, 2_000_000.0, 8_000.0, 1980) - 2_000_000.0 * rate).abs() < 1e-6);
        assert_eq!(air_mass(&config, 2_000_000.0, 0.0, 1980), 0.0);
    }
}
