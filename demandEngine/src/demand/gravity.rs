use crate::config::const_funcs::air_mass;
use crate::config::demand_config::DemandConfig;
use crate::data::poi::POI;
use crate::demand::cultural::CulturalResolver;
use crate::models::zone::Zone;

/// Gravity formula over zone air masses:
/// `mass_a^alpha * mass_b^alpha * effective_distance^(-gamma) * cultural`.
pub struct GravityModel<'a> {
    config: &'a DemandConfig,
    cultural: &'a CulturalResolver,
}

impl<'a> GravityModel<'a> {
    pub fn new(config: &'a DemandConfig, cultural: &'a CulturalResolver) -> Self {
        Self { config, cultural }
    }

    pub fn config(&self) -> &DemandConfig {
        self.config
    }

    pub fn is_viable_distance(&self, distance_nm: f64) -> bool {
        distance_nm >= self.config.min_viable_distance_nm && distance_nm <= self.config.max_viable_distance_nm
    }

    /// Raw (uncalibrated) demand between two zones for `year`.
    pub fn raw_zone_demand(
        &self,
        zone_a: &Zone,
        zone_b: &Zone,
        gdp_a: f64,
        gdp_b: f64,
        distance_nm: f64,
        year: u32,
    ) -> f64 {
        if !self.is_viable_distance(distance_nm) {
            return 0.0;
        }

        let mass_a = air_mass(self.config, zone_a.population_at(year), gdp_a, year);
        let mass_b = air_mass(self.config, zone_b.population_at(year), gdp_b, year);
        let multiplier = self.cultural.cultural_multiplier(zone_a.get_country(), zone_b.get_country());

        self.gravity(mass_a, mass_b, distance_nm, multiplier)
    }

    /// Gravity term from precomputed air masses and multiplier. Returns 0 for
    /// a non-viable distance or a negligible mass on either side.
    pub fn gravity(&self, mass_a: f64, mass_b: f64, distance_nm: f64, multiplier: f64) -> f64 {
        if !self.is_viable_distance(distance_nm) {
            return 0.0;
        }
        let epsilon = self.config.air_mass_epsilon;
        if !(mass_a >= epsilon && mass_b >= epsilon) {
            return 0.0;
        }

        let alpha = self.config.mass_exponent;
        let effective_distance = distance_nm.max(self.config.min_effective_distance_nm);

        mass_a.powf(alpha) * mass_b.powf(alpha) * effective_distance.powf(-self.config.distance_decay) * multiplier
    }
}
