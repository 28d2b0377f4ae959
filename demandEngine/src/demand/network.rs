use crate::config::const_funcs::air_mass;
use crate::config::demand_config::DemandConfig;
use crate::data::economics::CountryEconomics;
use crate::data::poi::POI;
use crate::demand::cultural::{AffinityMatrix, CulturalResolver};
use crate::demand::distance_matrix::DistanceMatrix;
use crate::models::zone::Zone;

/// Time-invariant view of the zone set used by the pair loops: distances,
/// interned country codes and the country affinity table.
pub struct ZoneNetwork<'a> {
    zones: &'a [Zone],
    distances: DistanceMatrix,
    country_codes: Vec<u16>,
    affinity: AffinityMatrix,
}

impl<'a> ZoneNetwork<'a> {
    pub fn build(zones: &'a [Zone], resolver: &CulturalResolver) -> Self {
        let distances = DistanceMatrix::build(zones);
        let affinity = AffinityMatrix::build(zones.iter().map(|zone| zone.get_country()), resolver);
        let country_codes = zones
            .iter()
            .map(|zone| affinity.code(zone.get_country()).unwrap_or_default())
            .collect();

        Self {
            zones,
            distances,
            country_codes,
            affinity,
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &'a [Zone] {
        self.zones
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances.get(i, j)
    }

    pub fn same_country(&self, i: usize, j: usize) -> bool {
        self.country_codes[i] == self.country_codes[j]
    }

    /// Cultural multiplier between the countries of zones `i` and `j`.
    pub fn multiplier(&self, i: usize, j: usize) -> f64 {
        self.affinity.multiplier(self.country_codes[i], self.country_codes[j])
    }

    /// Air mass of every zone for `year`, with `gdp_fallback` standing in
    /// for countries missing from the economics table.
    pub fn air_masses(
        &self,
        economics: &CountryEconomics,
        config: &DemandConfig,
        year: u32,
        gdp_fallback: f64,
    ) -> Vec<f64> {
        self.zones
            .iter()
            .map(|zone| {
                let gdp = economics.gdp_or(zone.get_country(), year, gdp_fallback);
                air_mass(config, zone.population_at(year), gdp, year)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cultural_ties::{CulturalTies, TieGroup};
    use crate::data::poi::GeoCoordinate;
    use crate::models::time_series::TimeSeries;

    fn zone(id: &str, country: &str, lat: f64, lon: f64) -> Zone {
        Zone::new(
            id.to_string(),
            id.to_string(),
            country.to_string(),
            GeoCoordinate::new(lat, lon),
            TimeSeries::from_decades(&[1_000.0; 8]),
            Vec::new(),
        )
    }

    #[test]
    fn test_network_multipliers_follow_countries() {
        let ties = CulturalTies {
            language_groups: vec![TieGroup {
                name: "english".to_string(),
                multiplier: 1.5,
                countries: vec!["GB".to_string(), "US".to_string()],
            }],
            ..CulturalTies::default()
        };
        let resolver = CulturalResolver::new(&ties, 1.0);
        let zones = vec![
            zone("LON", "GB", 51.5, -0.1),
            zone("MAN", "GB", 53.5, -2.2),
            zone("NYC", "US", 40.7, -74.0),
            zone("PAR", "FR", 48.9, 2.35),
        ];
        let network = ZoneNetwork::build(&zones, &resolver);

        assert!(network.same_country(0, 1));
        assert!(!network.same_country(0, 2));
        assert_eq!(network.multiplier(0, 1), 1.0);
        assert_eq!(network.multiplier(0, 2), 1.5);
        assert_eq!(network.multiplier(2, 0), 1.5);
        assert_eq!(network.multiplier(0, 3), 1.0);
    }

    #[test]
    fn test_air_masses_use_fallback_for_missing_country() {
        let resolver = CulturalResolver::new(&CulturalTies::default(), 1.0);
        let zones = vec![zone("AAA", "XA", 0.0, 0.0), zone("BBB", "XB", 10.0, 10.0)];
        let network = ZoneNetwork::build(&zones, &resolver);
        let mut economics = CountryEconomics::new();
        economics.insert("XA", TimeSeries::from_decades(&[10_000.0; 8]));
        let config = DemandConfig::default();

        let masses = network.air_masses(&economics, &config, 2000, 5_000.0);
        assert!((masses[0] - air_mass(&config, 1_000_000.0, 10_000.0, 2000)).abs() < 1e-6);
        assert!((masses[1] - air_mass(&config, 1_000_000.0, 5_000.0, 2000)).abs() < 1e-6);
    }
}
