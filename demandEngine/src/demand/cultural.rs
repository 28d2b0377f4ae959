use std::collections::{HashMap, HashSet};
use crate::config::constants::NO_TIE_MULTIPLIER;
use crate::data::cultural_ties::{CulturalTies, TieGroup};

struct GroupTable {
    members: Vec<(HashSet<String>, f64)>,
}

impl GroupTable {
    fn new(groups: &[TieGroup]) -> Self {
        let members = groups
            .iter()
            .map(|group| (group.countries.iter().cloned().collect(), group.multiplier))
            .collect();
        Self { members }
    }

    fn best_match(&self, a: &str, b: &str) -> Option<f64> {
        self.members
            .iter()
            .filter(|(countries, _)| countries.contains(a) && countries.contains(b))
            .map(|(_, multiplier)| *multiplier)
            .reduce(f64::max)
    }
}

/// Resolves the affinity multiplier between two countries.
///
/// A domestic pair gets the fixed domestic multiplier. Any other pair gets
/// the strongest single tie found across the four tables, never a product.
pub struct CulturalResolver {
    domestic_multiplier: f64,
    language_groups: GroupTable,
    historical_ties: GroupTable,
    trade_blocs: GroupTable,
    bilateral: HashMap<(String, String), f64>,
}

impl CulturalResolver {
    pub fn new(ties: &CulturalTies, domestic_multiplier: f64) -> Self {
        let mut bilateral = HashMap::new();
        for tie in &ties.bilateral {
            let entry = bilateral
                .entry((tie.from.clone(), tie.to.clone()))
                .or_insert(tie.multiplier);
            *entry = f64::max(*entry, tie.multiplier);
        }

        Self {
            domestic_multiplier,
            language_groups: GroupTable::new(&ties.language_groups),
            historical_ties: GroupTable::new(&ties.historical_ties),
            trade_blocs: GroupTable::new(&ties.trade_blocs),
            bilateral,
        }
    }

    pub fn cultural_multiplier(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return self.domestic_multiplier;
        }

        // direction is stored but both orderings are consulted
        let forward = self.bilateral.get(&(a.to_string(), b.to_string())).copied();
        let backward = self.bilateral.get(&(b.to_string(), a.to_string())).copied();

        [
            self.language_groups.best_match(a, b),
            self.historical_ties.best_match(a, b),
            self.trade_blocs.best_match(a, b),
            forward,
            backward,
        ]
        .into_iter()
        .flatten()
        .fold(NO_TIE_MULTIPLIER, f64::max)
    }
}

/// Dense country-by-country multiplier table over interned country codes,
/// used inside the zone-pair loops.
#[derive(Debug, Clone)]
pub struct AffinityMatrix {
    codes: HashMap<String, u16>,
    countries: Vec<String>,
    multipliers: Vec<f64>,
}

impl AffinityMatrix {
    pub fn build<'a>(countries: impl IntoIterator<Item = &'a str>, resolver: &CulturalResolver) -> Self {
        let mut codes: HashMap<String, u16> = HashMap::new();
        let mut ordered: Vec<String> = Vec::new();
        for country in countries {
            if !codes.contains_key(country) {
                codes.insert(country.to_string(), ordered.len() as u16);
                ordered.push(country.to_string());
            }
        }

        let n = ordered.len();
        let mut multipliers = vec![NO_TIE_MULTIPLIER; n * n];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                multipliers[i * n + j] = resolver.cultural_multiplier(a, b);
            }
        }

        Self {
            codes,
            countries: ordered,
            multipliers,
        }
    }

    pub fn code(&self, country: &str) -> Option<u16> {
        self.codes.get(country).copied()
    }

    pub fn multiplier(&self, a: u16, b: u16) -> f64 {
        self.multipliers[a as usize * self.countries.len() + b as usize]
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
