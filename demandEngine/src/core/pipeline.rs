use std::collections::{BTreeMap, HashMap};
use rayon::prelude::*;
use tracing::{info, warn};
use crate::config::constants::{DECADES, DECADE_COUNT};
use crate::config::demand_config::DemandConfig;
use crate::core::decade::{compute_decade, AirportPair, DecadeContext, DecadeDemand};
use crate::core::run_control::RunControl;
use crate::data::poi::POI;
use crate::data::static_data::StaticData;
use crate::demand::assignment::{build_assignments, AssignmentSummary};
use crate::demand::calibration::Calibration;
use crate::demand::classification::{demand_category, route_type};
use crate::demand::cultural::CulturalResolver;
use crate::demand::gravity::GravityModel;
use crate::demand::network::ZoneNetwork;
use crate::models::airport::{Airport, AirportId, AirportZoneAssignment};
use crate::models::demand::{AirportPairDemand, DemandCategory, RouteType};
use crate::utils::errors::{DemandError, DemandResult};
use crate::utils::logging::{self, DemandCalcType, OperationCategory};

/// Per-decade statistics kept for reporting.
#[derive(Debug, Clone, Copy)]
pub struct DecadeSummary {
    pub year: u32,
    pub calibration: Calibration,
    pub max_raw: f64,
    pub candidate_pairs: usize,
    pub kept_pairs: usize,
    pub dropped_pairs: usize,
}

impl From<&DecadeDemand> for DecadeSummary {
    fn from(decade: &DecadeDemand) -> Self {
        Self {
            year: decade.year,
            calibration: decade.calibration,
            max_raw: decade.max_raw,
            candidate_pairs: decade.candidate_pairs,
            kept_pairs: decade.pairs.len(),
            dropped_pairs: decade.dropped_pairs,
        }
    }
}

/// Everything one run produces, ready to persist.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub assignments: Vec<AirportZoneAssignment>,
    pub assignment_summary: AssignmentSummary,
    pub decades: Vec<DecadeSummary>,
    /// Sorted by (from_airport, to_airport).
    pub pairs: Vec<AirportPairDemand>,
}

impl PipelineOutput {
    pub fn find(&self, from: AirportId, to: AirportId) -> Option<&AirportPairDemand> {
        self.pairs
            .binary_search_by(|pair| (pair.from_airport, pair.to_airport).cmp(&(from, to)))
            .ok()
            .map(|idx| &self.pairs[idx])
    }

    pub fn category_distribution(&self) -> BTreeMap<DemandCategory, usize> {
        let mut distribution = BTreeMap::new();
        for pair in &self.pairs {
            *distribution.entry(pair.category).or_insert(0) += 1;
        }
        distribution
    }

    pub fn route_type_distribution(&self) -> BTreeMap<RouteType, usize> {
        let mut distribution = BTreeMap::new();
        for pair in &self.pairs {
            *distribution.entry(pair.route_type).or_insert(0) += 1;
        }
        distribution
    }

    /// Highest-demand pairs for a decade year, strongest first.
    pub fn top_routes(&self, year: u32, count: usize) -> Vec<&AirportPairDemand> {
        let mut routes: Vec<&AirportPairDemand> = self
            .pairs
            .iter()
            .filter(|pair| pair.demand_for(year).unwrap_or(0) > 0)
            .collect();
        routes.sort_by(|a, b| {
            b.demand_for(year)
                .cmp(&a.demand_for(year))
                .then(a.from_airport.cmp(&b.from_airport))
                .then(a.to_airport.cmp(&b.to_airport))
        });
        routes.truncate(count);
        routes
    }
}

#[derive(Debug, Clone)]
struct PairRecord {
    from_zone: usize,
    to_zone: usize,
    demand: [u8; DECADE_COUNT],
}

/// A single run of the demand pipeline.
///
/// Owns the state that accumulates across stages (zone shares, the merged
/// per-pair decade record) so nothing leaks between runs.
pub struct PipelineRun<'a> {
    config: &'a DemandConfig,
    data: &'a StaticData,
    control: RunControl,
    parallel: bool,
    zone_shares: Vec<Vec<(AirportId, f64)>>,
    accumulated: BTreeMap<AirportPair, PairRecord>,
}

impl<'a> PipelineRun<'a> {
    pub fn new(config: &'a DemandConfig, data: &'a StaticData, control: RunControl) -> Self {
        Self {
            config,
            data,
            control,
            parallel: true,
            zone_shares: Vec::new(),
            accumulated: BTreeMap::new(),
        }
    }

    /// Run the decades one after another instead of on the thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(mut self) -> DemandResult<PipelineOutput> {
        let _timing = logging::start_timing("pipeline_run", OperationCategory::Pipeline);
        let result = self.execute();
        match &result {
            Ok(_) => self.control.finish("demand computed"),
            Err(_) => self.control.abandon(),
        }
        result
    }

    fn execute(&mut self) -> DemandResult<PipelineOutput> {
        let config = self.config;
        let data = self.data;
        config.validate()?;

        info!(zones = data.zones.len(), airports = data.airports.len(), "starting demand pipeline");
        self.warn_missing_economics();

        let assignments = build_assignments(&data.zones, &data.airports, config)?;
        self.zone_shares = assignments.by_zone.clone();
        self.control.check()?;

        let resolver = CulturalResolver::new(&data.cultural_ties, config.domestic_multiplier);
        let network = ZoneNetwork::build(&data.zones, &resolver);
        let model = GravityModel::new(config, &resolver);

        let decades = self.compute_decades(&network, &model)?;
        self.control.check()?;

        self.merge_decades(&decades);
        let pairs = self.build_pair_demand()?;

        info!(
            pairs = pairs.len(),
            mapped_airports = assignments.summary.mapped(),
            unmapped_airports = assignments.summary.unmapped.len(),
            "demand pipeline finished"
        );

        Ok(PipelineOutput {
            assignments: assignments.assignments,
            assignment_summary: assignments.summary,
            decades: decades.iter().map(DecadeSummary::from).collect(),
            pairs,
        })
    }

    fn warn_missing_economics(&self) {
        let countries = self.data.zones.iter().map(|zone| zone.get_country());
        for country in self.data.economics.missing_countries(countries) {
            warn!(
                country = %country,
                calibration_fallback = self.config.gdp_fallback_calibration,
                demand_fallback = self.config.gdp_fallback_demand,
                "no GDP data for country, using fallback values"
            );
        }
    }

    fn compute_decades(&self, network: &ZoneNetwork, model: &GravityModel) -> DemandResult<Vec<DecadeDemand>> {
        let ctx = DecadeContext {
            config: self.config,
            network,
            economics: &self.data.economics,
            model,
            zone_shares: &self.zone_shares,
        };

        self.control.start((DECADES.len() * network.len()) as u64, "decades");

        if self.parallel {
            DECADES
                .par_iter()
                .map(|year| compute_decade(&ctx, *year, &self.control))
                .collect()
        } else {
            DECADES
                .iter()
                .map(|year| compute_decade(&ctx, *year, &self.control))
                .collect()
        }
    }

    /// Folds each decade's kept pairs into the cumulative record, in decade
    /// order.
    fn merge_decades(&mut self, decades: &[DecadeDemand]) {
        let _timing = logging::start_timing("merge_decades",
            OperationCategory::DemandComputation { subcategory: DemandCalcType::Merge });

        for decade in decades {
            let Some(slot) = DECADES.iter().position(|year| *year == decade.year) else {
                continue;
            };
            for (key, pair) in &decade.pairs {
                let record = self.accumulated.entry(*key).or_insert_with(|| PairRecord {
                    from_zone: pair.from_zone,
                    to_zone: pair.to_zone,
                    demand: [0; DECADE_COUNT],
                });
                record.demand[slot] = record.demand[slot].max(pair.normalized);
            }
        }
    }

    fn build_pair_demand(&self) -> DemandResult<Vec<AirportPairDemand>> {
        let airports: HashMap<AirportId, &Airport> = self
            .data
            .airports
            .iter()
            .map(|airport| (airport.get_airport_id(), airport))
            .collect();
        let zones = &self.data.zones;

        // BTreeMap iteration keeps the output sorted by airport pair
        self.accumulated
            .iter()
            .map(|(&(from_id, to_id), record)| {
                let from = airports.get(&from_id).ok_or_else(|| missing_airport(from_id))?;
                let to = airports.get(&to_id).ok_or_else(|| missing_airport(to_id))?;
                let distance_nm = from.get_coordinate().distance_nm(to.get_coordinate());

                Ok(AirportPairDemand {
                    from_airport: from_id,
                    to_airport: to_id,
                    from_zone: zones[record.from_zone].get_id().to_string(),
                    to_zone: zones[record.to_zone].get_id().to_string(),
                    distance_nm,
                    demand: record.demand,
                    category: demand_category(&record.demand),
                    route_type: route_type(from, to, distance_nm),
                })
            })
            .collect()
    }
}

fn missing_airport(id: AirportId) -> DemandError {
    DemandError::InvalidData(format!("airport {} allocated demand but is not in the airport table", id))
}
