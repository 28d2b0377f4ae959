use std::collections::HashMap;
use tracing::{debug, info, warn};
use crate::config::constants::ZONE_INDEX_CELL_DEGREES;
use crate::config::demand_config::DemandConfig;
use crate::data::poi::POI;
use crate::models::airport::{Airport, AirportId, AirportZoneAssignment, AssignmentMethod};
use crate::models::zone::Zone;
use crate::utils::errors::{DemandError, DemandResult};
use crate::utils::logging::{self, OperationCategory};
use crate::utils::spatial_index::ZoneSpatialIndex;

/// Where an airport landed. Indices refer to the zone slice the assigner
/// was built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Explicit(usize),
    Proximity(usize),
    Unmapped,
}

impl AssignmentOutcome {
    pub fn zone_index(&self) -> Option<usize> {
        match self {
            AssignmentOutcome::Explicit(idx) | AssignmentOutcome::Proximity(idx) => Some(*idx),
            AssignmentOutcome::Unmapped => None,
        }
    }
}

/// Maps airports to zones: explicit membership first, then the nearest
/// same-country zone centroid within the proximity radius.
pub struct ZoneAssigner<'a> {
    zones: &'a [Zone],
    explicit: HashMap<&'a str, usize>,
    index: ZoneSpatialIndex,
    radius_nm: f64,
}

impl<'a> ZoneAssigner<'a> {
    pub fn new(zones: &'a [Zone], radius_nm: f64) -> DemandResult<Self> {
        let mut explicit = HashMap::new();
        for (idx, zone) in zones.iter().enumerate() {
            for code in zone.get_member_airports() {
                if let Some(previous) = explicit.insert(code.as_str(), idx) {
                    return Err(DemandError::InvalidData(format!(
                        "airport {} is an explicit member of both {} and {}",
                        code,
                        zones[previous].get_id(),
                        zone.get_id()
                    )));
                }
            }
        }

        let index = ZoneSpatialIndex::new(zones.iter().map(|zone| *zone.get_coordinate()), ZONE_INDEX_CELL_DEGREES);

        Ok(Self {
            zones,
            explicit,
            index,
            radius_nm,
        })
    }

    pub fn assign_zone(&self, airport: &Airport) -> AssignmentOutcome {
        if let Some(idx) = self.explicit.get(airport.get_code()) {
            return AssignmentOutcome::Explicit(*idx);
        }

        let country = airport.get_country();
        self.index
            .nearest_within(airport.get_coordinate(), self.radius_nm, |idx| {
                self.zones[idx].get_country() == country
            })
            .map_or(AssignmentOutcome::Unmapped, |(idx, _)| AssignmentOutcome::Proximity(idx))
    }
}

/// Splits a zone's demand across its airports.
///
/// Historical traffic at `year` is the weight when every airport in the zone
/// has a positive figure and the figures are not all identical; otherwise the
/// airport-class weight table is used for the whole zone. A lone airport gets exactly 1.0 and a zero total
/// weight falls back to an even split.
pub fn demand_shares(airports: &[&Airport], year: u32) -> Vec<f64> {
    match airports.len() {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let traffic: Option<Vec<f64>> = airports
        .iter()
        .map(|airport| airport.traffic_at(year).filter(|pax| pax.is_finite() && *pax > 0.0))
        .collect::<Option<Vec<f64>>>()
        .filter(|values| !is_placeholder_traffic(values));

    let weights = traffic.unwrap_or_else(|| {
        airports
            .iter()
            .map(|airport| airport.get_class().share_weight())
            .collect()
    });

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        let even = 1.0 / airports.len() as f64;
        return vec![even; airports.len()];
    }

    weights.iter().map(|weight| weight / total).collect()
}

// the same figure on every airport is filler data and cannot rank them
fn is_placeholder_traffic(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentSummary {
    pub explicit: usize,
    pub proximity: usize,
    pub unmapped: Vec<String>,
    pub inactive: usize,
}

impl AssignmentSummary {
    pub fn mapped(&self) -> usize {
        self.explicit + self.proximity
    }
}

/// Assignment table plus the per-zone (airport, share) lists the decade
/// loops allocate over.
#[derive(Debug, Clone, Default)]
pub struct ZoneAssignments {
    pub assignments: Vec<AirportZoneAssignment>,
    pub by_zone: Vec<Vec<(AirportId, f64)>>,
    pub summary: AssignmentSummary,
}

/// Assigns every active airport and computes shares once, at the
/// configured reference year.
pub fn build_assignments(zones: &[Zone], airports: &[Airport], config: &DemandConfig) -> DemandResult<ZoneAssignments> {
    let _timing = logging::start_timing("build_assignments", OperationCategory::Assignment);

    let assigner = ZoneAssigner::new(zones, config.proximity_radius_nm)?;
    let mut summary = AssignmentSummary::default();
    let mut members: Vec<Vec<(&Airport, AssignmentMethod)>> = vec![Vec::new(); zones.len()];

    for airport in airports {
        if !airport.is_active() {
            summary.inactive += 1;
            continue;
        }
        match assigner.assign_zone(airport) {
            AssignmentOutcome::Explicit(idx) => {
                summary.explicit += 1;
                members[idx].push((airport, AssignmentMethod::Explicit));
            }
            AssignmentOutcome::Proximity(idx) => {
                summary.proximity += 1;
                debug!(airport = airport.get_code(), zone = zones[idx].get_id(), "assigned by proximity");
                members[idx].push((airport, AssignmentMethod::Proximity));
            }
            AssignmentOutcome::Unmapped => {
                warn!(airport = airport.get_code(), country = airport.get_country(), "airport not mapped to any zone");
                summary.unmapped.push(airport.get_code().to_string());
            }
        }
    }

    let mut assignments = Vec::new();
    let mut by_zone = Vec::with_capacity(zones.len());
    for (zone, zone_members) in zones.iter().zip(members.iter()) {
        let airports_in_zone: Vec<&Airport> = zone_members.iter().map(|(airport, _)| *airport).collect();
        let shares = demand_shares(&airports_in_zone, config.share_reference_year);

        let mut shares_for_zone = Vec::with_capacity(shares.len());
        for ((airport, method), share) in zone_members.iter().zip(shares) {
            assignments.push(AirportZoneAssignment {
                airport_id: airport.get_airport_id(),
                airport_code: airport.get_code().to_string(),
                zone_id: zone.get_id().to_string(),
                demand_share: share,
                method: *method,
            });
            shares_for_zone.push((airport.get_airport_id(), share));
        }
        by_zone.push(shares_for_zone);
    }

    info!(
        explicit = summary.explicit,
        proximity = summary.proximity,
        unmapped = summary.unmapped.len(),
        inactive = summary.inactive,
        "airports assigned to zones"
    );

    Ok(ZoneAssignments {
        assignments,
        by_zone,
        summary,
    })
}
