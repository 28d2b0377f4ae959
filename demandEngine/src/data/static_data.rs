use std::fs;
use std::path::Path;
use tracing::info;
use crate::data::airports_loader::{attach_traffic, parse_airports, parse_traffic};
use crate::data::cultural_ties::CulturalTies;
use crate::data::economics::CountryEconomics;
use crate::data::zones_loader::parse_zones;
use crate::models::airport::Airport;
use crate::models::zone::Zone;
use crate::utils::errors::DemandResult;
use crate::utils::logging::{self, FileIOType, OperationCategory};

pub const ZONES_FILE: &str = "zones.json";
pub const AIRPORTS_FILE: &str = "airports.csv";
pub const TRAFFIC_FILE: &str = "airport_traffic.json";
pub const ECONOMICS_FILE: &str = "country_economics.json";
pub const CULTURAL_TIES_FILE: &str = "cultural_ties.json";

const EMBEDDED_ZONES: &str = include_str!("../../assets/zones.json");
const EMBEDDED_AIRPORTS: &str = include_str!("../../assets/airports.csv");
const EMBEDDED_TRAFFIC: &str = include_str!("../../assets/airport_traffic.json");
const EMBEDDED_ECONOMICS: &str = include_str!("../../assets/country_economics.json");
const EMBEDDED_CULTURAL_TIES: &str = include_str!("../../assets/cultural_ties.json");

/// The versioned inputs of one run. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct StaticData {
    pub zones: Vec<Zone>,
    pub airports: Vec<Airport>,
    pub economics: CountryEconomics,
    pub cultural_ties: CulturalTies,
}

impl StaticData {
    pub fn new(
        zones: Vec<Zone>,
        airports: Vec<Airport>,
        economics: CountryEconomics,
        cultural_ties: CulturalTies,
    ) -> Self {
        Self {
            zones,
            airports,
            economics,
            cultural_ties,
        }
    }

    /// Datasets compiled into the binary.
    pub fn embedded() -> DemandResult<Self> {
        Self::load(None)
    }

    /// Loads each dataset from `assets_dir` when the file exists there,
    /// falling back to the embedded copy otherwise.
    pub fn load(assets_dir: Option<&Path>) -> DemandResult<Self> {
        let _timing = logging::start_timing("load_static_data",
            OperationCategory::FileIO { subcategory: FileIOType::DataLoad });

        let zones = parse_zones(&read_asset(assets_dir, ZONES_FILE, EMBEDDED_ZONES)?)?;
        let mut airports = parse_airports(&read_asset(assets_dir, AIRPORTS_FILE, EMBEDDED_AIRPORTS)?)?;
        let traffic = parse_traffic(&read_asset(assets_dir, TRAFFIC_FILE, EMBEDDED_TRAFFIC)?)?;
        let with_traffic = attach_traffic(&mut airports, &traffic);
        let economics = CountryEconomics::from_json_str(&read_asset(assets_dir, ECONOMICS_FILE, EMBEDDED_ECONOMICS)?)?;
        let cultural_ties = CulturalTies::from_json_str(&read_asset(assets_dir, CULTURAL_TIES_FILE, EMBEDDED_CULTURAL_TIES)?)?;

        info!(
            zones = zones.len(),
            airports = airports.len(),
            airports_with_traffic = with_traffic,
            countries = economics.len(),
            "static datasets loaded"
        );

        Ok(Self::new(zones, airports, economics, cultural_ties))
    }
}

fn read_asset(assets_dir: Option<&Path>, file_name: &str, embedded: &str) -> DemandResult<String> {
    if let Some(dir) = assets_dir {
        let path = dir.join(file_name);
        if path.exists() {
            info!(path = %path.display(), "loading dataset from assets directory");
            return Ok(fs::read_to_string(path)?);
        }
    }
    Ok(embedded.to_string())
}
