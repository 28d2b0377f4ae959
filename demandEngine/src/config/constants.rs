// Time Constants
pub const DECADE_COUNT: usize = 8;
pub const DECADES: [u32; DECADE_COUNT] = [1950, 1960, 1970, 1980, 1990, 2000, 2010, 2020];
pub const FIRST_DECADE: u32 = 1950;
pub const LAST_DECADE: u32 = 2020;

// Gravity Model Exponents
pub const MASS_EXPONENT: f64 = 0.7;           // alpha, diminishing returns on air mass
pub const DISTANCE_DECAY: f64 = 0.7;          // gamma, gentler than typical literature values
pub const INCOME_ELASTICITY: f64 = 1.2;       // eta
pub const REFERENCE_GDP_PER_CAPITA: f64 = 10_000.0; // USD
pub const AIR_MASS_EPSILON: f64 = 1e-6;

// Population series are stored in thousands
pub const POPULATION_UNIT: f64 = 1_000.0;

// Distance Bounds (nautical miles)
pub const EARTH_RADIUS_NM: f64 = 3_440.065;
pub const NM_PER_DEGREE_LAT: f64 = 60.0;
pub const MIN_VIABLE_DISTANCE_NM: f64 = 50.0;
pub const MAX_VIABLE_DISTANCE_NM: f64 = 9_000.0;
pub const MIN_EFFECTIVE_DISTANCE_NM: f64 = 250.0;

// Cultural Affinity
pub const DOMESTIC_MULTIPLIER: f64 = 1.0;
pub const NO_TIE_MULTIPLIER: f64 = 1.0;

// Flying propensity at reference GDP, by decade
pub const FLY_PROPENSITY: [(u32, f64); DECADE_COUNT] = [
    (1950, 0.02),
    (1960, 0.05),
    (1970, 0.10),
    (1980, 0.18),
    (1990, 0.28),
    (2000, 0.40),
    (2010, 0.55),
    (2020, 0.70),
];

// Ceiling on the flying rate, by decade
pub const MAX_FLY_RATE: [(u32, f64); DECADE_COUNT] = [
    (1950, 0.10),
    (1960, 0.20),
    (1970, 0.35),
    (1980, 0.50),
    (1990, 0.65),
    (2000, 0.80),
    (2010, 0.90),
    (2020, 0.95),
];

// World scheduled passengers, millions. 2020 anchors on the pre-pandemic level.
pub const HISTORICAL_PASSENGERS_MILLIONS: [(u32, f64); DECADE_COUNT] = [
    (1950, 31.0),
    (1960, 106.0),
    (1970, 383.0),
    (1980, 748.0),
    (1990, 1_025.0),
    (2000, 1_674.0),
    (2010, 2_628.0),
    (2020, 4_500.0),
];
pub const PASSENGER_UNIT: f64 = 1_000_000.0;

// GDP fallbacks for countries missing from the economics table.
// The calibration pass and the demand pass use different defaults.
pub const GDP_FALLBACK_CALIBRATION: f64 = 1_000.0;
pub const GDP_FALLBACK_DEMAND: f64 = 5_000.0;

// Zone Assignment
pub const PROXIMITY_RADIUS_NM: f64 = 81.0;    // ~150 km
pub const SHARE_REFERENCE_YEAR: u32 = 2000;
pub const SHARE_SUM_TOLERANCE: f64 = 1e-4;
pub const ZONE_INDEX_CELL_DEGREES: f64 = 2.0;

// Airport class weights used when no traffic history is available
pub const LARGE_AIRPORT_WEIGHT: f64 = 100.0;
pub const MEDIUM_AIRPORT_WEIGHT: f64 = 20.0;
pub const SMALL_AIRPORT_WEIGHT: f64 = 3.0;
pub const CLOSED_AIRPORT_WEIGHT: f64 = 0.5;

// Normalization
pub const NORMALIZED_MAX: f64 = 100.0;
pub const COMPRESSION_EXPONENT: f64 = 0.25;
pub const MIN_DEMAND_THRESHOLD: u8 = 3;

// Demand Categories (applied to the peak of the most recent decades)
pub const CATEGORY_RECENT_DECADES: usize = 3;
pub const VERY_HIGH_DEMAND_THRESHOLD: u8 = 80;
pub const HIGH_DEMAND_THRESHOLD: u8 = 60;
pub const MEDIUM_DEMAND_THRESHOLD: u8 = 40;
pub const LOW_DEMAND_THRESHOLD: u8 = 20;

// Route Types
pub const DOMESTIC_REGIONAL_MAX_NM: f64 = 300.0;
pub const SHORT_HAUL_MAX_NM: f64 = 1_500.0;
pub const MEDIUM_HAUL_MAX_NM: f64 = 3_500.0;

// Persistence
pub const INSERT_BATCH_SIZE: usize = 500;
pub const DEFAULT_DATABASE_PATH: &str = "airdemand.sqlite";
