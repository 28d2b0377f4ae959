use std::collections::HashMap;
use crate::config::constants::LAST_DECADE;
use crate::core::pipeline::PipelineOutput;
use crate::data::static_data::StaticData;
use crate::models::airport::AirportId;
use crate::models::demand::AirportPairDemand;
use crate::storage::store::PersistSummary;

/// Airport id to IATA-style code, for printing routes.
pub fn airport_codes(data: &StaticData) -> HashMap<AirportId, &str> {
    data.airports
        .iter()
        .map(|airport| (airport.get_airport_id(), airport.get_code()))
        .collect()
}

/// "LHR-JFK", falling back to the numeric ids for unknown airports.
pub fn route_label(pair: &AirportPairDemand, codes: &HashMap<AirportId, &str>) -> String {
    let from = codes.get(&pair.from_airport).map(|code| code.to_string()).unwrap_or_else(|| pair.from_airport.to_string());
    let to = codes.get(&pair.to_airport).map(|code| code.to_string()).unwrap_or_else(|| pair.to_airport.to_string());
    format!("{}-{}", from, to)
}

pub fn print_input_summary(data: &StaticData, output: &PipelineOutput) {
    let summary = &output.assignment_summary;
    println!("\nInput Summary");
    println!("----------------------------------------");
    println!("Zones: {}", data.zones.len());
    println!("Airports: {} ({} inactive)", data.airports.len(), summary.inactive);
    println!("Mapped airports: {}", summary.mapped());
    println!("  Explicit: {}", summary.explicit);
    println!("  Proximity: {}", summary.proximity);
    if !summary.unmapped.is_empty() {
        println!("Unmapped airports: {}", summary.unmapped.join(", "));
    }
}

pub fn print_decade_table(output: &PipelineOutput) {
    println!("\nDecade Calibration");
    println!("----------------------------------------");
    println!("{:>6} {:>14} {:>14} {:>12} {:>8} {:>8}", "Year", "Raw total", "Target", "Scale", "Kept", "Dropped");
    for decade in &output.decades {
        println!(
            "{:>6} {:>14.3e} {:>14.3e} {:>12.3e} {:>8} {:>8}",
            decade.year,
            decade.calibration.total_raw_demand,
            decade.calibration.target_passengers,
            decade.calibration.scale,
            decade.kept_pairs,
            decade.dropped_pairs,
        );
    }
}

pub fn print_top_routes(data: &StaticData, output: &PipelineOutput, count: usize) {
    if count == 0 {
        return;
    }
    let codes = airport_codes(data);

    println!("\nTop {} Routes ({})", count, LAST_DECADE);
    println!("----------------------------------------");
    for pair in output.top_routes(LAST_DECADE, count) {
        let series: Vec<String> = pair.demand.iter().map(|value| format!("{:>3}", value)).collect();
        println!(
            "{:<9} {:>7.0} nm  [{}]  {} / {}",
            route_label(pair, &codes),
            pair.distance_nm,
            series.join(" "),
            pair.category,
            pair.route_type,
        );
    }
}

pub fn print_distributions(output: &PipelineOutput) {
    println!("\nDemand Categories ({} pairs)", output.pairs.len());
    println!("----------------------------------------");
    for (category, count) in output.category_distribution() {
        println!("{}: {}", category, count);
    }

    println!("\nRoute Types");
    println!("----------------------------------------");
    for (route_type, count) in output.route_type_distribution() {
        println!("{}: {}", route_type, count);
    }
}

pub fn print_persist_summary(summary: &PersistSummary, database: &str) {
    println!("\nPersisted to {}", database);
    println!("----------------------------------------");
    println!("Zones: {}", summary.zones);
    println!("Assignments: {}", summary.assignments);
    println!("Airport pairs: {}", summary.pairs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demand::{DemandCategory, RouteType};

    #[test]
    fn test_route_label_falls_back_to_ids() {
        let pair = AirportPairDemand {
            from_airport: 1,
            to_airport: 99,
            from_zone: "LON".to_string(),
            to_zone: "NYC".to_string(),
            distance_nm: 3_000.0,
            demand: [50; 8],
            category: DemandCategory::Medium,
            route_type: RouteType::MediumHaulInternational,
        };
        let mut codes = HashMap::new();
        codes.insert(1, "LHR");
        assert_eq!(route_label(&pair, &codes), "LHR-99");
    }
}
