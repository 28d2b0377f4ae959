use std::fs;
use std::path::{Path, PathBuf};
use chrono::Local;
use csv::Writer;

use crate::config::constants::DECADES;
use crate::core::pipeline::PipelineOutput;
use crate::data::poi::POI;
use crate::models::zone::Zone;
use crate::utils::errors::DemandResult;
use crate::utils::logging::{self, FileIOType, OperationCategory};

pub const ZONES_CSV: &str = "zones.csv";
pub const ASSIGNMENTS_CSV: &str = "airport_zone_assignments.csv";
pub const PAIR_DEMAND_CSV: &str = "airport_pair_demand.csv";
pub const CALIBRATION_CSV: &str = "decade_calibration.csv";

/// Writes a run's tables as CSV into a timestamped directory.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
    verbose_logging: bool,
}

impl CsvExporter {
    /// Create an exporter writing under `output_dir/<timestamp>/`.
    pub fn new(output_dir: impl AsRef<Path>, verbose_logging: bool) -> DemandResult<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        fs::create_dir_all(&full_path)?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
            verbose_logging,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Export every table of a run
    pub fn export_run(&self, zones: &[Zone], output: &PipelineOutput) -> DemandResult<()> {
        let _timing = logging::start_timing("export_run",
            OperationCategory::FileIO { subcategory: FileIOType::CsvExport });

        self.export_zones(zones)?;
        self.export_assignments(output)?;
        self.export_pair_demand(output)?;
        self.export_calibration(output)?;

        if self.verbose_logging {
            println!("CSV export completed successfully to: {}", self.output_dir.display());
        }
        Ok(())
    }

    fn export_zones(&self, zones: &[Zone]) -> DemandResult<()> {
        let mut writer = Writer::from_path(self.output_dir.join(ZONES_CSV))?;

        let mut header = vec![
            "zone_id".to_string(),
            "name".to_string(),
            "country".to_string(),
            "latitude".to_string(),
            "longitude".to_string(),
        ];
        header.extend(DECADES.iter().map(|year| format!("population_{}", year)));
        writer.write_record(&header)?;

        for zone in zones {
            let coordinate = zone.get_coordinate();
            let mut record = vec![
                zone.get_id().to_string(),
                zone.get_name().to_string(),
                zone.get_country().to_string(),
                format!("{:.4}", coordinate.lat),
                format!("{:.4}", coordinate.lon),
            ];
            record.extend(zone.get_population_series().decade_values().iter().map(|value| format!("{:.0}", value)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn export_assignments(&self, output: &PipelineOutput) -> DemandResult<()> {
        let mut writer = Writer::from_path(self.output_dir.join(ASSIGNMENTS_CSV))?;
        writer.write_record(["airport_id", "airport_code", "zone_id", "demand_share", "method"])?;

        for assignment in &output.assignments {
            writer.write_record(&[
                assignment.airport_id.to_string(),
                assignment.airport_code.clone(),
                assignment.zone_id.clone(),
                format!("{:.6}", assignment.demand_share),
                assignment.method.as_str().to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    fn export_pair_demand(&self, output: &PipelineOutput) -> DemandResult<()> {
        let mut writer = Writer::from_path(self.output_dir.join(PAIR_DEMAND_CSV))?;

        let mut header = vec![
            "from_airport_id".to_string(),
            "to_airport_id".to_string(),
            "from_zone_id".to_string(),
            "to_zone_id".to_string(),
            "distance_nm".to_string(),
        ];
        header.extend(DECADES.iter().map(|year| format!("demand_{}", year)));
        header.push("demand_category".to_string());
        header.push("route_type".to_string());
        writer.write_record(&header)?;

        for pair in &output.pairs {
            let mut record = vec![
                pair.from_airport.to_string(),
                pair.to_airport.to_string(),
                pair.from_zone.clone(),
                pair.to_zone.clone(),
                format!("{:.1}", pair.distance_nm),
            ];
            record.extend(pair.demand.iter().map(|value| value.to_string()));
            record.push(pair.category.as_str().to_string());
            record.push(pair.route_type.as_str().to_string());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn export_calibration(&self, output: &PipelineOutput) -> DemandResult<()> {
        let mut writer = Writer::from_path(self.output_dir.join(CALIBRATION_CSV))?;
        writer.write_record([
            "year",
            "total_raw_demand",
            "target_passengers",
            "scale",
            "max_raw_pair_demand",
            "kept_pairs",
            "dropped_pairs",
        ])?;

        for decade in &output.decades {
            writer.write_record(&[
                decade.year.to_string(),
                format!("{:.6e}", decade.calibration.total_raw_demand),
                format!("{:.0}", decade.calibration.target_passengers),
                format!("{:.6e}", decade.calibration.scale),
                format!("{:.6e}", decade.max_raw),
                decade.kept_pairs.to_string(),
                decade.dropped_pairs.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::demand_config::DemandConfig;
    use crate::core::pipeline::PipelineRun;
    use crate::core::run_control::RunControl;
    use crate::data::static_data::StaticData;

    #[test]
    fn test_export_writes_all_tables() {
        let data = StaticData::embedded().unwrap();
        let config = DemandConfig::default();
        let output = PipelineRun::new(&config, &data, RunControl::silent()).run().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path(), false).unwrap();
        exporter.export_run(&data.zones, &output).unwrap();

        let mut reader = csv::Reader::from_path(exporter.output_dir().join(PAIR_DEMAND_CSV)).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 5 + DECADES.len() + 2);
        assert_eq!(reader.records().count(), output.pairs.len());

        let mut reader = csv::Reader::from_path(exporter.output_dir().join(ZONES_CSV)).unwrap();
        assert_eq!(reader.records().count(), data.zones.len());

        let mut reader = csv::Reader::from_path(exporter.output_dir().join(CALIBRATION_CSV)).unwrap();
        assert_eq!(reader.records().count(), DECADES.len());

        assert!(exporter.output_dir().join(ASSIGNMENTS_CSV).exists());
        assert!(exporter.output_dir().ends_with(exporter.timestamp()));
    }
}
