use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use airdemand::analysis::reporting;
use airdemand::cli::cli::Args;
use airdemand::config::demand_config::DemandConfig;
use airdemand::core::pipeline::PipelineRun;
use airdemand::core::run_control::RunControl;
use airdemand::data::static_data::StaticData;
use airdemand::storage::store::DemandStore;
use airdemand::utils::csv_export::CsvExporter;
use airdemand::utils::logging::{self, FileIOType, OperationCategory};

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging());

    println!("Zone Gravity Demand Engine (1950-2020)");
    println!("Database: {}, CSV export: {}",
             args.database(),
             args.csv_dir().unwrap_or("disabled"));

    let data = StaticData::load(args.assets_dir().map(Path::new))
        .context("failed to load static datasets")?;
    let config = load_config(args.config())?;

    let control = RunControl::new(!args.no_progress());
    let output = PipelineRun::new(&config, &data, control)
        .with_parallel(!args.sequential())
        .run()
        .context("demand pipeline failed")?;

    let mut store = DemandStore::open(args.database())
        .with_context(|| format!("failed to open database {}", args.database()))?;
    let persisted = store
        .replace_all(&data.zones, &output.assignments, &output.pairs, config.insert_batch_size)
        .context("failed to persist demand tables")?;

    if let Some(csv_dir) = args.csv_dir() {
        let exporter = CsvExporter::new(csv_dir, true)
            .with_context(|| format!("failed to create CSV directory under {}", csv_dir))?;
        exporter.export_run(&data.zones, &output).context("CSV export failed")?;
    }

    reporting::print_input_summary(&data, &output);
    reporting::print_decade_table(&output);
    reporting::print_top_routes(&data, &output, args.sample_routes());
    reporting::print_distributions(&output);
    reporting::print_persist_summary(&persisted, args.database());

    if logging::is_timing_enabled() {
        logging::print_timing_report();
    }

    info!(pairs = output.pairs.len(), "run complete");
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<DemandConfig> {
    let Some(path) = path else {
        return Ok(DemandConfig::default());
    };

    let _timing = logging::start_timing("load_config",
        OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });
    DemandConfig::load(path).with_context(|| format!("failed to load config {}", path))
}
