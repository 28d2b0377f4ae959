use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::Directive, prelude::*};
use tracing_timing::{Builder, Histogram};
use std::collections::HashMap;
use parking_lot::RwLock;
use std::time::{Duration, Instant};

// Histogram range: 1ns to 60s, 3 significant figures
const HISTOGRAM_MAX_NS: u64 = 60_000_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

/// Pipeline stage groups used to bucket timings in the report.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OperationCategory {
    Pipeline,
    Assignment,
    DistanceMatrix,
    DemandComputation {
        subcategory: DemandCalcType,
    },
    FileIO {
        subcategory: FileIOType,
    },
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum DemandCalcType {
    Calibration,
    Allocation,
    Normalization,
    Merge,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum FileIOType {
    DataLoad,
    ConfigLoad,
    DatabaseWrite,
    CsvExport,
}

impl OperationCategory {
    pub fn as_str(&self) -> String {
        match self {
            OperationCategory::Pipeline => "Pipeline".to_string(),
            OperationCategory::Assignment => "Zone Assignment".to_string(),
            OperationCategory::DistanceMatrix => "Distance Matrix".to_string(),
            OperationCategory::DemandComputation { subcategory } => {
                format!("Demand Computation - {}", match subcategory {
                    DemandCalcType::Calibration => "Calibration",
                    DemandCalcType::Allocation => "Allocation",
                    DemandCalcType::Normalization => "Normalization",
                    DemandCalcType::Merge => "Merge",
                })
            },
            OperationCategory::FileIO { subcategory } => {
                format!("File I/O - {}", match subcategory {
                    FileIOType::DataLoad => "Data Load",
                    FileIOType::ConfigLoad => "Config Load",
                    FileIOType::DatabaseWrite => "Database Write",
                    FileIOType::CsvExport => "CSV Export",
                })
            },
        }
    }
}

/// Accumulated wall time of one named stage. Decade stages run on several
/// pool threads at once, so `total` can exceed the run's elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTiming {
    pub total: Duration,
    pub count: usize,
    pub longest: Duration,
}

#[derive(Default)]
struct TimingRegistry {
    stages: HashMap<String, StageTiming>,
    categories: HashMap<OperationCategory, Histogram<u64>>,
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref TIMINGS: RwLock<TimingRegistry> = RwLock::new(TimingRegistry::default());
}

fn new_histogram() -> Histogram<u64> {
    Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, HISTOGRAM_SIGFIG)
        .expect("constant histogram bounds are valid")
}

/// Records the elapsed time of a stage when dropped. Inert unless timing
/// was enabled in `init_logging`.
pub struct TimingGuard {
    stage: &'static str,
    category: OperationCategory,
    start: Option<Instant>,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            record_timing(self.stage, &self.category, start.elapsed());
        }
    }
}

pub fn start_timing(stage: &'static str, category: OperationCategory) -> TimingGuard {
    TimingGuard {
        stage,
        category,
        start: is_timing_enabled().then(Instant::now),
    }
}

fn record_timing(stage: &str, category: &OperationCategory, duration: Duration) {
    let mut timings = TIMINGS.write();

    let entry = timings.stages.entry(stage.to_string()).or_default();
    entry.total += duration;
    entry.count += 1;
    entry.longest = entry.longest.max(duration);

    let histogram = timings
        .categories
        .entry(category.clone())
        .or_insert_with(new_histogram);
    let _ = histogram.record((duration.as_nanos() as u64).clamp(1, HISTOGRAM_MAX_NS));
}

/// Snapshot of the per-stage totals recorded so far.
pub fn stage_timing(stage: &str) -> Option<StageTiming> {
    TIMINGS.read().stages.get(stage).copied()
}

pub fn init_logging(enable_timing: bool, debug_logging: bool) {
    TIMING_ENABLED.store(enable_timing, Ordering::SeqCst);

    let crate_directive = if debug_logging { "airdemand=debug" } else { "airdemand=info" };
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy()
        .add_directive(crate_directive.parse::<Directive>().unwrap_or_else(|_| Level::INFO.into()));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).compact();
    let result = if enable_timing {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(Builder::default().layer(new_histogram).boxed());
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    };

    if result.is_err() {
        eprintln!("Tracing subscriber already installed, keeping the existing one");
    }
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }
    let timings = TIMINGS.read();

    println!("\nStage Timings");
    println!("----------------------------------------");
    let mut stages: Vec<_> = timings.stages.iter().collect();
    stages.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    for (stage, timing) in stages {
        println!(
            "{:<24} total={:>8.3}s  runs={:>4}  longest={:>9.2}ms",
            stage,
            timing.total.as_secs_f64(),
            timing.count,
            timing.longest.as_secs_f64() * 1000.0,
        );
    }

    println!("\nBy Category");
    println!("----------------------------------------");
    let mut categories: Vec<_> = timings.categories.iter().collect();
    categories.sort_by_key(|(category, _)| category.as_str());
    for (category, histogram) in categories {
        println!(
            "{}: mean={:.2}ms, p95={:.2}ms, count={}",
            category.as_str(),
            histogram.mean() / 1_000_000.0,
            histogram.value_at_quantile(0.95) as f64 / 1_000_000.0,
            histogram.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(OperationCategory::Pipeline.as_str(), "Pipeline");
        assert_eq!(
            OperationCategory::DemandComputation { subcategory: DemandCalcType::Calibration }.as_str(),
            "Demand Computation - Calibration"
        );
        assert_eq!(
            OperationCategory::FileIO { subcategory: FileIOType::DatabaseWrite }.as_str(),
            "File I/O - Database Write"
        );
    }

    #[test]
    fn test_recorded_stage_accumulates() {
        record_timing("test_stage", &OperationCategory::Assignment, Duration::from_millis(3));
        record_timing("test_stage", &OperationCategory::Assignment, Duration::from_millis(5));

        let timing = stage_timing("test_stage").unwrap();
        assert_eq!(timing.count, 2);
        assert_eq!(timing.total, Duration::from_millis(8));
        assert_eq!(timing.longest, Duration::from_millis(5));
    }

    #[test]
    fn test_guard_without_timing_is_inert() {
        {
            let _timing = start_timing("inert_stage", OperationCategory::Pipeline);
        }
        if !is_timing_enabled() {
            assert!(stage_timing("inert_stage").is_none());
        }
    }
}
