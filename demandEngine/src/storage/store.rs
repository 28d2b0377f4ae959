//! SQLite persistence for the demand tables.
//!
//! Only this module talks to the database; the pipeline hands it finished
//! rows and never executes SQL itself.

use std::path::Path;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};
use crate::config::constants::DECADE_COUNT;
use crate::data::poi::POI;
use crate::models::airport::{AirportId, AirportZoneAssignment};
use crate::models::demand::AirportPairDemand;
use crate::models::zone::Zone;
use crate::utils::errors::{DemandError, DemandResult};
use crate::utils::logging::{self, FileIOType, OperationCategory};

const ZONE_COLUMNS: &str = "zone_id, name, country, latitude, longitude, \
    population_1950, population_1960, population_1970, population_1980, \
    population_1990, population_2000, population_2010, population_2020";

const ASSIGNMENT_COLUMNS: &str = "airport_id, airport_code, zone_id, demand_share, method";

const PAIR_COLUMNS: &str = "from_airport_id, to_airport_id, from_zone_id, to_zone_id, distance_nm, \
    demand_1950, demand_1960, demand_1970, demand_1980, \
    demand_1990, demand_2000, demand_2010, demand_2020, \
    demand_category, route_type";

/// Rows written by one persist call. Rows skipped by `INSERT OR IGNORE`
/// are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub zones: usize,
    pub assignments: usize,
    pub pairs: usize,
}

pub struct DemandStore {
    conn: Connection,
}

impl DemandStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> DemandResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory database, used in tests.
    pub fn in_memory() -> DemandResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> DemandResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_demand_tables.sql"))?;
        Ok(())
    }

    /// Replaces all three tables in a single transaction. The previous
    /// contents are only deleted inside that transaction, so a failure at
    /// any point leaves them untouched.
    pub fn replace_all(
        &mut self,
        zones: &[Zone],
        assignments: &[AirportZoneAssignment],
        pairs: &[AirportPairDemand],
        batch_size: usize,
    ) -> DemandResult<PersistSummary> {
        let _timing = logging::start_timing("replace_all",
            OperationCategory::FileIO { subcategory: FileIOType::DatabaseWrite });
        check_batch_size(batch_size)?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM airport_pair_demand", [])?;
        tx.execute("DELETE FROM airport_zone_assignments", [])?;
        tx.execute("DELETE FROM zones", [])?;

        let summary = PersistSummary {
            zones: insert_zones(&tx, zones, batch_size)?,
            assignments: insert_assignments(&tx, assignments, batch_size)?,
            pairs: insert_pairs(&tx, pairs, batch_size)?,
        };
        tx.commit()?;

        info!(
            zones = summary.zones,
            assignments = summary.assignments,
            pairs = summary.pairs,
            "demand tables replaced"
        );
        Ok(summary)
    }

    /// Appends demand rows without clearing the table; rows whose airport
    /// pair already exists are skipped. Returns how many were written.
    pub fn insert_pair_demand(&mut self, pairs: &[AirportPairDemand], batch_size: usize) -> DemandResult<usize> {
        check_batch_size(batch_size)?;
        let tx = self.conn.transaction()?;
        let written = insert_pairs(&tx, pairs, batch_size)?;
        tx.commit()?;
        Ok(written)
    }

    // ── Read back ─────────────────────────────────────────────

    pub fn zone_count(&self) -> DemandResult<usize> {
        self.count("zones")
    }

    pub fn assignment_count(&self) -> DemandResult<usize> {
        self.count("airport_zone_assignments")
    }

    pub fn pair_count(&self) -> DemandResult<usize> {
        self.count("airport_pair_demand")
    }

    fn count(&self, table: &str) -> DemandResult<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn demand_for(&self, from: AirportId, to: AirportId) -> DemandResult<Option<[u8; DECADE_COUNT]>> {
        let row = self
            .conn
            .query_row(
                "SELECT demand_1950, demand_1960, demand_1970, demand_1980,
                        demand_1990, demand_2000, demand_2010, demand_2020
                 FROM airport_pair_demand WHERE from_airport_id = ?1 AND to_airport_id = ?2",
                params![from as i64, to as i64],
                |row| {
                    let mut demand = [0u8; DECADE_COUNT];
                    for (idx, slot) in demand.iter_mut().enumerate() {
                        *slot = row.get::<_, i64>(idx)?.clamp(0, u8::MAX as i64) as u8;
                    }
                    Ok(demand)
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn share_for(&self, airport: AirportId) -> DemandResult<Option<(String, f64)>> {
        let row = self
            .conn
            .query_row(
                "SELECT zone_id, demand_share FROM airport_zone_assignments WHERE airport_id = ?1",
                params![airport as i64],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
            )
            .optional()?;
        Ok(row)
    }
}

fn check_batch_size(batch_size: usize) -> DemandResult<()> {
    if batch_size == 0 {
        return Err(DemandError::InvalidData("insert batch size must be non-zero".to_string()));
    }
    Ok(())
}

/// Multi-row `INSERT OR IGNORE` in chunks of `batch_size`.
fn insert_batched<T>(
    tx: &Transaction,
    table: &str,
    columns: &str,
    column_count: usize,
    rows: &[T],
    batch_size: usize,
    bind: impl Fn(&T) -> Vec<Value>,
) -> DemandResult<usize> {
    let placeholder_row = format!("({})", vec!["?"; column_count].join(", "));
    let mut written = 0;

    for chunk in rows.chunks(batch_size) {
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES {}",
            table,
            columns,
            vec![placeholder_row.as_str(); chunk.len()].join(", ")
        );
        let values: Vec<Value> = chunk.iter().flat_map(|row| bind(row)).collect();
        written += tx.execute(&sql, params_from_iter(values.iter()))?;
    }

    debug!(table, rows = rows.len(), written, "batched insert");
    Ok(written)
}

fn insert_zones(tx: &Transaction, zones: &[Zone], batch_size: usize) -> DemandResult<usize> {
    insert_batched(tx, "zones", ZONE_COLUMNS, 5 + DECADE_COUNT, zones, batch_size, |zone| {
        let coordinate = zone.get_coordinate();
        let mut values = vec![
            Value::Text(zone.get_id().to_string()),
            Value::Text(zone.get_name().to_string()),
            Value::Text(zone.get_country().to_string()),
            Value::Real(coordinate.lat),
            Value::Real(coordinate.lon),
        ];
        values.extend(zone.get_population_series().decade_values().into_iter().map(Value::Real));
        values
    })
}

fn insert_assignments(tx: &Transaction, assignments: &[AirportZoneAssignment], batch_size: usize) -> DemandResult<usize> {
    insert_batched(tx, "airport_zone_assignments", ASSIGNMENT_COLUMNS, 5, assignments, batch_size, |assignment| {
        vec![
            Value::Integer(assignment.airport_id as i64),
            Value::Text(assignment.airport_code.clone()),
            Value::Text(assignment.zone_id.clone()),
            Value::Real(assignment.demand_share),
            Value::Text(assignment.method.as_str().to_string()),
        ]
    })
}

fn insert_pairs(tx: &Transaction, pairs: &[AirportPairDemand], batch_size: usize) -> DemandResult<usize> {
    insert_batched(tx, "airport_pair_demand", PAIR_COLUMNS, 7 + DECADE_COUNT, pairs, batch_size, |pair| {
        let mut values = vec![
            Value::Integer(pair.from_airport as i64),
            Value::Integer(pair.to_airport as i64),
            Value::Text(pair.from_zone.clone()),
            Value::Text(pair.to_zone.clone()),
            Value::Real(pair.distance_nm),
        ];
        values.extend(pair.demand.iter().map(|value| Value::Integer(*value as i64)));
        values.push(Value::Text(pair.category.as_str().to_string()));
        values.push(Value::Text(pair.route_type.as_str().to_string()));
        values
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::GeoCoordinate;
    use crate::models::airport::AssignmentMethod;
    use crate::models::demand::{DemandCategory, RouteType};
    use crate::models::time_series::TimeSeries;

    fn zone(id: &str) -> Zone {
        Zone::new(
            id.to_string(),
            id.to_string(),
            "XA".to_string(),
            GeoCoordinate::new(1.0, 2.0),
            TimeSeries::from_decades(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
            Vec::new(),
        )
    }

    fn assignment(airport_id: AirportId, zone_id: &str, share: f64) -> AirportZoneAssignment {
        AirportZoneAssignment {
            airport_id,
            airport_code: format!("A{}", airport_id),
            zone_id: zone_id.to_string(),
            demand_share: share,
            method: AssignmentMethod::Explicit,
        }
    }

    fn pair(from: AirportId, to: AirportId, value: u8) -> AirportPairDemand {
        AirportPairDemand {
            from_airport: from,
            to_airport: to,
            from_zone: "AAA".to_string(),
            to_zone: "BBB".to_string(),
            distance_nm: 1_234.0,
            demand: [value; DECADE_COUNT],
            category: DemandCategory::Medium,
            route_type: RouteType::ShortHaulInternational,
        }
    }

    #[test]
    fn test_replace_all_round_trip() {
        let mut store = DemandStore::in_memory().unwrap();
        let zones = vec![zone("AAA"), zone("BBB")];
        let assignments = vec![assignment(1, "AAA", 1.0), assignment(2, "BBB", 1.0)];
        let pairs: Vec<_> = (0..7).map(|i| pair(1, 100 + i, 42)).collect();

        // batch size smaller than the row count exercises chunking
        let summary = store.replace_all(&zones, &assignments, &pairs, 3).unwrap();
        assert_eq!(summary, PersistSummary { zones: 2, assignments: 2, pairs: 7 });
        assert_eq!(store.pair_count().unwrap(), 7);
        assert_eq!(store.demand_for(1, 104).unwrap(), Some([42; DECADE_COUNT]));
        assert_eq!(store.demand_for(104, 1).unwrap(), None);
        assert_eq!(store.share_for(2).unwrap(), Some(("BBB".to_string(), 1.0)));
    }

    #[test]
    fn test_insert_or_ignore_does_not_duplicate() {
        let mut store = DemandStore::in_memory().unwrap();
        let pairs = vec![pair(1, 2, 10), pair(2, 1, 10)];
        assert_eq!(store.insert_pair_demand(&pairs, 500).unwrap(), 2);
        assert_eq!(store.insert_pair_demand(&pairs, 500).unwrap(), 0);
        assert_eq!(store.pair_count().unwrap(), 2);
    }

    #[test]
    fn test_failed_replace_keeps_previous_contents() {
        let mut store = DemandStore::in_memory().unwrap();
        store.replace_all(&[zone("AAA")], &[assignment(1, "AAA", 1.0)], &[pair(1, 2, 50)], 500).unwrap();

        // assignment references a zone that is not being written
        let result = store.replace_all(&[zone("BBB")], &[assignment(1, "ZZZ", 1.0)], &[pair(3, 4, 60)], 500);
        assert!(matches!(result, Err(DemandError::StoreError(_))));

        assert_eq!(store.zone_count().unwrap(), 1);
        assert_eq!(store.demand_for(1, 2).unwrap(), Some([50; DECADE_COUNT]));
        assert_eq!(store.demand_for(3, 4).unwrap(), None);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut store = DemandStore::in_memory().unwrap();
        assert!(matches!(store.replace_all(&[], &[], &[], 0), Err(DemandError::InvalidData(_))));
    }
}
