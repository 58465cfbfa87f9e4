// Statistics Registry
//
// Owned map from table name to its current statistics. Entries are replaced
// whole, so a reader holding an Arc keeps a consistent snapshot while a
// rebuild runs.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use crate::query::executor::result::QueryResult;
use crate::storage::Storage;
use super::{StatisticsConfig, TableStatistics};

pub struct StatisticsRegistry {
    config: StatisticsConfig,
    tables: RwLock<HashMap<String, Arc<TableStatistics>>>,
}

impl Default for StatisticsRegistry {
    fn default() -> Self {
        Self::new(StatisticsConfig::default())
    }
}

impl StatisticsRegistry {
    pub fn new(config: StatisticsConfig) -> Self {
        StatisticsRegistry {
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    /// Current statistics for a table, if any have been computed
    pub fn get(&self, table: &str) -> Option<Arc<TableStatistics>> {
        self.tables.read().get(table).cloned()
    }

    /// Install statistics for their table, returning the entry they replace
    pub fn set(&self, stats: TableStatistics) -> Option<Arc<TableStatistics>> {
        let name = stats.table_name().to_string();
        self.tables.write().insert(name, Arc::new(stats))
    }

    pub fn remove(&self, table: &str) -> Option<Arc<TableStatistics>> {
        self.tables.write().remove(table)
    }

    /// Names of tables with statistics, sorted
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Rebuild one table's statistics and install them
    pub fn compute(&self, storage: Arc<dyn Storage>, table: &str) -> QueryResult<Arc<TableStatistics>> {
        let stats = Arc::new(TableStatistics::compute(storage, table, &self.config)?);
        self.tables.write().insert(table.to_string(), Arc::clone(&stats));
        Ok(stats)
    }

    /// Rebuild statistics for every table in `storage`.
    ///
    /// The new map is built off to the side and swapped in at once; on error
    /// the previous statistics stay in place. Returns the number of tables.
    pub fn compute_all(&self, storage: Arc<dyn Storage>) -> QueryResult<usize> {
        let mut rebuilt = HashMap::new();
        for table in storage.table_names() {
            debug!("computing statistics for {}", table);
            let stats = TableStatistics::compute(Arc::clone(&storage), &table, &self.config)?;
            rebuilt.insert(table, Arc::new(stats));
        }

        let count = rebuilt.len();
        *self.tables.write() = rebuilt;
        info!("statistics registry rebuilt for {} tables", count);
        Ok(count)
    }
}
