// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Mock table master for testing
//!
//! Holds catalog state in memory, counts calls per method and can be told to
//! fail the next N calls with a chosen transport error.

use crate::proto::{ColumnStatisticsInfo, DatabaseInfo, PartitionInfo, TableInfo};
use crate::transport::{TableMasterTransport, TransportError, TransportResult};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Default)]
struct MockTable {
    info: TableInfo,
    partitions: Vec<PartitionInfo>,
    column_statistics: Vec<ColumnStatisticsInfo>,
    partition_column_statistics: HashMap<String, Vec<ColumnStatisticsInfo>>,
}

struct MockDatabase {
    info: DatabaseInfo,
    tables: BTreeMap<String, MockTable>,
}

pub struct MockTableMaster {
    address: String,
    databases: RwLock<BTreeMap<String, MockDatabase>>,

    /// Errors returned by the next calls, in order
    failures: Mutex<VecDeque<TransportError>>,

    /// Method name -> invocation count
    calls: DashMap<&'static str, usize>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl MockTableMaster {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            databases: RwLock::new(BTreeMap::new()),
            failures: Mutex::new(VecDeque::new()),
            calls: DashMap::new(),
        }
    }

    pub fn add_database(&self, info: DatabaseInfo) {
        self.databases.write().insert(
            key(&info.db_name),
            MockDatabase {
                info,
                tables: BTreeMap::new(),
            },
        );
    }

    /// Add a table, creating its database if needed
    pub fn add_table(&self, info: TableInfo) {
        let mut databases = self.databases.write();
        let database = databases.entry(key(&info.db_name)).or_insert_with(|| MockDatabase {
            info: DatabaseInfo {
                db_name: info.db_name.clone(),
                ..DatabaseInfo::default()
            },
            tables: BTreeMap::new(),
        });
        database.tables.insert(
            key(&info.table_name),
            MockTable {
                info,
                ..MockTable::default()
            },
        );
    }

    /// Add a partition to an existing table; returns false if the table is unknown
    pub fn add_partition(&self, info: PartitionInfo) -> bool {
        self.with_table(&info.db_name.clone(), &info.table_name.clone(), |table| {
            table.partitions.push(info)
        })
    }

    pub fn set_table_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        statistics: Vec<ColumnStatisticsInfo>,
    ) -> bool {
        self.with_table(db_name, table_name, |table| table.column_statistics = statistics)
    }

    pub fn set_partition_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        partition_name: &str,
        statistics: Vec<ColumnStatisticsInfo>,
    ) -> bool {
        self.with_table(db_name, table_name, |table| {
            table
                .partition_column_statistics
                .insert(partition_name.to_string(), statistics);
        })
    }

    fn with_table(&self, db_name: &str, table_name: &str, f: impl FnOnce(&mut MockTable)) -> bool {
        let mut databases = self.databases.write();
        match databases
            .get_mut(&key(db_name))
            .and_then(|db| db.tables.get_mut(&key(table_name)))
        {
            Some(table) => {
                f(table);
                true
            }
            None => false,
        }
    }

    /// Fail the next `count` calls with `error`
    pub fn inject_failures(&self, count: usize, error: TransportError) {
        let mut failures = self.failures.lock();
        for _ in 0..count {
            failures.push_back(error.clone());
        }
    }

    /// Calls made to `method`, failed ones included
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.get(method).map(|count| *count).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    fn record(&self, method: &'static str) -> TransportResult<()> {
        *self.calls.entry(method).or_insert(0) += 1;
        match self.failures.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn read_table_state<T>(
        &self,
        db_name: &str,
        table_name: &str,
        f: impl FnOnce(&MockTable) -> T,
    ) -> TransportResult<T> {
        let databases = self.databases.read();
        databases
            .get(&key(db_name))
            .and_then(|db| db.tables.get(&key(table_name)))
            .map(f)
            .ok_or_else(|| TransportError::NotFound(format!("table {}.{}", db_name, table_name)))
    }
}

impl TableMasterTransport for MockTableMaster {
    fn address(&self) -> &str {
        &self.address
    }

    fn get_all_databases(&self) -> TransportResult<Vec<String>> {
        self.record("get_all_databases")?;
        Ok(self
            .databases
            .read()
            .values()
            .map(|db| db.info.db_name.clone())
            .collect())
    }

    fn get_database(&self, db_name: &str) -> TransportResult<DatabaseInfo> {
        self.record("get_database")?;
        self.databases
            .read()
            .get(&key(db_name))
            .map(|db| db.info.clone())
            .ok_or_else(|| TransportError::NotFound(format!("database {}", db_name)))
    }

    fn get_all_tables(&self, db_name: &str) -> TransportResult<Vec<String>> {
        self.record("get_all_tables")?;
        self.databases
            .read()
            .get(&key(db_name))
            .map(|db| db.tables.values().map(|t| t.info.table_name.clone()).collect())
            .ok_or_else(|| TransportError::NotFound(format!("database {}", db_name)))
    }

    fn get_table(&self, db_name: &str, table_name: &str) -> TransportResult<TableInfo> {
        self.record("get_table")?;
        self.read_table_state(db_name, table_name, |table| table.info.clone())
    }

    fn read_table(&self, db_name: &str, table_name: &str) -> TransportResult<Vec<PartitionInfo>> {
        self.record("read_table")?;
        self.read_table_state(db_name, table_name, |table| table.partitions.clone())
    }

    fn get_table_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        columns: &[String],
    ) -> TransportResult<Vec<ColumnStatisticsInfo>> {
        self.record("get_table_column_statistics")?;
        self.read_table_state(db_name, table_name, |table| {
            table
                .column_statistics
                .iter()
                .filter(|s| columns.iter().any(|c| c.eq_ignore_ascii_case(&s.col_name)))
                .cloned()
                .collect()
        })
    }

    fn get_partition_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        partition_names: &[String],
        columns: &[String],
    ) -> TransportResult<HashMap<String, Vec<ColumnStatisticsInfo>>> {
        self.record("get_partition_column_statistics")?;
        self.read_table_state(db_name, table_name, |table| {
            partition_names
                .iter()
                .filter_map(|name| {
                    table.partition_column_statistics.get(name).map(|stats| {
                        let selected = stats
                            .iter()
                            .filter(|s| columns.iter().any(|c| c.eq_ignore_ascii_case(&s.col_name)))
                            .cloned()
                            .collect();
                        (name.clone(), selected)
                    })
                })
                .collect()
        })
    }
}
