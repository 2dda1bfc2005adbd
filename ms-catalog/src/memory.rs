// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! In-memory metastore backend with full read/write support

use crate::column::Column;
use crate::database::Database;
use crate::metastore::{Metastore, StatisticsUpdate};
use crate::partition::{make_partition_name, Partition, PartitionFilter};
use crate::statistics::{BasicStatistics, PartitionStatistics};
use crate::table::{Table, TableName};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ms_common::constants::{MAX_DATABASE_NAME_LENGTH, MAX_TABLE_NAME_LENGTH, TABLE_COMMENT};
use ms_common::utils::normalize_name;
use ms_common::{CapabilityDescriptor, MetastoreError, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

struct PartitionEntry {
    partition: Partition,
    statistics: PartitionStatistics,
}

struct TableEntry {
    table: Table,
    statistics: PartitionStatistics,

    /// Partition name -> partition
    partitions: BTreeMap<String, PartitionEntry>,
}

impl TableEntry {
    fn rename(&mut self, new_name: &TableName) {
        self.table.database_name = new_name.database.clone();
        self.table.table_name = new_name.table.clone();
        for entry in self.partitions.values_mut() {
            entry.partition.database_name = new_name.database.clone();
            entry.partition.table_name = new_name.table.clone();
        }
    }
}

/// Metastore - the root of all in-memory metadata
pub struct InMemoryMetastore {
    /// Declared capabilities
    capabilities: CapabilityDescriptor,

    /// Databases (db_name -> database)
    databases: DashMap<String, Database>,

    /// Tables (db.table -> table state)
    tables: DashMap<TableName, Arc<RwLock<TableEntry>>>,

    /// Held by every operation that adds, removes or renames a database or table
    ddl_lock: Mutex<()>,
}

impl InMemoryMetastore {
    pub fn new() -> Self {
        Self::with_capabilities(CapabilityDescriptor::full())
    }

    pub fn with_capabilities(capabilities: CapabilityDescriptor) -> Self {
        Self {
            capabilities,
            databases: DashMap::new(),
            tables: DashMap::new(),
            ddl_lock: Mutex::new(()),
        }
    }

    fn require_database(&self, name: &str) -> Result<()> {
        if self.databases.contains_key(name) {
            Ok(())
        } else {
            Err(MetastoreError::NoSuchDatabase(name.to_string()))
        }
    }

    fn find_table(&self, name: &TableName) -> Option<Arc<RwLock<TableEntry>>> {
        self.tables.get(name).map(|entry| entry.value().clone())
    }

    fn table_entry(&self, database: &str, table: &str) -> Result<Arc<RwLock<TableEntry>>> {
        let name = TableName::new(database, table);
        self.find_table(&name)
            .ok_or_else(|| MetastoreError::NotFound(format!("Table {} not found", name)))
    }

    fn table_names_in(&self, database: &str) -> Vec<TableName> {
        self.tables
            .iter()
            .filter(|entry| entry.key().database == database)
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn check_name_length(kind: &str, name: &str, max: usize) -> Result<()> {
        if name.is_empty() || name.len() > max {
            return Err(MetastoreError::InvalidArgument(format!(
                "Invalid {} name '{}': length must be between 1 and {}",
                kind, name, max
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryMetastore {
    fn default() -> Self {
        Self::new()
    }
}

impl Metastore for InMemoryMetastore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    fn capabilities(&self) -> CapabilityDescriptor {
        self.capabilities
    }

    fn get_all_databases(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.databases.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn get_database(&self, name: &str) -> Result<Option<Database>> {
        Ok(self
            .databases
            .get(&normalize_name(name))
            .map(|entry| entry.value().clone()))
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let database = normalize_name(database);
        self.require_database(&database)?;
        let mut names: Vec<String> = self
            .table_names_in(&database)
            .into_iter()
            .map(|name| name.table)
            .collect();
        names.sort();
        Ok(names)
    }

    fn get_all_views(&self, database: &str) -> Result<Vec<String>> {
        let database = normalize_name(database);
        self.require_database(&database)?;
        let mut names: Vec<String> = self
            .tables
            .iter()
            .filter(|entry| entry.key().database == database && entry.value().read().table.is_view())
            .map(|entry| entry.key().table.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn get_table(&self, database: &str, table: &str) -> Result<Option<Table>> {
        Ok(self
            .find_table(&TableName::new(database, table))
            .map(|entry| entry.read().table.clone()))
    }

    fn get_partition_names(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<Vec<String>> {
        let Some(entry) = self.find_table(&TableName::new(database, table)) else {
            return Ok(Vec::new());
        };
        let guard = entry.read();
        if let Some(filter) = filter {
            filter.validate_for(&guard.table)?;
        }
        Ok(guard
            .partitions
            .iter()
            .filter(|(_, p)| filter.map_or(true, |f| f.matches(&p.partition.values)))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn get_partitions_by_names(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<Vec<(String, Option<Partition>)>> {
        let entry = self.find_table(&TableName::new(database, table));
        let guard = entry.as_ref().map(|e| e.read());
        Ok(partition_names
            .iter()
            .map(|name| {
                let partition = guard
                    .as_ref()
                    .and_then(|g| g.partitions.get(name))
                    .map(|p| p.partition.clone());
                (name.clone(), partition)
            })
            .collect())
    }

    fn get_table_statistics(&self, database: &str, table: &str) -> Result<PartitionStatistics> {
        let entry = self.table_entry(database, table)?;
        let statistics = entry.read().statistics.clone();
        Ok(statistics)
    }

    fn get_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<HashMap<String, PartitionStatistics>> {
        let entry = self.table_entry(database, table)?;
        let guard = entry.read();
        Ok(partition_names
            .iter()
            .filter_map(|name| {
                guard
                    .partitions
                    .get(name)
                    .map(|p| (name.clone(), p.statistics.clone()))
            })
            .collect())
    }

    fn create_database(&self, database: &Database) -> Result<()> {
        let name = normalize_name(&database.name);
        Self::check_name_length("database", &name, MAX_DATABASE_NAME_LENGTH)?;

        let _ddl = self.ddl_lock.lock();
        match self.databases.entry(name.clone()) {
            Entry::Occupied(_) => Err(MetastoreError::AlreadyExists(format!(
                "Database {} already exists",
                name
            ))),
            Entry::Vacant(vacant) => {
                let mut database = database.clone();
                database.name = name.clone();
                vacant.insert(database);
                info!("Created database '{}'", name);
                Ok(())
            }
        }
    }

    fn drop_database(&self, name: &str) -> Result<()> {
        let name = normalize_name(name);
        let _ddl = self.ddl_lock.lock();
        if !self.databases.contains_key(&name) {
            return Err(MetastoreError::NotFound(format!("Database {} not found", name)));
        }
        if !self.table_names_in(&name).is_empty() {
            return Err(MetastoreError::InvalidArgument(format!(
                "Database {} is not empty",
                name
            )));
        }
        self.databases.remove(&name);
        info!("Dropped database '{}'", name);
        Ok(())
    }

    fn rename_database(&self, name: &str, new_name: &str) -> Result<()> {
        let name = normalize_name(name);
        let new_name = normalize_name(new_name);
        Self::check_name_length("database", &new_name, MAX_DATABASE_NAME_LENGTH)?;
        let _ddl = self.ddl_lock.lock();
        if self.databases.contains_key(&new_name) {
            return Err(MetastoreError::AlreadyExists(format!(
                "Database {} already exists",
                new_name
            )));
        }
        let (_, mut database) = self
            .databases
            .remove(&name)
            .ok_or_else(|| MetastoreError::NotFound(format!("Database {} not found", name)))?;
        database.name = new_name.clone();
        self.databases.insert(new_name.clone(), database);

        for old in self.table_names_in(&name) {
            if let Some((_, entry)) = self.tables.remove(&old) {
                let renamed = TableName::new(&new_name, &old.table);
                entry.write().rename(&renamed);
                self.tables.insert(renamed, entry);
            }
        }
        info!("Renamed database '{}' to '{}'", name, new_name);
        Ok(())
    }

    fn create_table(&self, table: &Table) -> Result<()> {
        let mut table = table.clone();
        table.database_name = normalize_name(&table.database_name);
        table.table_name = normalize_name(&table.table_name);
        table.validate()?;
        Self::check_name_length("table", &table.table_name, MAX_TABLE_NAME_LENGTH)?;
        let _ddl = self.ddl_lock.lock();
        self.require_database(&table.database_name)?;

        let name = table.name();
        match self.tables.entry(name.clone()) {
            Entry::Occupied(_) => Err(MetastoreError::AlreadyExists(format!(
                "Table {} already exists",
                name
            ))),
            Entry::Vacant(vacant) => {
                let statistics = PartitionStatistics::new(
                    BasicStatistics::from_parameters(&table.parameters),
                    HashMap::new(),
                );
                vacant.insert(Arc::new(RwLock::new(TableEntry {
                    table,
                    statistics,
                    partitions: BTreeMap::new(),
                })));
                info!("Created table '{}'", name);
                Ok(())
            }
        }
    }

    fn drop_table(&self, database: &str, table: &str) -> Result<()> {
        let name = TableName::new(database, table);
        let _ddl = self.ddl_lock.lock();
        self.tables
            .remove(&name)
            .ok_or_else(|| MetastoreError::NotFound(format!("Table {} not found", name)))?;
        info!("Dropped table '{}'", name);
        Ok(())
    }

    fn alter_table(&self, database: &str, table: &str, new_table: &Table) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();

        let mut new_table = new_table.clone();
        new_table.database_name = normalize_name(&new_table.database_name);
        new_table.table_name = normalize_name(&new_table.table_name);
        new_table.validate()?;
        if new_table.name() != guard.table.name() {
            return Err(MetastoreError::InvalidArgument(format!(
                "Cannot replace table {} with a definition named {}",
                guard.table.name(),
                new_table.name()
            )));
        }
        if !guard.partitions.is_empty()
            && new_table.partition_columns.len() != guard.table.partition_columns.len()
        {
            return Err(MetastoreError::InvalidArgument(format!(
                "Cannot change partition keys of table {} with existing partitions",
                new_table.name()
            )));
        }
        guard.table = new_table;
        Ok(())
    }

    fn rename_table(&self, database: &str, table: &str, new_database: &str, new_table: &str) -> Result<()> {
        let old = TableName::new(database, table);
        let renamed = TableName::new(new_database, new_table);
        Self::check_name_length("table", &renamed.table, MAX_TABLE_NAME_LENGTH)?;
        let _ddl = self.ddl_lock.lock();
        self.require_database(&renamed.database)?;
        if self.tables.contains_key(&renamed) {
            return Err(MetastoreError::AlreadyExists(format!(
                "Table {} already exists",
                renamed
            )));
        }
        let (_, entry) = self
            .tables
            .remove(&old)
            .ok_or_else(|| MetastoreError::NotFound(format!("Table {} not found", old)))?;
        entry.write().rename(&renamed);
        self.tables.insert(renamed.clone(), entry);
        info!("Renamed table '{}' to '{}'", old, renamed);
        Ok(())
    }

    fn comment_table(&self, database: &str, table: &str, comment: Option<&str>) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        match comment {
            Some(comment) => {
                guard.table.parameters.insert(TABLE_COMMENT.to_string(), comment.to_string());
            }
            None => {
                guard.table.parameters.remove(TABLE_COMMENT);
            }
        }
        Ok(())
    }

    fn add_column(&self, database: &str, table: &str, column: &Column) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        if guard.table.column(&column.name).is_some() {
            return Err(MetastoreError::AlreadyExists(format!(
                "Column {} already exists in table {}",
                column.name,
                guard.table.name()
            )));
        }
        guard.table.data_columns.push(column.clone());
        Ok(())
    }

    fn rename_column(&self, database: &str, table: &str, old_name: &str, new_name: &str) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        if guard
            .table
            .partition_columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(old_name))
        {
            return Err(MetastoreError::NotSupported(format!(
                "Renaming partition column {} of table {}",
                old_name, table_name
            )));
        }
        if !old_name.eq_ignore_ascii_case(new_name) && guard.table.column(new_name).is_some() {
            return Err(MetastoreError::AlreadyExists(format!(
                "Column {} already exists in table {}",
                new_name, table_name
            )));
        }
        let column = guard
            .table
            .data_columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(old_name))
            .ok_or_else(|| {
                MetastoreError::NotFound(format!("Column {} not found in table {}", old_name, table_name))
            })?;
        column.name = new_name.to_string();
        Ok(())
    }

    fn drop_column(&self, database: &str, table: &str, column: &str) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        let position = guard
            .table
            .data_columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(column))
            .ok_or_else(|| {
                MetastoreError::NotFound(format!("Column {} not found in table {}", column, table_name))
            })?;
        if guard.table.data_columns.len() == 1 {
            return Err(MetastoreError::InvalidArgument(format!(
                "Cannot drop the only data column of table {}",
                table_name
            )));
        }
        guard.table.data_columns.remove(position);
        Ok(())
    }

    fn add_partitions(&self, database: &str, table: &str, partitions: &[Partition]) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        let keys = guard.table.partition_column_names();

        // Validate the whole batch before touching any state
        let mut batch = Vec::with_capacity(partitions.len());
        let mut names = HashSet::new();
        for partition in partitions {
            if partition.values.len() != keys.len() {
                return Err(MetastoreError::InvalidArgument(format!(
                    "Partition of {} has {} values but the table has {} partition keys",
                    table_name,
                    partition.values.len(),
                    keys.len()
                )));
            }
            let name = make_partition_name(&keys, &partition.values)?;
            if guard.partitions.contains_key(&name) || !names.insert(name.clone()) {
                return Err(MetastoreError::AlreadyExists(format!(
                    "Partition {} already exists in table {}",
                    name, table_name
                )));
            }
            let mut partition = partition.clone();
            partition.database_name = table_name.database.clone();
            partition.table_name = table_name.table.clone();
            batch.push((name, partition));
        }

        for (name, partition) in batch {
            let statistics = PartitionStatistics::new(
                BasicStatistics::from_parameters(&partition.parameters),
                HashMap::new(),
            );
            guard.partitions.insert(name, PartitionEntry { partition, statistics });
        }
        Ok(())
    }

    fn drop_partition(&self, database: &str, table: &str, values: &[String]) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        let name = make_partition_name(&guard.table.partition_column_names(), values)?;
        if guard.partitions.remove(&name).is_none() {
            return Err(MetastoreError::NotFound(format!(
                "Partition {} not found in table {}",
                name, table_name
            )));
        }
        Ok(())
    }

    fn alter_partition(&self, database: &str, table: &str, partition: &Partition) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        let name = make_partition_name(&guard.table.partition_column_names(), &partition.values)?;
        let existing = guard.partitions.get_mut(&name).ok_or_else(|| {
            MetastoreError::NotFound(format!("Partition {} not found in table {}", name, table_name))
        })?;
        let mut partition = partition.clone();
        partition.database_name = table_name.database;
        partition.table_name = table_name.table;
        existing.partition = partition;
        Ok(())
    }

    fn update_table_statistics(&self, database: &str, table: &str, update: &StatisticsUpdate) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let updated = update(guard.statistics.clone());
        updated.basic.apply_to_parameters(&mut guard.table.parameters);
        guard.statistics = updated;
        Ok(())
    }

    fn update_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_name: &str,
        update: &StatisticsUpdate,
    ) -> Result<()> {
        let entry = self.table_entry(database, table)?;
        let mut guard = entry.write();
        let table_name = guard.table.name();
        let existing = guard.partitions.get_mut(partition_name).ok_or_else(|| {
            MetastoreError::NotFound(format!(
                "Partition {} not found in table {}",
                partition_name, table_name
            ))
        })?;
        let updated = update(existing.statistics.clone());
        updated.basic.apply_to_parameters(&mut existing.partition.parameters);
        existing.statistics = updated;
        Ok(())
    }
}
