// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Read-only metastore over a remote table master
//!
//! Remote "not found" answers become empty results on reads and `NotFound`
//! where the entity must exist. Unreachable masters surface as
//! `TransientCatalog`; undecodable answers as `CatalogProtocol`. Calls are
//! attempted once unless the caller opts into retry.

use crate::convert::{to_database, to_partition, to_partition_statistics, to_table};
use crate::registry::{ClientRegistry, TransportFactory};
use crate::retry::with_retry;
use crate::transport::{TableMasterTransport, TransportError, TransportResult};
use ms_catalog::partition::make_partition_name;
use ms_catalog::{Database, Metastore, Partition, PartitionFilter, PartitionStatistics, Table};
use ms_common::utils::normalize_name;
use ms_common::{Config, MetastoreError, Result, RetryConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct RemoteMetastore {
    client: Arc<dyn TableMasterTransport>,
    retry: Option<RetryConfig>,
}

impl RemoteMetastore {
    pub fn new(client: Arc<dyn TableMasterTransport>) -> Self {
        Self { client, retry: None }
    }

    /// Adapter over the process-wide client for `config.master_address`
    pub fn connect(config: &Config, factory: &dyn TransportFactory) -> Result<Self> {
        let client = ClientRegistry::global().get_or_connect(
            &config.master_address,
            config.security_principal.as_deref(),
            factory,
        )?;
        Ok(Self::new(client))
    }

    /// Retry transient failures under `retry`
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn client(&self) -> &Arc<dyn TableMasterTransport> {
        &self.client
    }

    fn call<T>(&self, operation: &str, mut f: impl FnMut() -> TransportResult<T>) -> Result<T> {
        debug!(address = self.client.address(), operation, "table master call");
        with_retry(self.retry.as_ref(), operation, || f().map_err(MetastoreError::from))
    }

    /// Like `call`, with a remote "not found" as `None`
    fn call_optional<T>(
        &self,
        operation: &str,
        mut f: impl FnMut() -> TransportResult<T>,
    ) -> Result<Option<T>> {
        self.call(operation, || match f() {
            Ok(value) => Ok(Some(value)),
            Err(TransportError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        })
    }

    fn load_table(&self, database: &str, table: &str) -> Result<Option<Table>> {
        self.call_optional("getTable", || self.client.get_table(database, table))?
            .map(to_table)
            .transpose()
    }

    fn require_table(&self, database: &str, table: &str) -> Result<Table> {
        self.load_table(database, table)?
            .ok_or_else(|| MetastoreError::NotFound(format!("Table {}.{} not found", database, table)))
    }

    /// Named partitions of `table`, in the order the master reports them
    fn load_partitions(&self, table: &Table) -> Result<Vec<(String, Partition)>> {
        let infos = self
            .call_optional("readTable", || {
                self.client.read_table(&table.database_name, &table.table_name)
            })?
            .unwrap_or_default();
        let keys = table.partition_column_names();
        infos
            .into_iter()
            .map(|info| {
                let partition = to_partition(table, info)?;
                let name = make_partition_name(&keys, &partition.values)?;
                Ok((name, partition))
            })
            .collect()
    }

    fn require_database(&self, database: &str) -> Result<()> {
        match self.get_database(database)? {
            Some(_) => Ok(()),
            None => Err(MetastoreError::NoSuchDatabase(database.to_string())),
        }
    }
}

impl Metastore for RemoteMetastore {
    fn backend_name(&self) -> &str {
        "table-master"
    }

    fn get_all_databases(&self) -> Result<Vec<String>> {
        let names = self.call("getAllDatabases", || self.client.get_all_databases())?;
        Ok(names.iter().map(|name| normalize_name(name)).collect())
    }

    fn get_database(&self, name: &str) -> Result<Option<Database>> {
        let name = normalize_name(name);
        self.call_optional("getDatabase", || self.client.get_database(&name))?
            .map(to_database)
            .transpose()
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let database = normalize_name(database);
        let names = self
            .call_optional("getAllTables", || self.client.get_all_tables(&database))?
            .ok_or_else(|| MetastoreError::NoSuchDatabase(database.clone()))?;
        Ok(names.iter().map(|name| normalize_name(name)).collect())
    }

    /// The table master does not model views
    fn get_all_views(&self, database: &str) -> Result<Vec<String>> {
        self.require_database(&normalize_name(database))?;
        Ok(Vec::new())
    }

    fn get_table(&self, database: &str, table: &str) -> Result<Option<Table>> {
        self.load_table(&normalize_name(database), &normalize_name(table))
    }

    fn get_partition_names(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<Vec<String>> {
        let Some(table) = self.get_table(database, table)? else {
            return Ok(Vec::new());
        };
        if let Some(filter) = filter {
            filter.validate_for(&table)?;
        }
        Ok(self
            .load_partitions(&table)?
            .into_iter()
            .filter(|(_, partition)| filter.map_or(true, |f| f.matches(&partition.values)))
            .map(|(name, _)| name)
            .collect())
    }

    fn get_partitions_by_names(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<Vec<(String, Option<Partition>)>> {
        let partitions: HashMap<String, Partition> = match self.get_table(database, table)? {
            Some(table) => self.load_partitions(&table)?.into_iter().collect(),
            None => HashMap::new(),
        };
        Ok(partition_names
            .iter()
            .map(|name| (name.clone(), partitions.get(name).cloned()))
            .collect())
    }

    fn get_table_statistics(&self, database: &str, table: &str) -> Result<PartitionStatistics> {
        let table = self.require_table(&normalize_name(database), &normalize_name(table))?;
        let columns: Vec<String> = table.data_columns.iter().map(|c| c.name.clone()).collect();
        let column_statistics = self
            .call_optional("getTableColumnStatistics", || {
                self.client
                    .get_table_column_statistics(&table.database_name, &table.table_name, &columns)
            })?
            .unwrap_or_default();
        Ok(to_partition_statistics(&table.parameters, &column_statistics))
    }

    fn get_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<HashMap<String, PartitionStatistics>> {
        let table = self.require_table(&normalize_name(database), &normalize_name(table))?;
        let partitions: Vec<(String, Partition)> = self
            .load_partitions(&table)?
            .into_iter()
            .filter(|(name, _)| partition_names.contains(name))
            .collect();
        if partitions.is_empty() {
            return Ok(HashMap::new());
        }

        let names: Vec<String> = partitions.iter().map(|(name, _)| name.clone()).collect();
        let columns: Vec<String> = table.data_columns.iter().map(|c| c.name.clone()).collect();
        let mut column_statistics = self
            .call_optional("getPartitionColumnStatistics", || {
                self.client.get_partition_column_statistics(
                    &table.database_name,
                    &table.table_name,
                    &names,
                    &columns,
                )
            })?
            .unwrap_or_default();

        Ok(partitions
            .into_iter()
            .map(|(name, partition)| {
                let columns = column_statistics.remove(&name).unwrap_or_default();
                let statistics = to_partition_statistics(&partition.parameters, &columns);
                (name, statistics)
            })
            .collect())
    }
}
