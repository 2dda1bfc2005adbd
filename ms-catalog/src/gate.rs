// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Capability gate
//!
//! [`GatedMetastore`] wraps any backend and checks every write against the
//! effective [`CapabilityDescriptor`] before the call reaches the backend.
//! A denied write fails with `UnsupportedOperation` and never touches the
//! backend. Reads pass straight through.

use crate::column::Column;
use crate::database::Database;
use crate::metastore::{Metastore, StatisticsUpdate};
use crate::partition::{Partition, PartitionFilter};
use crate::statistics::PartitionStatistics;
use crate::table::Table;
use ms_common::{CapabilityDescriptor, MetastoreError, Result, WriteOperation};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct GatedMetastore {
    inner: Arc<dyn Metastore>,

    /// Fixed at construction
    capabilities: CapabilityDescriptor,
}

impl GatedMetastore {
    /// Gate `inner` with its own declared capabilities
    pub fn new(inner: Arc<dyn Metastore>) -> Self {
        let capabilities = inner.capabilities();
        Self { inner, capabilities }
    }

    /// Gate `inner` with its declared capabilities narrowed by `limit`
    pub fn with_limit(inner: Arc<dyn Metastore>, limit: CapabilityDescriptor) -> Self {
        let capabilities = inner.capabilities().intersect(&limit);
        Self { inner, capabilities }
    }

    pub fn inner(&self) -> &Arc<dyn Metastore> {
        &self.inner
    }

    /// Permit or deny `operation`
    pub fn check(&self, operation: WriteOperation) -> Result<()> {
        if self.capabilities.permits(operation) {
            debug!(backend = self.inner.backend_name(), %operation, "write operation permitted");
            return Ok(());
        }
        let error = MetastoreError::unsupported(operation);
        warn!(
            backend = self.inner.backend_name(),
            %operation,
            category = %operation.category(),
            "write operation rejected: {}",
            error
        );
        Err(error)
    }
}

impl Metastore for GatedMetastore {
    fn backend_name(&self) -> &str {
        self.inner.backend_name()
    }

    fn capabilities(&self) -> CapabilityDescriptor {
        self.capabilities
    }

    fn get_all_databases(&self) -> Result<Vec<String>> {
        self.inner.get_all_databases()
    }

    fn get_database(&self, name: &str) -> Result<Option<Database>> {
        self.inner.get_database(name)
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        self.inner.list_tables(database)
    }

    fn get_all_views(&self, database: &str) -> Result<Vec<String>> {
        self.inner.get_all_views(database)
    }

    fn get_table(&self, database: &str, table: &str) -> Result<Option<Table>> {
        self.inner.get_table(database, table)
    }

    fn get_partition_names(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<Vec<String>> {
        self.inner.get_partition_names(database, table, filter)
    }

    fn get_partitions_by_names(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<Vec<(String, Option<Partition>)>> {
        self.inner.get_partitions_by_names(database, table, partition_names)
    }

    fn get_table_statistics(&self, database: &str, table: &str) -> Result<PartitionStatistics> {
        self.inner.get_table_statistics(database, table)
    }

    fn get_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<HashMap<String, PartitionStatistics>> {
        self.inner.get_partition_statistics(database, table, partition_names)
    }

    fn create_database(&self, database: &Database) -> Result<()> {
        self.check(WriteOperation::CreateDatabase)?;
        self.inner.create_database(database)
    }

    fn drop_database(&self, name: &str) -> Result<()> {
        self.check(WriteOperation::DropDatabase)?;
        self.inner.drop_database(name)
    }

    fn rename_database(&self, name: &str, new_name: &str) -> Result<()> {
        self.check(WriteOperation::RenameDatabase)?;
        self.inner.rename_database(name, new_name)
    }

    fn create_table(&self, table: &Table) -> Result<()> {
        self.check(WriteOperation::CreateTable)?;
        self.inner.create_table(table)
    }

    fn drop_table(&self, database: &str, table: &str) -> Result<()> {
        self.check(WriteOperation::DropTable)?;
        self.inner.drop_table(database, table)
    }

    fn alter_table(&self, database: &str, table: &str, new_table: &Table) -> Result<()> {
        self.check(WriteOperation::AlterTable)?;
        self.inner.alter_table(database, table, new_table)
    }

    fn rename_table(&self, database: &str, table: &str, new_database: &str, new_table: &str) -> Result<()> {
        self.check(WriteOperation::RenameTable)?;
        self.inner.rename_table(database, table, new_database, new_table)
    }

    fn comment_table(&self, database: &str, table: &str, comment: Option<&str>) -> Result<()> {
        self.check(WriteOperation::CommentTable)?;
        self.inner.comment_table(database, table, comment)
    }

    fn add_column(&self, database: &str, table: &str, column: &Column) -> Result<()> {
        self.check(WriteOperation::AddColumn)?;
        self.inner.add_column(database, table, column)
    }

    fn rename_column(&self, database: &str, table: &str, old_name: &str, new_name: &str) -> Result<()> {
        self.check(WriteOperation::RenameColumn)?;
        self.inner.rename_column(database, table, old_name, new_name)
    }

    fn drop_column(&self, database: &str, table: &str, column: &str) -> Result<()> {
        self.check(WriteOperation::DropColumn)?;
        self.inner.drop_column(database, table, column)
    }

    fn add_partitions(&self, database: &str, table: &str, partitions: &[Partition]) -> Result<()> {
        self.check(WriteOperation::AddPartitions)?;
        self.inner.add_partitions(database, table, partitions)
    }

    fn drop_partition(&self, database: &str, table: &str, values: &[String]) -> Result<()> {
        self.check(WriteOperation::DropPartition)?;
        self.inner.drop_partition(database, table, values)
    }

    fn alter_partition(&self, database: &str, table: &str, partition: &Partition) -> Result<()> {
        self.check(WriteOperation::AlterPartition)?;
        self.inner.alter_partition(database, table, partition)
    }

    fn update_table_statistics(&self, database: &str, table: &str, update: &StatisticsUpdate) -> Result<()> {
        self.check(WriteOperation::UpdateTableStatistics)?;
        self.inner.update_table_statistics(database, table, update)
    }

    fn update_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_name: &str,
        update: &StatisticsUpdate,
    ) -> Result<()> {
        self.check(WriteOperation::UpdatePartitionStatistics)?;
        self.inner.update_partition_statistics(database, table, partition_name, update)
    }
}
