// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Unified metastore interface
//!
//! Query engine components depend only on [`Metastore`]. Read operations
//! report a missing entity as an empty result; writes fail with
//! `UnsupportedOperation` unless a backend overrides them, so a backend only
//! implements the writes it actually supports.

use crate::column::Column;
use crate::database::Database;
use crate::partition::{Partition, PartitionFilter};
use crate::statistics::PartitionStatistics;
use crate::table::Table;
use ms_common::{CapabilityDescriptor, MetastoreError, Result, WriteOperation};
use std::collections::HashMap;

/// Read-modify-write step applied to existing statistics
pub type StatisticsUpdate = dyn Fn(PartitionStatistics) -> PartitionStatistics + Send + Sync;

pub trait Metastore: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &str;

    /// Write categories this backend supports
    fn capabilities(&self) -> CapabilityDescriptor {
        CapabilityDescriptor::read_only()
    }

    fn get_all_databases(&self) -> Result<Vec<String>>;

    fn get_database(&self, name: &str) -> Result<Option<Database>>;

    /// Tables and views of `database`; fails with `NoSuchDatabase` if absent
    fn list_tables(&self, database: &str) -> Result<Vec<String>>;

    /// Views of `database`; fails with `NoSuchDatabase` if absent
    fn get_all_views(&self, database: &str) -> Result<Vec<String>>;

    fn get_table(&self, database: &str, table: &str) -> Result<Option<Table>>;

    /// Hive names of the partitions matching `filter`, in a stable order
    ///
    /// A missing table yields an empty list.
    fn get_partition_names(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<Vec<String>>;

    /// Partitions by Hive name, in request order; unknown names map to `None`
    fn get_partitions_by_names(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<Vec<(String, Option<Partition>)>>;

    /// Fails with `NotFound` if the table is absent
    fn get_table_statistics(&self, database: &str, table: &str) -> Result<PartitionStatistics>;

    fn get_partition_statistics(
        &self,
        database: &str,
        table: &str,
        partition_names: &[String],
    ) -> Result<HashMap<String, PartitionStatistics>>;

    fn create_database(&self, _database: &Database) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::CreateDatabase))
    }

    fn drop_database(&self, _name: &str) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::DropDatabase))
    }

    fn rename_database(&self, _name: &str, _new_name: &str) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::RenameDatabase))
    }

    fn create_table(&self, _table: &Table) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::CreateTable))
    }

    fn drop_table(&self, _database: &str, _table: &str) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::DropTable))
    }

    /// Replace the definition of an existing table
    fn alter_table(&self, _database: &str, _table: &str, _new_table: &Table) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::AlterTable))
    }

    fn rename_table(
        &self,
        _database: &str,
        _table: &str,
        _new_database: &str,
        _new_table: &str,
    ) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::RenameTable))
    }

    fn comment_table(&self, _database: &str, _table: &str, _comment: Option<&str>) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::CommentTable))
    }

    fn add_column(&self, _database: &str, _table: &str, _column: &Column) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::AddColumn))
    }

    fn rename_column(&self, _database: &str, _table: &str, _old_name: &str, _new_name: &str) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::RenameColumn))
    }

    fn drop_column(&self, _database: &str, _table: &str, _column: &str) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::DropColumn))
    }

    fn add_partitions(&self, _database: &str, _table: &str, _partitions: &[Partition]) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::AddPartitions))
    }

    fn drop_partition(&self, _database: &str, _table: &str, _values: &[String]) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::DropPartition))
    }

    fn alter_partition(&self, _database: &str, _table: &str, _partition: &Partition) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::AlterPartition))
    }

    fn update_table_statistics(&self, _database: &str, _table: &str, _update: &StatisticsUpdate) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::UpdateTableStatistics))
    }

    fn update_partition_statistics(
        &self,
        _database: &str,
        _table: &str,
        _partition_name: &str,
        _update: &StatisticsUpdate,
    ) -> Result<()> {
        Err(MetastoreError::unsupported(WriteOperation::UpdatePartitionStatistics))
    }
}
