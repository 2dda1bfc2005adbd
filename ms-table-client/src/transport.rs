// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Transport seam to the table-master service
//!
//! The wire protocol belongs to the service and stays behind this trait. A
//! transport is shared by every caller of one master address, so every method
//! takes `&self` and must tolerate concurrent invocation.

use crate::proto::{ColumnStatisticsInfo, DatabaseInfo, PartitionInfo, TableInfo};
use ms_common::MetastoreError;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered that the entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The service could not be reached or timed out
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that cannot be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl From<TransportError> for MetastoreError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound(what) => MetastoreError::NotFound(what),
            TransportError::Unavailable(reason) => MetastoreError::TransientCatalog(reason),
            TransportError::Malformed(reason) => MetastoreError::CatalogProtocol(reason),
        }
    }
}

pub trait TableMasterTransport: Send + Sync {
    /// Master address this transport is bound to
    fn address(&self) -> &str;

    fn get_all_databases(&self) -> TransportResult<Vec<String>>;

    fn get_database(&self, db_name: &str) -> TransportResult<DatabaseInfo>;

    fn get_all_tables(&self, db_name: &str) -> TransportResult<Vec<String>>;

    fn get_table(&self, db_name: &str, table_name: &str) -> TransportResult<TableInfo>;

    /// All partitions of a table; an unpartitioned table reports none
    fn read_table(&self, db_name: &str, table_name: &str) -> TransportResult<Vec<PartitionInfo>>;

    fn get_table_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        columns: &[String],
    ) -> TransportResult<Vec<ColumnStatisticsInfo>>;

    /// Column statistics keyed by partition name
    fn get_partition_column_statistics(
        &self,
        db_name: &str,
        table_name: &str,
        partition_names: &[String],
        columns: &[String],
    ) -> TransportResult<HashMap<String, Vec<ColumnStatisticsInfo>>>;
}
