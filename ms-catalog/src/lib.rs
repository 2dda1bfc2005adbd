// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Catalog module for resolving metastore metadata
//!
//! This module handles:
//! - Database, table, column and partition definitions
//! - Hive partition naming
//! - Table and partition statistics
//! - The unified `Metastore` interface every backend implements
//! - The capability gate in front of write operations
//! - An in-memory read/write backend

pub mod database;
pub mod column;
pub mod table;
pub mod partition;
pub mod statistics;
pub mod metastore;
pub mod gate;
pub mod memory;

pub use database::{Database, PrincipalType};
pub use column::Column;
pub use table::{Storage, StorageFormat, Table, TableKind, TableName, ViewDefinition};
pub use partition::{Partition, PartitionFilter};
pub use statistics::{BasicStatistics, ColumnStatistics, PartitionStatistics, StatisticValue};
pub use metastore::{Metastore, StatisticsUpdate};
pub use gate::GatedMetastore;
pub use memory::InMemoryMetastore;
