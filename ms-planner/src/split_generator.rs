// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Split generation for metastore tables
//!
//! For a table and an optional partition filter:
//! 1. Resolve the partitions to scan; an unpartitioned table scans one
//!    implicit partition at the table location
//! 2. Skip offline partitions when the schema no longer models them
//! 3. List each partition location and cut every data file into splits
//!
//! [`SplitSource`] does this lazily, one partition batch at a time, and can be
//! restarted. A partition that cannot be listed yields a `SplitEnumeration`
//! error and enumeration moves on to the next partition.

use crate::file_lister::{is_hidden, FileEntry, FileLister};
use crate::split::{PartitionKey, Split};
use ms_catalog::{Metastore, Partition, PartitionFilter, StorageFormat, Table};
use ms_common::constants::{
    DEFAULT_MAX_SPLIT_SIZE, DEFAULT_PARTITION_BATCH_SIZE, UNPARTITIONED_PARTITION_NAME,
};
use ms_common::utils::parse_size;
use ms_common::{Config, MetastoreError, Result, SchemaCompatibility};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Codecs whose output cannot be read from an arbitrary offset
const COMPRESSED_SUFFIXES: &[&str] = &[".gz", ".bz2", ".zst", ".snappy", ".lz4", ".deflate"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub max_split_size: u64,
    pub compatibility: SchemaCompatibility,
    pub partition_batch_size: usize,
    pub split_loader_concurrency: usize,
    pub recursive_directories: bool,
}

impl SplitConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            max_split_size: config.max_split_size_bytes()?,
            compatibility: config.compatibility(),
            partition_batch_size: config.partition_batch_size,
            split_loader_concurrency: config.split_loader_concurrency,
            recursive_directories: config.recursive_directories,
        })
    }

    pub fn with_compatibility(mut self, compatibility: SchemaCompatibility) -> Self {
        self.compatibility = compatibility;
        self
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_split_size: parse_size(DEFAULT_MAX_SPLIT_SIZE).unwrap_or(64 * 1024 * 1024),
            compatibility: SchemaCompatibility::Modern,
            partition_batch_size: DEFAULT_PARTITION_BATCH_SIZE,
            split_loader_concurrency: 1,
            recursive_directories: false,
        }
    }
}

/// Everything needed to turn one partition into splits
struct ScanContext {
    table: Table,
    format: StorageFormat,
    lister: Arc<dyn FileLister>,
    config: SplitConfig,
}

impl ScanContext {
    fn is_splittable(&self, format: StorageFormat, path: &str) -> bool {
        if !format.is_text_based() {
            return true;
        }
        let lower = path.to_lowercase();
        !COMPRESSED_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
    }

    fn partition_format(&self, name: &str, partition: &Partition) -> Result<StorageFormat> {
        if partition.storage.input_format.is_empty() {
            return Ok(self.format);
        }
        partition.storage.format().ok_or_else(|| {
            MetastoreError::NotSupported(format!(
                "Unsupported storage format {} of partition {} in table {}",
                partition.storage.input_format,
                name,
                self.table.name()
            ))
        })
    }

    fn split_file(
        &self,
        name: &str,
        keys: &[PartitionKey],
        format: StorageFormat,
        file: FileEntry,
        out: &mut Vec<Result<Split>>,
    ) {
        let chunk = if self.is_splittable(format, &file.path) {
            self.config.max_split_size.max(1)
        } else {
            file.size
        };
        let mut start = 0;
        while start < file.size {
            let length = chunk.min(file.size - start);
            out.push(Ok(Split {
                database: self.table.database_name.clone(),
                table: self.table.table_name.clone(),
                partition_name: name.to_string(),
                path: file.path.clone(),
                start,
                length,
                file_size: file.size,
                partition_keys: keys.to_vec(),
                format,
            }));
            start += length;
        }
    }

    /// Splits of one partition, or the single error explaining why there are none
    fn enumerate(&self, name: &str, partition: Option<Partition>) -> Vec<Result<Split>> {
        let Some(partition) = partition else {
            return vec![Err(MetastoreError::NotFound(format!(
                "Partition {} of table {} no longer exists",
                name,
                self.table.name()
            )))];
        };

        if partition.is_offline() && self.config.compatibility.offline_partitions_removed() {
            info!("Skipping offline partition {} of table {}", name, self.table.name());
            return vec![Err(MetastoreError::PartitionSkipped {
                partition: name.to_string(),
                reason: "partition is offline".to_string(),
            })];
        }

        let format = match self.partition_format(name, &partition) {
            Ok(format) => format,
            Err(e) => return vec![Err(e)],
        };

        let location = &partition.storage.location;
        let mut files = match self.lister.list(location, self.config.recursive_directories) {
            Ok(files) => files,
            Err(source) => {
                warn!(
                    "Failed to list {} for partition {} of table {}: {}",
                    location,
                    name,
                    self.table.name(),
                    source
                );
                return vec![Err(MetastoreError::SplitEnumeration {
                    partition: name.to_string(),
                    source,
                })];
            }
        };
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let keys: Vec<PartitionKey> = self
            .table
            .partition_column_names()
            .into_iter()
            .zip(partition.values.iter().cloned())
            .map(|(name, value)| PartitionKey { name, value })
            .collect();

        let mut splits = Vec::new();
        for file in files {
            if is_hidden(file.file_name()) || file.size == 0 {
                continue;
            }
            self.split_file(name, &keys, format, file, &mut splits);
        }
        debug!(
            "Partition {} of table {}: {} splits",
            name,
            self.table.name(),
            splits.len()
        );
        splits
    }
}

type PartitionBatch = Vec<(String, Option<Partition>)>;

/// Lazy, restartable sequence of splits for one table
pub struct SplitSource {
    metastore: Arc<dyn Metastore>,
    context: ScanContext,

    /// Partitions to scan, resolved when the source was created
    partition_names: Vec<String>,

    /// Index of the first partition not yet loaded
    next_partition: usize,
    loaded: VecDeque<(String, Option<Partition>)>,
    pending: VecDeque<Result<Split>>,
}

impl SplitSource {
    pub fn table(&self) -> &Table {
        &self.context.table
    }

    pub fn partition_names(&self) -> &[String] {
        &self.partition_names
    }

    /// Start over from the first partition
    pub fn restart(&mut self) {
        self.next_partition = 0;
        self.loaded.clear();
        self.pending.clear();
    }

    /// Load the next batch of partitions from the metastore
    fn next_batch(&mut self) -> Option<Result<PartitionBatch>> {
        if self.next_partition >= self.partition_names.len() {
            return None;
        }
        let end = (self.next_partition + self.context.config.partition_batch_size.max(1))
            .min(self.partition_names.len());
        let names = &self.partition_names[self.next_partition..end];
        self.next_partition = end;

        let table = &self.context.table;
        if !table.is_partitioned() {
            let implicit = Partition::new(table, Vec::new(), table.storage.location.clone());
            return Some(Ok(vec![(UNPARTITIONED_PARTITION_NAME.to_string(), Some(implicit))]));
        }
        Some(
            self.metastore
                .get_partitions_by_names(&table.database_name, &table.table_name, names),
        )
    }
}

impl Iterator for SplitSource {
    type Item = Result<Split>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(split) = self.pending.pop_front() {
                return Some(split);
            }
            if let Some((name, partition)) = self.loaded.pop_front() {
                self.pending.extend(self.context.enumerate(&name, partition));
                continue;
            }
            match self.next_batch()? {
                Ok(batch) => self.loaded.extend(batch),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Outcome of enumerating a whole table
#[derive(Debug, Default)]
pub struct SplitBatch {
    pub splits: Vec<Split>,

    /// Partitions excluded without failing the scan
    pub skipped: Vec<String>,

    pub failures: Vec<MetastoreError>,
}

impl SplitBatch {
    fn add(&mut self, item: Result<Split>) {
        match item {
            Ok(split) => self.splits.push(split),
            Err(MetastoreError::PartitionSkipped { partition, .. }) => self.skipped.push(partition),
            Err(e) => self.failures.push(e),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FromIterator<Result<Split>> for SplitBatch {
    fn from_iter<I: IntoIterator<Item = Result<Split>>>(iter: I) -> Self {
        let mut batch = SplitBatch::default();
        for item in iter {
            batch.add(item);
        }
        batch
    }
}

pub struct SplitGenerator {
    metastore: Arc<dyn Metastore>,
    lister: Arc<dyn FileLister>,
    config: SplitConfig,
}

impl SplitGenerator {
    pub fn new(metastore: Arc<dyn Metastore>, lister: Arc<dyn FileLister>, config: SplitConfig) -> Self {
        Self {
            metastore,
            lister,
            config,
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Lazy split source for `database.table`
    ///
    /// Fails up front if the table is missing, is a view, or is stored in a
    /// format splits cannot be generated for.
    pub fn splits(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<SplitSource> {
        let table = self
            .metastore
            .get_table(database, table)?
            .ok_or_else(|| MetastoreError::NotFound(format!("Table {}.{} not found", database, table)))?;
        if table.is_view() {
            return Err(MetastoreError::NotSupported(format!(
                "Cannot generate splits for view {}",
                table.name()
            )));
        }
        let format = table.storage.format().ok_or_else(|| {
            MetastoreError::NotSupported(format!(
                "Unsupported storage format {} of table {}",
                table.storage.input_format,
                table.name()
            ))
        })?;
        if let Some(filter) = filter {
            filter.validate_for(&table)?;
        }

        let partition_names = if table.is_partitioned() {
            self.metastore
                .get_partition_names(&table.database_name, &table.table_name, filter)?
        } else {
            vec![UNPARTITIONED_PARTITION_NAME.to_string()]
        };
        debug!(
            "Table {}: {} partitions to scan",
            table.name(),
            partition_names.len()
        );

        Ok(SplitSource {
            metastore: self.metastore.clone(),
            context: ScanContext {
                table,
                format,
                lister: self.lister.clone(),
                config: self.config.clone(),
            },
            partition_names,
            next_partition: 0,
            loaded: VecDeque::new(),
            pending: VecDeque::new(),
        })
    }

    /// Drain the lazy source on the calling thread
    pub fn collect_splits(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<SplitBatch> {
        Ok(self.splits(database, table, filter)?.collect())
    }

    /// Enumerate partitions on up to `split_loader_concurrency` threads
    ///
    /// Splits come back in the same order as from [`SplitSource`].
    pub fn collect_splits_parallel(
        &self,
        database: &str,
        table: &str,
        filter: Option<&PartitionFilter>,
    ) -> Result<SplitBatch> {
        let mut source = self.splits(database, table, filter)?;
        let mut result = SplitBatch::default();

        let mut work = Vec::new();
        while let Some(batch) = source.next_batch() {
            match batch {
                Ok(batch) => work.extend(batch),
                Err(e) => result.failures.push(e),
            }
        }

        let slots: Vec<Mutex<Option<Vec<Result<Split>>>>> =
            work.iter().map(|_| Mutex::new(None)).collect();
        let next = AtomicUsize::new(0);
        let workers = self.config.split_loader_concurrency.clamp(1, work.len().max(1));
        let context = &source.context;

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some((name, partition)) = work.get(index) else {
                        break;
                    };
                    let splits = context.enumerate(name, partition.clone());
                    *slots[index].lock() = Some(splits);
                });
            }
        });

        for slot in slots {
            for item in slot.into_inner().unwrap_or_default() {
                result.add(item);
            }
        }
        debug!(
            "Table {}: {} splits, {} skipped, {} failed partitions",
            context.table.name(),
            result.splits.len(),
            result.skipped.len(),
            result.failures.len()
        );
        Ok(result)
    }
}
