// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Split - one unit of scan work handed to an execution worker

use ms_catalog::StorageFormat;
use ms_common::{MetastoreError, Result};
use serde::{Deserialize, Serialize};

/// Partition column value carried by every split of a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKey {
    pub name: String,
    pub value: String,
}

/// Byte range of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub database: String,

    pub table: String,

    /// Hive partition name, or `<UNPARTITIONED>`
    pub partition_name: String,

    pub path: String,

    /// Offset of the first byte
    pub start: u64,

    pub length: u64,

    /// Size of the whole file
    pub file_size: u64,

    pub partition_keys: Vec<PartitionKey>,

    pub format: StorageFormat,
}

impl Split {
    /// Offset one past the last byte
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    pub fn covers_whole_file(&self) -> bool {
        self.start == 0 && self.length == self.file_size
    }
}

/// Serialize splits as JSON for debugging
pub fn splits_to_json(splits: &[Split]) -> Result<String> {
    serde_json::to_string_pretty(splits)
        .map_err(|e| MetastoreError::Serialization(format!("JSON serialization failed: {}", e)))
}
