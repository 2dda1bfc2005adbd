// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Table and partition statistics
//!
//! Every field is optional: an absent value means "unknown", never zero.

use ms_common::constants::{NUM_FILES, NUM_ROWS, RAW_DATA_SIZE, TOTAL_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Row and size statistics kept in table or partition parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicStatistics {
    pub file_count: Option<u64>,
    pub row_count: Option<u64>,
    pub in_memory_data_size: Option<u64>,
    pub on_disk_data_size: Option<u64>,
}

impl BasicStatistics {
    /// Read statistics from parameters; negative or unparseable values are unknown.
    pub fn from_parameters(parameters: &HashMap<String, String>) -> Self {
        let read = |key: &str| parameters.get(key).and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            file_count: read(NUM_FILES),
            row_count: read(NUM_ROWS),
            in_memory_data_size: read(RAW_DATA_SIZE),
            on_disk_data_size: read(TOTAL_SIZE),
        }
    }

    /// Write known values into `parameters`, removing keys for unknown ones
    pub fn apply_to_parameters(&self, parameters: &mut HashMap<String, String>) {
        for (key, value) in [
            (NUM_FILES, self.file_count),
            (NUM_ROWS, self.row_count),
            (RAW_DATA_SIZE, self.in_memory_data_size),
            (TOTAL_SIZE, self.on_disk_data_size),
        ] {
            match value {
                Some(v) => {
                    parameters.insert(key.to_string(), v.to_string());
                }
                None => {
                    parameters.remove(key);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Minimum or maximum of a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatisticValue {
    Long(i64),
    Double(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub min: Option<StatisticValue>,
    pub max: Option<StatisticValue>,
    pub null_count: Option<u64>,
    pub distinct_values_count: Option<u64>,
    pub max_value_size_in_bytes: Option<u64>,
    pub true_count: Option<u64>,
    pub false_count: Option<u64>,
}

/// Statistics of a table or one partition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartitionStatistics {
    pub basic: BasicStatistics,
    pub columns: HashMap<String, ColumnStatistics>,
}

impl PartitionStatistics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(basic: BasicStatistics, columns: HashMap<String, ColumnStatistics>) -> Self {
        Self { basic, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.basic.is_empty() && self.columns.is_empty()
    }
}
