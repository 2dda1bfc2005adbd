// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Native response shapes of the table-master catalog service
//!
//! These mirror what the service returns, before any validation. Names are as
//! the service stores them and column types are unparsed Hive type strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table type marker for managed tables
pub const MANAGED_TABLE: &str = "MANAGED_TABLE";
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";
pub const VIRTUAL_VIEW: &str = "VIRTUAL_VIEW";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,

    /// Hive type string, e.g. `decimal(10,2)` or `map<string,int>`
    #[serde(rename = "type")]
    pub type_name: String,

    pub comment: Option<String>,
}

impl FieldSchema {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            comment: None,
        }
    }
}

/// Physical layout of a table or partition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub serde: String,
    pub input_format: String,
    pub output_format: String,
    pub location: String,
    pub serde_parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub db_name: String,
    pub location: Option<String>,
    pub owner_name: Option<String>,

    /// `USER` or `ROLE`
    pub owner_type: Option<String>,
    pub comment: Option<String>,
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableInfo {
    pub db_name: String,
    pub table_name: String,
    pub owner: Option<String>,
    pub table_type: String,
    pub schema: Vec<FieldSchema>,

    /// Partition keys in declaration order
    pub partition_cols: Vec<FieldSchema>,
    pub layout: LayoutInfo,
    pub parameters: HashMap<String, String>,
    pub view_original_text: Option<String>,
    pub view_expanded_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartitionInfo {
    pub db_name: String,
    pub table_name: String,

    /// Hive partition name as reported by the service
    pub part_name: String,
    pub values: Vec<String>,
    pub data_cols: Vec<FieldSchema>,
    pub layout: LayoutInfo,
    pub parameters: HashMap<String, String>,
}

/// Per-type column statistics payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnStatisticsData {
    Boolean {
        num_trues: Option<i64>,
        num_falses: Option<i64>,
        num_nulls: Option<i64>,
    },
    Long {
        low_value: Option<i64>,
        high_value: Option<i64>,
        num_nulls: Option<i64>,
        num_distincts: Option<i64>,
    },
    Double {
        low_value: Option<f64>,
        high_value: Option<f64>,
        num_nulls: Option<i64>,
        num_distincts: Option<i64>,
    },
    String {
        max_col_len: Option<i64>,
        avg_col_len: Option<f64>,
        num_nulls: Option<i64>,
        num_distincts: Option<i64>,
    },
    Binary {
        max_col_len: Option<i64>,
        num_nulls: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatisticsInfo {
    pub col_name: String,
    pub col_type: String,
    pub data: ColumnStatisticsData,
}
