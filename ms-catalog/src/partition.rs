// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Partition definition and Hive partition naming
//!
//! A partition is addressed by its Hive name, `k1=v1/k2=v2`, built from the
//! owning table's partition keys in declaration order. Keys and values are
//! path-escaped, so the name parses back to exactly the same value tuple.

use crate::column::Column;
use crate::table::{Storage, Table};
use ms_common::constants::{
    HIVE_DEFAULT_PARTITION_VALUE, PRESTO_OFFLINE_KEY, PROTECT_MODE_KEY, PROTECT_MODE_OFFLINE,
};
use ms_common::{MetastoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partition metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub database_name: String,

    pub table_name: String,

    /// One value per partition key of the owning table
    pub values: Vec<String>,

    pub storage: Storage,

    pub columns: Vec<Column>,

    pub parameters: HashMap<String, String>,

    /// Legacy offline state; `None` on catalogs that never modelled it
    pub offline: Option<bool>,
}

impl Partition {
    /// Partition of `table` inheriting its storage format and data columns
    pub fn new(table: &Table, values: Vec<String>, location: impl Into<String>) -> Self {
        Self {
            database_name: table.database_name.clone(),
            table_name: table.table_name.clone(),
            values,
            storage: table.storage.with_location(location),
            columns: table.data_columns.clone(),
            parameters: HashMap::new(),
            offline: None,
        }
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = Some(offline);
        self
    }

    /// Absence of the flag means online
    pub fn is_offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }

    /// Hive name of this partition under `table`'s keys
    pub fn name(&self, table: &Table) -> Result<String> {
        make_partition_name(&table.partition_column_names(), &self.values)
    }
}

/// Offline state carried in legacy partition parameters
pub fn offline_flag_from_parameters(parameters: &HashMap<String, String>) -> Option<bool> {
    let protect_mode = parameters.get(PROTECT_MODE_KEY);
    let presto_offline = parameters.get(PRESTO_OFFLINE_KEY);
    if protect_mode.is_none() && presto_offline.is_none() {
        return None;
    }
    let offline = presto_offline.is_some()
        || protect_mode.map_or(false, |mode| {
            mode.split(',').any(|flag| flag.trim().eq_ignore_ascii_case(PROTECT_MODE_OFFLINE))
        });
    Some(offline)
}

/// Per-key constraint on partition values; `None` matches any value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartitionFilter {
    pub parts: Vec<Option<String>>,
}

impl PartitionFilter {
    pub fn new(parts: Vec<Option<String>>) -> Self {
        Self { parts }
    }

    /// Filter matching every partition of a table with `arity` keys
    pub fn all(arity: usize) -> Self {
        Self { parts: vec![None; arity] }
    }

    /// The filter must name every partition key of `table`
    pub fn validate_for(&self, table: &Table) -> Result<()> {
        if self.parts.len() != table.partition_columns.len() {
            return Err(MetastoreError::InvalidArgument(format!(
                "Partition filter has {} parts but table {} has {} partition keys",
                self.parts.len(),
                table.name(),
                table.partition_columns.len()
            )));
        }
        Ok(())
    }

    pub fn matches(&self, values: &[String]) -> bool {
        self.parts.len() == values.len()
            && self
                .parts
                .iter()
                .zip(values)
                .all(|(part, value)| part.as_ref().map_or(true, |p| p == value))
    }
}

fn needs_escape(c: char) -> bool {
    matches!(
        c,
        '\u{01}'..='\u{1F}'
            | '"'
            | '#'
            | '%'
            | '\''
            | '*'
            | '/'
            | ':'
            | '='
            | '?'
            | '\\'
            | '\u{7F}'
            | '{'
            | '['
            | ']'
            | '^'
    )
}

/// Hive path escaping; empty values map to the default partition
pub fn escape_path_name(value: &str) -> String {
    if value.is_empty() {
        return HIVE_DEFAULT_PARTITION_VALUE.to_string();
    }
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escape(c) {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

pub fn unescape_path_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let digits = &rest.as_bytes()[pos + 1..];
        if digits.len() >= 2 && digits[0].is_ascii_hexdigit() && digits[1].is_ascii_hexdigit() {
            out.push(((hex_value(digits[0]) << 4) | hex_value(digits[1])) as char);
            rest = &rest[pos + 3..];
        } else {
            out.push('%');
            rest = &rest[pos + 1..];
        }
    }
    out.push_str(rest);
    out
}

fn hex_value(digit: u8) -> u8 {
    (digit as char).to_digit(16).unwrap_or(0) as u8
}

/// Build `k1=v1/k2=v2` from ordered keys and values
pub fn make_partition_name(keys: &[String], values: &[String]) -> Result<String> {
    if keys.len() != values.len() {
        return Err(MetastoreError::InvalidArgument(format!(
            "Partition has {} values but {} keys",
            values.len(),
            keys.len()
        )));
    }
    Ok(keys
        .iter()
        .zip(values)
        .map(|(key, value)| format!("{}={}", escape_path_name(key), escape_path_name(value)))
        .collect::<Vec<_>>()
        .join("/"))
}

/// Ordered values encoded in a Hive partition name
pub fn to_partition_values(name: &str) -> Result<Vec<String>> {
    if name.is_empty() {
        return Ok(Vec::new());
    }
    name.split('/')
        .map(|part| {
            part.split_once('=')
                .map(|(_, value)| unescape_path_name(value))
                .ok_or_else(|| {
                    MetastoreError::InvalidArgument(format!("Invalid partition name: {}", name))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_make_partition_name() {
        let name = make_partition_name(&keys(&["ds", "hour"]), &keys(&["2024-01-01", "07"])).unwrap();
        assert_eq!(name, "ds=2024-01-01/hour=07");
        assert!(make_partition_name(&keys(&["ds"]), &keys(&["a", "b"])).is_err());
    }

    #[test]
    fn test_escaping_round_trip() {
        let values = keys(&["a/b=c", "100%", "x:y?"]);
        let name = make_partition_name(&keys(&["k1", "k2", "k3"]), &values).unwrap();
        assert_eq!(name, "k1=a%2Fb%3Dc/k2=100%25/k3=x%3Ay%3F");
        assert_eq!(to_partition_values(&name).unwrap(), values);
    }

    #[test]
    fn test_default_partition_value() {
        let name = make_partition_name(&keys(&["ds"]), &keys(&[""])).unwrap();
        assert_eq!(name, "ds=__HIVE_DEFAULT_PARTITION__");
    }

    #[test]
    fn test_invalid_partition_name() {
        assert!(to_partition_values("ds").is_err());
        assert_eq!(to_partition_values("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_filter_matches() {
        let filter = PartitionFilter::new(vec![Some("2024".to_string()), None]);
        assert!(filter.matches(&keys(&["2024", "01"])));
        assert!(!filter.matches(&keys(&["2023", "01"])));
        assert!(!filter.matches(&keys(&["2024"])));
        assert!(PartitionFilter::all(2).matches(&keys(&["a", "b"])));
    }

    #[test]
    fn test_offline_flag() {
        let mut parameters = HashMap::new();
        assert_eq!(offline_flag_from_parameters(&parameters), None);

        parameters.insert(PROTECT_MODE_KEY.to_string(), "NO_DROP".to_string());
        assert_eq!(offline_flag_from_parameters(&parameters), Some(false));

        parameters.insert(PROTECT_MODE_KEY.to_string(), "NO_DROP,OFFLINE".to_string());
        assert_eq!(offline_flag_from_parameters(&parameters), Some(true));

        let mut parameters = HashMap::new();
        parameters.insert(PRESTO_OFFLINE_KEY.to_string(), "true".to_string());
        assert_eq!(offline_flag_from_parameters(&parameters), Some(true));
    }
}
