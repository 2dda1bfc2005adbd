// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Table definitions

use crate::column::Column;
use ms_common::constants::TABLE_COMMENT;
use ms_common::utils::normalize_name;
use ms_common::{MetastoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Fully qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
    pub database: String,
    pub table: String,
}

impl TableName {
    pub fn new(database: &str, table: &str) -> Self {
        Self {
            database: normalize_name(database),
            table: normalize_name(table),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

const LAZY_SIMPLE_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";
const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
const RCFILE_INPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.RCFileInputFormat";
const RCFILE_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.RCFileOutputFormat";

/// Storage formats the engine can scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum StorageFormat {
    Orc,
    Parquet,
    Avro,
    RcBinary,
    RcText,
    SequenceFile,
    Json,
    TextFile,
    Csv,
}

impl StorageFormat {
    pub fn serde(&self) -> &'static str {
        match self {
            Self::Orc => "org.apache.hadoop.hive.ql.io.orc.OrcSerde",
            Self::Parquet => "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe",
            Self::Avro => "org.apache.hadoop.hive.serde2.avro.AvroSerDe",
            Self::RcBinary => "org.apache.hadoop.hive.serde2.columnar.LazyBinaryColumnarSerDe",
            Self::RcText => "org.apache.hadoop.hive.serde2.columnar.ColumnarSerDe",
            Self::SequenceFile | Self::TextFile => LAZY_SIMPLE_SERDE,
            Self::Json => "org.apache.hive.hcatalog.data.JsonSerDe",
            Self::Csv => "org.apache.hadoop.hive.serde2.OpenCSVSerde",
        }
    }

    pub fn input_format(&self) -> &'static str {
        match self {
            Self::Orc => "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat",
            Self::Parquet => "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat",
            Self::Avro => "org.apache.hadoop.hive.ql.io.avro.AvroContainerInputFormat",
            Self::RcBinary | Self::RcText => RCFILE_INPUT_FORMAT,
            Self::SequenceFile => "org.apache.hadoop.mapred.SequenceFileInputFormat",
            Self::Json | Self::TextFile | Self::Csv => TEXT_INPUT_FORMAT,
        }
    }

    pub fn output_format(&self) -> &'static str {
        match self {
            Self::Orc => "org.apache.hadoop.hive.ql.io.orc.OrcOutputFormat",
            Self::Parquet => "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat",
            Self::Avro => "org.apache.hadoop.hive.ql.io.avro.AvroContainerOutputFormat",
            Self::RcBinary | Self::RcText => RCFILE_OUTPUT_FORMAT,
            Self::SequenceFile => "org.apache.hadoop.hive.ql.io.HiveSequenceFileOutputFormat",
            Self::Json | Self::TextFile | Self::Csv => TEXT_OUTPUT_FORMAT,
        }
    }

    /// Recognise a format from its serde and input format classes
    pub fn from_classes(serde: &str, input_format: &str) -> Option<Self> {
        Self::iter().find(|format| format.serde() == serde && format.input_format() == input_format)
    }

    /// Line-oriented formats whose files cannot be split once compressed
    pub fn is_text_based(&self) -> bool {
        matches!(self, Self::TextFile | Self::Json | Self::Csv)
    }
}

/// Physical storage of a table or partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub serde: String,
    pub input_format: String,
    pub output_format: String,
    pub location: String,
    pub serde_parameters: HashMap<String, String>,
}

impl Storage {
    pub fn new(format: StorageFormat, location: impl Into<String>) -> Self {
        Self {
            serde: format.serde().to_string(),
            input_format: format.input_format().to_string(),
            output_format: format.output_format().to_string(),
            location: location.into(),
            serde_parameters: HashMap::new(),
        }
    }

    /// `None` when the classes do not name a supported format
    pub fn format(&self) -> Option<StorageFormat> {
        StorageFormat::from_classes(&self.serde, &self.input_format)
    }

    pub fn with_location(&self, location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub original_text: String,
    pub expanded_text: Option<String>,
}

/// What a table stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Managed,
    External,
    /// Stores a query definition instead of data
    View(ViewDefinition),
}

/// Table metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Owning database (lower case)
    pub database_name: String,

    /// Table name (lower case)
    pub table_name: String,

    pub owner: Option<String>,

    pub kind: TableKind,

    pub storage: Storage,

    /// Non-partition columns in declaration order
    pub data_columns: Vec<Column>,

    /// Partition keys in declaration order
    pub partition_columns: Vec<Column>,

    pub parameters: HashMap<String, String>,
}

impl Table {
    pub fn new(database_name: &str, table_name: &str, data_columns: Vec<Column>, storage: Storage) -> Self {
        Self {
            database_name: normalize_name(database_name),
            table_name: normalize_name(table_name),
            owner: None,
            kind: TableKind::Managed,
            storage,
            data_columns,
            partition_columns: Vec::new(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_partition_columns(mut self, partition_columns: Vec<Column>) -> Self {
        self.partition_columns = partition_columns;
        self
    }

    pub fn with_kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn name(&self) -> TableName {
        TableName {
            database: self.database_name.clone(),
            table: self.table_name.clone(),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, TableKind::View(_))
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partition_columns.is_empty()
    }

    pub fn partition_column_names(&self) -> Vec<String> {
        self.partition_columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get column by name, data or partition
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.data_columns
            .iter()
            .chain(self.partition_columns.iter())
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn comment(&self) -> Option<&str> {
        self.parameters.get(TABLE_COMMENT).map(String::as_str)
    }

    /// Column names must be unique across data and partition columns
    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(MetastoreError::InvalidArgument("Table name cannot be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for column in self.data_columns.iter().chain(self.partition_columns.iter()) {
            if !seen.insert(column.name.to_lowercase()) {
                return Err(MetastoreError::InvalidArgument(format!(
                    "Duplicate column name {} in table {}",
                    column.name,
                    self.name()
                )));
            }
        }
        if self.is_view() && self.is_partitioned() {
            return Err(MetastoreError::InvalidArgument(format!(
                "View {} cannot have partition columns",
                self.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_common::HiveType;

    #[test]
    fn test_format_round_trip() {
        for format in StorageFormat::iter() {
            let storage = Storage::new(format, "/warehouse/t");
            assert_eq!(storage.format(), Some(format), "{:?}", format);
        }
    }

    #[test]
    fn test_unknown_format() {
        let mut storage = Storage::new(StorageFormat::Orc, "/warehouse/t");
        storage.input_format = "com.example.UnknownInputFormat".to_string();
        assert_eq!(storage.format(), None);
    }

    #[test]
    fn test_duplicate_partition_column() {
        let table = Table::new(
            "default",
            "t",
            vec![Column::new("ds", HiveType::String)],
            Storage::new(StorageFormat::Orc, "/warehouse/t"),
        )
        .with_partition_columns(vec![Column::new("DS", HiveType::String)]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_names_are_normalized() {
        let table = Table::new(
            "Default",
            "Orders",
            vec![],
            Storage::new(StorageFormat::Parquet, "/warehouse/orders"),
        );
        assert_eq!(table.name().to_string(), "default.orders");
    }
}
