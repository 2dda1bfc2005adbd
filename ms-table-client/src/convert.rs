// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Conversion from table-master responses to the catalog model
//!
//! Anything the model cannot represent is a protocol error: an unparseable
//! column type, a partition whose values do not match the table's keys, or a
//! view without its text.

use crate::proto::{
    ColumnStatisticsData, ColumnStatisticsInfo, DatabaseInfo, FieldSchema, LayoutInfo,
    PartitionInfo, TableInfo, EXTERNAL_TABLE, VIRTUAL_VIEW,
};
use ms_catalog::partition::offline_flag_from_parameters;
use ms_catalog::{
    BasicStatistics, Column, ColumnStatistics, Database, Partition, PartitionStatistics,
    PrincipalType, StatisticValue, Storage, Table, TableKind, ViewDefinition,
};
use ms_common::utils::normalize_name;
use ms_common::{HiveType, MetastoreError, Result};
use std::collections::HashMap;

fn protocol_error(message: String) -> MetastoreError {
    MetastoreError::CatalogProtocol(message)
}

pub fn to_column(field: &FieldSchema) -> Result<Column> {
    let column_type = HiveType::parse(&field.type_name).map_err(|e| {
        protocol_error(format!(
            "Unsupported type '{}' for column {}: {}",
            field.type_name, field.name, e
        ))
    })?;
    Ok(Column {
        name: normalize_name(&field.name),
        column_type,
        comment: field.comment.clone(),
    })
}

fn to_columns(fields: &[FieldSchema]) -> Result<Vec<Column>> {
    fields.iter().map(to_column).collect()
}

fn to_storage(layout: &LayoutInfo) -> Storage {
    Storage {
        serde: layout.serde.clone(),
        input_format: layout.input_format.clone(),
        output_format: layout.output_format.clone(),
        location: layout.location.clone(),
        serde_parameters: layout.serde_parameters.clone(),
    }
}

pub fn to_database(info: DatabaseInfo) -> Result<Database> {
    if info.db_name.trim().is_empty() {
        return Err(protocol_error("Database response without a name".to_string()));
    }
    let owner_type = match info.owner_type.as_deref() {
        None => None,
        Some(t) if t.eq_ignore_ascii_case("USER") => Some(PrincipalType::User),
        Some(t) if t.eq_ignore_ascii_case("ROLE") => Some(PrincipalType::Role),
        Some(other) => {
            return Err(protocol_error(format!("Unknown principal type '{}'", other)));
        }
    };
    Ok(Database {
        name: normalize_name(&info.db_name),
        location: info.location,
        owner_name: info.owner_name,
        owner_type,
        comment: info.comment,
        parameters: info.parameters,
    })
}

pub fn to_table(info: TableInfo) -> Result<Table> {
    if info.table_name.trim().is_empty() {
        return Err(protocol_error(format!(
            "Table response in database {} without a name",
            info.db_name
        )));
    }
    let kind = if info.table_type.eq_ignore_ascii_case(VIRTUAL_VIEW) {
        let original_text = info.view_original_text.ok_or_else(|| {
            protocol_error(format!("View {}.{} has no view text", info.db_name, info.table_name))
        })?;
        TableKind::View(ViewDefinition {
            original_text,
            expanded_text: info.view_expanded_text,
        })
    } else if info.table_type.eq_ignore_ascii_case(EXTERNAL_TABLE) {
        TableKind::External
    } else {
        TableKind::Managed
    };

    let table = Table {
        database_name: normalize_name(&info.db_name),
        table_name: normalize_name(&info.table_name),
        owner: info.owner,
        kind,
        storage: to_storage(&info.layout),
        data_columns: to_columns(&info.schema)?,
        partition_columns: to_columns(&info.partition_cols)?,
        parameters: info.parameters,
    };
    table.validate().map_err(|e| protocol_error(e.to_string()))?;
    Ok(table)
}

/// Partition of `table`; values must line up with the table's partition keys
pub fn to_partition(table: &Table, info: PartitionInfo) -> Result<Partition> {
    if info.values.len() != table.partition_columns.len() {
        return Err(protocol_error(format!(
            "Partition {} of {} has {} values but the table has {} partition keys",
            info.part_name,
            table.name(),
            info.values.len(),
            table.partition_columns.len()
        )));
    }
    let columns = if info.data_cols.is_empty() {
        table.data_columns.clone()
    } else {
        to_columns(&info.data_cols)?
    };
    let offline = offline_flag_from_parameters(&info.parameters);
    Ok(Partition {
        database_name: table.database_name.clone(),
        table_name: table.table_name.clone(),
        values: info.values,
        storage: to_storage(&info.layout),
        columns,
        parameters: info.parameters,
        offline,
    })
}

fn count(value: Option<i64>) -> Option<u64> {
    value.and_then(|v| u64::try_from(v).ok())
}

pub fn to_column_statistics(info: &ColumnStatisticsInfo) -> ColumnStatistics {
    match &info.data {
        ColumnStatisticsData::Boolean {
            num_trues,
            num_falses,
            num_nulls,
        } => ColumnStatistics {
            null_count: count(*num_nulls),
            true_count: count(*num_trues),
            false_count: count(*num_falses),
            ..ColumnStatistics::default()
        },
        ColumnStatisticsData::Long {
            low_value,
            high_value,
            num_nulls,
            num_distincts,
        } => ColumnStatistics {
            min: low_value.map(StatisticValue::Long),
            max: high_value.map(StatisticValue::Long),
            null_count: count(*num_nulls),
            distinct_values_count: count(*num_distincts),
            ..ColumnStatistics::default()
        },
        ColumnStatisticsData::Double {
            low_value,
            high_value,
            num_nulls,
            num_distincts,
        } => ColumnStatistics {
            min: low_value.map(StatisticValue::Double),
            max: high_value.map(StatisticValue::Double),
            null_count: count(*num_nulls),
            distinct_values_count: count(*num_distincts),
            ..ColumnStatistics::default()
        },
        ColumnStatisticsData::String {
            max_col_len,
            num_nulls,
            num_distincts,
            ..
        } => ColumnStatistics {
            null_count: count(*num_nulls),
            distinct_values_count: count(*num_distincts),
            max_value_size_in_bytes: count(*max_col_len),
            ..ColumnStatistics::default()
        },
        ColumnStatisticsData::Binary {
            max_col_len,
            num_nulls,
        } => ColumnStatistics {
            null_count: count(*num_nulls),
            max_value_size_in_bytes: count(*max_col_len),
            ..ColumnStatistics::default()
        },
    }
}

/// Combine parameter-borne basic statistics with remote column statistics
pub fn to_partition_statistics(
    parameters: &HashMap<String, String>,
    columns: &[ColumnStatisticsInfo],
) -> PartitionStatistics {
    PartitionStatistics::new(
        BasicStatistics::from_parameters(parameters),
        columns
            .iter()
            .map(|info| (normalize_name(&info.col_name), to_column_statistics(info)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::MANAGED_TABLE;
    use ms_catalog::StorageFormat;
    use ms_common::constants::{NUM_ROWS, PROTECT_MODE_KEY};

    fn orc_layout(location: &str) -> LayoutInfo {
        LayoutInfo {
            serde: StorageFormat::Orc.serde().to_string(),
            input_format: StorageFormat::Orc.input_format().to_string(),
            output_format: StorageFormat::Orc.output_format().to_string(),
            location: location.to_string(),
            serde_parameters: HashMap::new(),
        }
    }

    fn table_info() -> TableInfo {
        TableInfo {
            db_name: "Default".to_string(),
            table_name: "Orders".to_string(),
            table_type: MANAGED_TABLE.to_string(),
            schema: vec![
                FieldSchema::new("ID", "bigint"),
                FieldSchema::new("amount", "decimal(12,2)"),
            ],
            partition_cols: vec![FieldSchema::new("ds", "string"), FieldSchema::new("hr", "int")],
            layout: orc_layout("/warehouse/orders"),
            ..TableInfo::default()
        }
    }

    #[test]
    fn test_to_table() {
        let table = to_table(table_info()).unwrap();
        assert_eq!(table.database_name, "default");
        assert_eq!(table.table_name, "orders");
        assert_eq!(table.data_columns[0].name, "id");
        assert_eq!(table.storage.format(), Some(StorageFormat::Orc));
        // Key order is preserved
        assert_eq!(table.partition_column_names(), vec!["ds", "hr"]);
    }

    #[test]
    fn test_unparseable_type_is_protocol_error() {
        let mut info = table_info();
        info.schema.push(FieldSchema::new("bad", "array<int"));
        assert!(matches!(to_table(info), Err(MetastoreError::CatalogProtocol(_))));
    }

    #[test]
    fn test_view_requires_text() {
        let mut info = table_info();
        info.partition_cols.clear();
        info.table_type = VIRTUAL_VIEW.to_string();
        assert!(matches!(to_table(info.clone()), Err(MetastoreError::CatalogProtocol(_))));

        info.view_original_text = Some("SELECT 1".to_string());
        assert!(to_table(info).unwrap().is_view());
    }

    #[test]
    fn test_partition_arity_mismatch() {
        let table = to_table(table_info()).unwrap();
        let info = PartitionInfo {
            part_name: "ds=2024-01-01".to_string(),
            values: vec!["2024-01-01".to_string()],
            layout: orc_layout("/warehouse/orders/ds=2024-01-01"),
            ..PartitionInfo::default()
        };
        assert!(matches!(
            to_partition(&table, info),
            Err(MetastoreError::CatalogProtocol(_))
        ));
    }

    #[test]
    fn test_partition_offline_flag() {
        let table = to_table(table_info()).unwrap();
        let mut info = PartitionInfo {
            part_name: "ds=2024-01-01/hr=1".to_string(),
            values: vec!["2024-01-01".to_string(), "1".to_string()],
            layout: orc_layout("/warehouse/orders/ds=2024-01-01/hr=1"),
            ..PartitionInfo::default()
        };
        let partition = to_partition(&table, info.clone()).unwrap();
        assert_eq!(partition.offline, None);
        assert_eq!(partition.columns, table.data_columns);

        info.parameters.insert(PROTECT_MODE_KEY.to_string(), "OFFLINE".to_string());
        assert!(to_partition(&table, info).unwrap().is_offline());
    }

    #[test]
    fn test_partition_statistics() {
        let mut parameters = HashMap::new();
        parameters.insert(NUM_ROWS.to_string(), "12".to_string());
        let columns = vec![ColumnStatisticsInfo {
            col_name: "ID".to_string(),
            col_type: "bigint".to_string(),
            data: ColumnStatisticsData::Long {
                low_value: Some(1),
                high_value: Some(12),
                num_nulls: Some(-1),
                num_distincts: Some(12),
            },
        }];

        let stats = to_partition_statistics(&parameters, &columns);
        assert_eq!(stats.basic.row_count, Some(12));
        let id = &stats.columns["id"];
        assert_eq!(id.max, Some(StatisticValue::Long(12)));
        // Negative counts are unknown
        assert_eq!(id.null_count, None);
        assert_eq!(id.distinct_values_count, Some(12));
    }
}
