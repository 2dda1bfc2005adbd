// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Concurrent callers sharing one table-master client

use ms_catalog::{Metastore, StorageFormat};
use ms_table_client::proto::{FieldSchema, LayoutInfo, PartitionInfo, TableInfo, MANAGED_TABLE};
use ms_table_client::{MockTableMaster, RemoteMetastore};
use std::sync::Arc;
use std::thread;

const TABLES: usize = 100;

fn populated_master() -> Arc<MockTableMaster> {
    let master = MockTableMaster::new("localhost:19998");
    let layout = LayoutInfo {
        serde: StorageFormat::Parquet.serde().to_string(),
        input_format: StorageFormat::Parquet.input_format().to_string(),
        output_format: StorageFormat::Parquet.output_format().to_string(),
        ..LayoutInfo::default()
    };
    for i in 0..TABLES {
        let table_name = format!("t{}", i);
        master.add_table(TableInfo {
            db_name: "default".to_string(),
            table_name: table_name.clone(),
            table_type: MANAGED_TABLE.to_string(),
            schema: vec![FieldSchema::new("v", "int")],
            partition_cols: vec![FieldSchema::new("p", "int")],
            layout: layout.clone(),
            ..TableInfo::default()
        });
        // Partition values are unique per table
        for p in 0..3 {
            let value = (i * 10 + p).to_string();
            master.add_partition(PartitionInfo {
                db_name: "default".to_string(),
                table_name: table_name.clone(),
                part_name: format!("p={}", value),
                values: vec![value],
                layout: layout.clone(),
                ..PartitionInfo::default()
            });
        }
    }
    Arc::new(master)
}

#[test]
fn test_concurrent_partition_listing() {
    let master = populated_master();
    let metastore = RemoteMetastore::new(master.clone());

    let results: Vec<(usize, Vec<String>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..TABLES)
            .map(|i| {
                let metastore = &metastore;
                scope.spawn(move || {
                    let names = metastore
                        .get_partition_names("default", &format!("t{}", i), None)
                        .unwrap();
                    (i, names)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, names) in results {
        let expected: Vec<String> = (0..3).map(|p| format!("p={}", i * 10 + p)).collect();
        assert_eq!(names, expected, "table t{}", i);
    }
    assert_eq!(master.call_count("read_table"), TABLES);
}
