// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! End-to-end split generation through the gated remote metastore

use ms_catalog::{GatedMetastore, Metastore, StorageFormat};
use ms_common::constants::{PRESTO_OFFLINE_KEY, PROTECT_MODE_KEY};
use ms_common::{Config, MetastoreError, SchemaCompatibility};
use ms_planner::{FileEntry, SplitConfig, SplitGenerator, StaticFileLister};
use ms_table_client::proto::{FieldSchema, LayoutInfo, PartitionInfo, TableInfo, MANAGED_TABLE};
use ms_table_client::{MockTableMaster, RemoteMetastore, TransportError};
use std::collections::HashMap;
use std::sync::Arc;

fn layout(location: &str) -> LayoutInfo {
    LayoutInfo {
        serde: StorageFormat::Orc.serde().to_string(),
        input_format: StorageFormat::Orc.input_format().to_string(),
        output_format: StorageFormat::Orc.output_format().to_string(),
        location: location.to_string(),
        serde_parameters: HashMap::new(),
    }
}

fn master() -> Arc<MockTableMaster> {
    let master = MockTableMaster::new("localhost:19998");
    master.add_table(TableInfo {
        db_name: "default".to_string(),
        table_name: "clicks".to_string(),
        table_type: MANAGED_TABLE.to_string(),
        schema: vec![FieldSchema::new("url", "string")],
        partition_cols: vec![FieldSchema::new("ds", "string")],
        layout: layout("/warehouse/clicks"),
        ..TableInfo::default()
    });
    let partitions: [(&str, Option<(&str, &str)>); 3] = [
        ("1", None),
        ("2", Some((PROTECT_MODE_KEY, "OFFLINE"))),
        ("3", Some((PRESTO_OFFLINE_KEY, "operator"))),
    ];
    for (day, marker) in partitions {
        let location = format!("/warehouse/clicks/ds={}", day);
        master.add_partition(PartitionInfo {
            db_name: "default".to_string(),
            table_name: "clicks".to_string(),
            part_name: format!("ds={}", day),
            values: vec![day.to_string()],
            layout: layout(&location),
            parameters: marker
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..PartitionInfo::default()
        });
    }
    Arc::new(master)
}

fn lister() -> Arc<StaticFileLister> {
    let mut lister = StaticFileLister::new();
    for day in ["1", "2", "3"] {
        let location = format!("/warehouse/clicks/ds={}", day);
        lister = lister.with_files(&location, vec![FileEntry::new(format!("{}/part-0", location), 10)]);
    }
    Arc::new(lister)
}

fn generator(master: Arc<MockTableMaster>, hive_version_major: u32) -> SplitGenerator {
    let config = Config::from_toml_str(&format!("hive_version_major = {}\n", hive_version_major)).unwrap();
    let metastore: Arc<dyn Metastore> =
        Arc::new(GatedMetastore::new(Arc::new(RemoteMetastore::new(master))));
    SplitGenerator::new(metastore, lister(), SplitConfig::from_config(&config).unwrap())
}

#[test]
fn test_modern_catalog_skips_offline_partitions() {
    let generator = generator(master(), 2);
    assert_eq!(generator.config().compatibility, SchemaCompatibility::Modern);

    let batch = generator.collect_splits("default", "clicks", None).unwrap();
    assert!(batch.is_complete());
    assert_eq!(batch.skipped, vec!["ds=2", "ds=3"]);
    assert_eq!(batch.splits.len(), 1);
    assert_eq!(batch.splits[0].partition_name, "ds=1");
}

#[test]
fn test_legacy_catalog_scans_offline_partitions() {
    let generator = generator(master(), 1);
    assert_eq!(generator.config().compatibility, SchemaCompatibility::Legacy);

    let batch = generator.collect_splits_parallel("default", "clicks", None).unwrap();
    assert!(batch.skipped.is_empty());
    let names: Vec<&str> = batch.splits.iter().map(|s| s.partition_name.as_str()).collect();
    assert_eq!(names, vec!["ds=1", "ds=2", "ds=3"]);
}

#[test]
fn test_transient_failure_while_loading_partitions() {
    let master = master();
    let generator = generator(master.clone(), 2);

    let mut source = generator.splits("default", "clicks", None).unwrap();
    // The partition batch load fails; the error is surfaced, not swallowed
    master.inject_failures(1, TransportError::Unavailable("master restarting".to_string()));
    let first = source.next().unwrap();
    assert!(matches!(first, Err(MetastoreError::TransientCatalog(_))));

    // Restarting re-reads the partitions
    source.restart();
    let splits: Vec<_> = source.filter_map(|r| r.ok()).collect();
    assert_eq!(splits.len(), 1);
}
