// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Capability gate tests: denied writes never reach the backend

use ms_catalog::{
    Column, Database, GatedMetastore, InMemoryMetastore, Metastore, Partition, PartitionFilter,
    PartitionStatistics, Storage, StorageFormat, Table,
};
use ms_common::{
    CapabilityDescriptor, HiveType, MetastoreError, OperationCategory, Result, WriteOperation,
};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn events_table(name: &str) -> Table {
    Table::new(
        "default",
        name,
        vec![
            Column::new("id", HiveType::BigInt),
            Column::new("payload", HiveType::String),
        ],
        Storage::new(StorageFormat::Parquet, format!("/warehouse/{}", name)),
    )
    .with_partition_columns(vec![Column::new("ds", HiveType::String)])
}

/// Backend with `default.t0` (one partition) and an empty `scratch` database
fn fixture(capabilities: CapabilityDescriptor) -> Arc<InMemoryMetastore> {
    let backend = InMemoryMetastore::with_capabilities(capabilities);
    backend.create_database(&Database::new("default")).unwrap();
    backend.create_database(&Database::new("scratch")).unwrap();
    let table = events_table("t0");
    backend.create_table(&table).unwrap();
    backend
        .add_partitions(
            "default",
            "t0",
            &[Partition::new(&table, vec!["1".to_string()], "/warehouse/t0/ds=1")],
        )
        .unwrap();
    Arc::new(backend)
}

/// Issue one valid write of kind `operation`
fn invoke(metastore: &dyn Metastore, operation: WriteOperation) -> Result<()> {
    let table = events_table("t0");
    match operation {
        WriteOperation::CreateDatabase => metastore.create_database(&Database::new("newdb")),
        WriteOperation::DropDatabase => metastore.drop_database("scratch"),
        WriteOperation::RenameDatabase => metastore.rename_database("scratch", "scratch2"),
        WriteOperation::CreateTable => metastore.create_table(&events_table("t1")),
        WriteOperation::DropTable => metastore.drop_table("default", "t0"),
        WriteOperation::AlterTable => {
            metastore.alter_table("default", "t0", &table.clone().with_owner("etl"))
        }
        WriteOperation::RenameTable => metastore.rename_table("default", "t0", "default", "t0_old"),
        WriteOperation::CommentTable => metastore.comment_table("default", "t0", Some("events")),
        WriteOperation::AddColumn => {
            metastore.add_column("default", "t0", &Column::new("extra", HiveType::Int))
        }
        WriteOperation::RenameColumn => metastore.rename_column("default", "t0", "payload", "body"),
        WriteOperation::DropColumn => metastore.drop_column("default", "t0", "payload"),
        WriteOperation::AddPartitions => metastore.add_partitions(
            "default",
            "t0",
            &[Partition::new(&table, vec!["2".to_string()], "/warehouse/t0/ds=2")],
        ),
        WriteOperation::DropPartition => metastore.drop_partition("default", "t0", &["1".to_string()]),
        WriteOperation::AlterPartition => {
            let mut partition = Partition::new(&table, vec!["1".to_string()], "/warehouse/t0/ds=1");
            partition.parameters.insert("owner".to_string(), "etl".to_string());
            metastore.alter_partition("default", "t0", &partition)
        }
        WriteOperation::UpdateTableStatistics => {
            metastore.update_table_statistics("default", "t0", &|mut stats: PartitionStatistics| {
                stats.basic.row_count = Some(7);
                stats
            })
        }
        WriteOperation::UpdatePartitionStatistics => metastore.update_partition_statistics(
            "default",
            "t0",
            "ds=1",
            &|mut stats: PartitionStatistics| {
                stats.basic.row_count = Some(3);
                stats
            },
        ),
    }
}

/// Everything observable through the read surface
#[derive(Debug, PartialEq)]
struct Snapshot {
    databases: Vec<Option<Database>>,
    tables: Vec<Option<Table>>,
    partitions: Vec<(String, Option<Partition>)>,
    table_statistics: Vec<PartitionStatistics>,
    partition_statistics: Vec<(String, PartitionStatistics)>,
}

fn snapshot(metastore: &dyn Metastore) -> Snapshot {
    let mut databases = Vec::new();
    let mut tables = Vec::new();
    let mut partitions = Vec::new();
    let mut table_statistics = Vec::new();
    let mut partition_statistics = Vec::new();

    for db in metastore.get_all_databases().unwrap() {
        databases.push(metastore.get_database(&db).unwrap());
        for name in metastore.list_tables(&db).unwrap() {
            tables.push(metastore.get_table(&db, &name).unwrap());
            table_statistics.push(metastore.get_table_statistics(&db, &name).unwrap());
            let names = metastore.get_partition_names(&db, &name, None).unwrap();
            partitions.extend(metastore.get_partitions_by_names(&db, &name, &names).unwrap());
            let mut stats: Vec<_> = metastore
                .get_partition_statistics(&db, &name, &names)
                .unwrap()
                .into_iter()
                .collect();
            stats.sort_by(|a, b| a.0.cmp(&b.0));
            partition_statistics.extend(stats);
        }
    }
    Snapshot {
        databases,
        tables,
        partitions,
        table_statistics,
        partition_statistics,
    }
}

fn all_descriptors() -> Vec<CapabilityDescriptor> {
    (0u32..32)
        .map(|bits| {
            OperationCategory::iter()
                .enumerate()
                .fold(CapabilityDescriptor::read_only(), |desc, (i, category)| {
                    desc.with(category, bits & (1 << i) != 0)
                })
        })
        .collect()
}

#[test]
fn test_read_only_gate_rejects_create_table() {
    init_logging();
    let backend = fixture(CapabilityDescriptor::read_only());
    let gate = GatedMetastore::new(backend);

    let result = gate.create_table(&events_table("t1"));
    match result {
        Err(MetastoreError::UnsupportedOperation { operation, category, .. }) => {
            assert_eq!(operation, WriteOperation::CreateTable);
            assert_eq!(category, OperationCategory::Create);
            assert_eq!(operation.to_string(), "createTable");
            assert_eq!(category.to_string(), "CREATE");
        }
        other => panic!("expected UnsupportedOperation, got {:?}", other),
    }

    assert!(!gate.list_tables("default").unwrap().contains(&"t1".to_string()));
}

#[test]
fn test_denied_writes_have_no_side_effects() {
    for descriptor in all_descriptors() {
        for operation in WriteOperation::iter() {
            let gate = GatedMetastore::new(fixture(descriptor));
            let before = snapshot(&gate);

            let result = invoke(&gate, operation);

            if descriptor.permits(operation) {
                assert!(result.is_ok(), "{} should pass under {:?}: {:?}", operation, descriptor, result);
                assert_ne!(before, snapshot(&gate), "{} should change state", operation);
            } else {
                match result {
                    Err(MetastoreError::UnsupportedOperation {
                        operation: rejected,
                        category,
                        ..
                    }) => {
                        assert_eq!(rejected, operation);
                        assert_eq!(category, operation.category());
                    }
                    other => panic!("{} under {:?} returned {:?}", operation, descriptor, other),
                }
                assert_eq!(before, snapshot(&gate), "{} changed state while denied", operation);
            }
        }
    }
}

#[test]
fn test_limit_narrows_declared_capabilities() {
    let limit = CapabilityDescriptor::read_only().with(OperationCategory::Insert, true);
    let gate = GatedMetastore::with_limit(fixture(CapabilityDescriptor::full()), limit);

    assert_eq!(gate.capabilities(), limit);
    assert!(invoke(&gate, WriteOperation::AddPartitions).is_ok());
    assert!(invoke(&gate, WriteOperation::CreateTable).is_err());
    assert!(invoke(&gate, WriteOperation::DropPartition).is_err());

    // A limit never widens what the backend declares
    let gate = GatedMetastore::with_limit(
        fixture(CapabilityDescriptor::read_only()),
        CapabilityDescriptor::full(),
    );
    assert!(gate.capabilities().is_read_only());
}

/// Backend exposing only the read surface
struct ReadOnlyBackend;

impl Metastore for ReadOnlyBackend {
    fn backend_name(&self) -> &str {
        "read-only"
    }

    fn get_all_databases(&self) -> Result<Vec<String>> {
        Ok(vec!["default".to_string()])
    }

    fn get_database(&self, name: &str) -> Result<Option<Database>> {
        Ok((name == "default").then(|| Database::new("default")))
    }

    fn list_tables(&self, _database: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn get_all_views(&self, _database: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn get_table(&self, _database: &str, _table: &str) -> Result<Option<Table>> {
        Ok(None)
    }

    fn get_partition_names(
        &self,
        _database: &str,
        _table: &str,
        _filter: Option<&PartitionFilter>,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn get_partitions_by_names(
        &self,
        _database: &str,
        _table: &str,
        partition_names: &[String],
    ) -> Result<Vec<(String, Option<Partition>)>> {
        Ok(partition_names.iter().map(|n| (n.clone(), None)).collect())
    }

    fn get_table_statistics(&self, database: &str, table: &str) -> Result<PartitionStatistics> {
        Err(MetastoreError::NotFound(format!("{}.{}", database, table)))
    }

    fn get_partition_statistics(
        &self,
        _database: &str,
        _table: &str,
        _partition_names: &[String],
    ) -> Result<HashMap<String, PartitionStatistics>> {
        Ok(HashMap::new())
    }
}

#[test]
fn test_backend_without_writes() {
    let backend: Arc<dyn Metastore> = Arc::new(ReadOnlyBackend);
    assert!(backend.capabilities().is_read_only());

    // Default trait methods reject writes even without a gate
    for operation in WriteOperation::iter() {
        let error = invoke(backend.as_ref(), operation).unwrap_err();
        assert!(error.is_skippable());
        assert_eq!(error.unsupported_category(), Some(operation.category()));
    }

    let gate = GatedMetastore::with_limit(backend, CapabilityDescriptor::full());
    assert!(gate.capabilities().is_read_only());
    assert_eq!(gate.get_all_databases().unwrap(), vec!["default"]);
    assert!(gate.create_database(&Database::new("x")).is_err());
}

#[test]
fn test_gate_forwards_reads() {
    let backend = fixture(CapabilityDescriptor::read_only());
    let gate = GatedMetastore::new(backend.clone());

    assert_eq!(gate.backend_name(), "memory");
    assert_eq!(snapshot(&gate), snapshot(backend.as_ref()));
    assert_eq!(
        gate.get_partition_names("default", "t0", Some(&PartitionFilter::all(1))).unwrap(),
        vec!["ds=1"]
    );
}
