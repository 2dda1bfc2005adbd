// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Table-master client for the metastore layer
//!
//! This crate provides:
//! - The transport seam and native response shapes of the table master
//! - Conversion of those responses into the catalog model
//! - `RemoteMetastore`, a read-only `Metastore` over one master
//! - The process-wide registry holding one client per master address
//! - Opt-in retry of transient failures
//! - `MockTableMaster` for tests

pub mod proto;
pub mod transport;
pub mod convert;
pub mod retry;
pub mod registry;
pub mod adapter;
pub mod mock;

pub use adapter::RemoteMetastore;
pub use mock::MockTableMaster;
pub use registry::{ClientRegistry, TransportFactory};
pub use transport::{TableMasterTransport, TransportError, TransportResult};
