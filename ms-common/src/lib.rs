// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Common foundations for the metastore layer
//!
//! This crate provides:
//! - Error types and result handling
//! - Configuration management
//! - Capability descriptors and the write-operation taxonomy
//! - Hive column types and schema-compatibility modes
//! - Utility functions
//! - Constants

pub mod error;
pub mod config;
pub mod capability;
pub mod types;
pub mod utils;
pub mod constants;

pub use error::{MetastoreError, Result};
pub use config::{Config, RetryConfig};
pub use capability::{CapabilityDescriptor, OperationCategory, WriteOperation};
pub use types::{HiveType, SchemaCompatibility};
