// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Split planning for metastore tables
//!
//! This crate provides:
//! - The `Split` unit of scan work
//! - `FileLister`, the storage listing seam, with local and static listers
//! - `SplitGenerator`, which resolves partitions and cuts files into splits

pub mod split;
pub mod file_lister;
pub mod split_generator;

pub use file_lister::{FileEntry, FileLister, LocalFileLister, StaticFileLister};
pub use split::{splits_to_json, PartitionKey, Split};
pub use split_generator::{SplitBatch, SplitConfig, SplitGenerator, SplitSource};
