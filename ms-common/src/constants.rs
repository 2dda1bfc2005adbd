// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Constants used throughout the metastore layer

/// Partition value stored for null or empty partition keys
pub const HIVE_DEFAULT_PARTITION_VALUE: &str = "__HIVE_DEFAULT_PARTITION__";

/// Name of the implicit partition of an unpartitioned table
pub const UNPARTITIONED_PARTITION_NAME: &str = "<UNPARTITIONED>";

/// Legacy protect-mode parameter key
pub const PROTECT_MODE_KEY: &str = "PROTECT_MODE";

/// Protect-mode flag marking a partition offline
pub const PROTECT_MODE_OFFLINE: &str = "OFFLINE";

/// Engine-managed offline marker parameter
pub const PRESTO_OFFLINE_KEY: &str = "presto_offline";

/// First Hive major version without `ALTER TABLE .. ENABLE OFFLINE`
pub const OFFLINE_PARTITIONS_REMOVED_IN_MAJOR: u32 = 2;

/// Basic statistics parameter keys
pub const NUM_FILES: &str = "numFiles";
pub const NUM_ROWS: &str = "numRows";
pub const RAW_DATA_SIZE: &str = "rawDataSize";
pub const TOTAL_SIZE: &str = "totalSize";

/// Table comment parameter key
pub const TABLE_COMMENT: &str = "comment";

/// Maximum database name length
pub const MAX_DATABASE_NAME_LENGTH: usize = 128;

/// Maximum table name length
pub const MAX_TABLE_NAME_LENGTH: usize = 128;

/// Default maximum bytes covered by one split
pub const DEFAULT_MAX_SPLIT_SIZE: &str = "64MB";

/// Default number of partitions loaded per metastore round trip
pub const DEFAULT_PARTITION_BATCH_SIZE: usize = 100;

/// Default retry policy for transient catalog failures
pub const DEFAULT_RETRY_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_MIN_DELAY_MS: u64 = 100;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 2000;
