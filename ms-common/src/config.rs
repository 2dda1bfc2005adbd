// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Configuration management for the metastore layer
//!
//! Loaded once at startup and never re-read per call.

use crate::capability::CapabilityDescriptor;
use crate::constants;
use crate::error::MetastoreError;
use crate::types::SchemaCompatibility;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog master address (host:port)
    pub master_address: String,

    /// Security principal presented to the catalog service
    pub security_principal: Option<String>,

    /// Major version of the Hive schema exposed by the catalog
    pub hive_version_major: u32,

    /// Narrows the backend's declared capabilities; never widens them
    pub capabilities: Option<CapabilityDescriptor>,

    /// Maximum bytes covered by one split (e.g. "64MB")
    pub max_split_size: String,

    /// Worker threads used for parallel split enumeration
    pub split_loader_concurrency: usize,

    /// Partitions loaded per metastore round trip
    pub partition_batch_size: usize,

    /// Descend into sub-directories of partition locations
    pub recursive_directories: bool,

    /// Caller-controlled retry policy for transient catalog failures
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_attempts: usize,

    pub min_delay_ms: u64,

    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_RETRY_MAX_ATTEMPTS,
            min_delay_ms: constants::DEFAULT_RETRY_MIN_DELAY_MS,
            max_delay_ms: constants::DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_address: "localhost:19998".to_string(),
            security_principal: None,
            hive_version_major: 2,
            capabilities: None,
            max_split_size: constants::DEFAULT_MAX_SPLIT_SIZE.to_string(),
            split_loader_concurrency: num_cpus::get(),
            partition_batch_size: constants::DEFAULT_PARTITION_BATCH_SIZE,
            recursive_directories: false,
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| MetastoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        crate::utils::split_host_port(&self.master_address)?;
        if self.hive_version_major == 0 {
            return Err(MetastoreError::Config(format!(
                "Invalid hive_version_major: {}",
                self.hive_version_major
            )));
        }
        if self.max_split_size_bytes()? == 0 {
            return Err(MetastoreError::Config("max_split_size cannot be 0".to_string()));
        }
        if self.split_loader_concurrency == 0 {
            return Err(MetastoreError::Config(
                "split_loader_concurrency cannot be 0".to_string(),
            ));
        }
        if self.partition_batch_size == 0 {
            return Err(MetastoreError::Config(
                "partition_batch_size cannot be 0".to_string(),
            ));
        }
        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            return Err(MetastoreError::Config(
                "retry.min_delay_ms exceeds retry.max_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_split_size_bytes(&self) -> crate::Result<u64> {
        crate::utils::parse_size(&self.max_split_size).map_err(MetastoreError::Config)
    }

    pub fn compatibility(&self) -> SchemaCompatibility {
        SchemaCompatibility::from_hive_version_major(self.hive_version_major)
    }

    /// Capabilities left after applying the configured override
    pub fn effective_capabilities(&self, declared: CapabilityDescriptor) -> CapabilityDescriptor {
        match &self.capabilities {
            Some(limit) => declared.intersect(limit),
            None => declared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_split_size_bytes().unwrap(), 64 * 1024 * 1024);
        assert_eq!(config.compatibility(), SchemaCompatibility::Modern);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            master_address = "alluxio-master:19998"
            security_principal = "presto"
            hive_version_major = 1
            max_split_size = "32MB"

            [capabilities]
            can_insert = true

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.master_address, "alluxio-master:19998");
        assert_eq!(config.security_principal.as_deref(), Some("presto"));
        assert_eq!(config.compatibility(), SchemaCompatibility::Legacy);
        assert_eq!(config.max_split_size_bytes().unwrap(), 32 * 1024 * 1024);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.min_delay_ms, constants::DEFAULT_RETRY_MIN_DELAY_MS);

        let effective = config.effective_capabilities(CapabilityDescriptor::full());
        assert!(effective.can_insert);
        assert!(!effective.can_create);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.hive_version_major = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.master_address = "no-port".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_split_size = "0".to_string();
        assert!(config.validate().is_err());

        assert!(Config::from_toml_str("hive_version_major = \"two\"").is_err());
    }

    #[test]
    fn test_override_never_widens() {
        let config = Config {
            capabilities: Some(CapabilityDescriptor::full()),
            ..Config::default()
        };
        let effective = config.effective_capabilities(CapabilityDescriptor::read_only());
        assert!(effective.is_read_only());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "master_address = \"127.0.0.1:19998\"").unwrap();
        writeln!(file, "hive_version_major = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.master_address, "127.0.0.1:19998");
        assert_eq!(config.hive_version_major, 3);
    }
}
