// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Error types for the metastore layer

use crate::capability::{OperationCategory, WriteOperation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetastoreError {
    /// A required entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Listing under a database that does not exist
    #[error("Database does not exist: {0}")]
    NoSuchDatabase(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Write operation rejected by the capability gate
    #[error("Unsupported operation {operation}: {reason}")]
    UnsupportedOperation {
        operation: WriteOperation,
        category: OperationCategory,
        reason: String,
    },

    /// Connectivity failure to the remote catalog; retryable
    #[error("Transient catalog error: {0}")]
    TransientCatalog(String),

    /// Malformed or unexpected remote response; never retried
    #[error("Catalog protocol error: {0}")]
    CatalogProtocol(String),

    #[error("Failed to enumerate splits for partition {partition}: {source}")]
    SplitEnumeration {
        partition: String,
        #[source]
        source: std::io::Error,
    },

    /// Partition excluded from a scan without failing it
    #[error("Partition {partition} skipped: {reason}")]
    PartitionSkipped { partition: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MetastoreError {
    /// Rejection of `operation` by a backend lacking its category
    pub fn unsupported(operation: WriteOperation) -> Self {
        let category = operation.category();
        Self::UnsupportedOperation {
            operation,
            category,
            reason: format!(
                "backend does not support {} operations",
                category.to_string().to_lowercase()
            ),
        }
    }

    /// Only connectivity failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientCatalog(_))
    }

    /// Conditions a caller may treat as a soft skip instead of a failure.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation { .. } | Self::PartitionSkipped { .. }
        )
    }

    /// Category of a rejected write, if this is a capability rejection
    pub fn unsupported_category(&self) -> Option<OperationCategory> {
        match self {
            Self::UnsupportedOperation { category, .. } => Some(*category),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MetastoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_reason() {
        let err = MetastoreError::unsupported(WriteOperation::CreateTable);
        assert_eq!(err.unsupported_category(), Some(OperationCategory::Create));
        assert_eq!(
            err.to_string(),
            "Unsupported operation createTable: backend does not support create operations"
        );
        assert!(err.is_skippable());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_classification() {
        assert!(MetastoreError::TransientCatalog("connection refused".into()).is_retryable());
        assert!(!MetastoreError::CatalogProtocol("bad layout".into()).is_retryable());
        assert!(!MetastoreError::NotFound("t1".into()).is_retryable());
        assert_eq!(MetastoreError::NotFound("t1".into()).unsupported_category(), None);
    }
}
