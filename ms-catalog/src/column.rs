// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Column definition

use ms_common::HiveType;
use serde::{Deserialize, Serialize};

/// Column metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Data type
    pub column_type: HiveType,

    /// Comment
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: HiveType) -> Self {
        Self {
            name: name.into(),
            column_type,
            comment: None,
        }
    }

    /// Set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
