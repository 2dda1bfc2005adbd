// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Database definition

use ms_common::utils::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of principal owning a database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalType {
    User,
    Role,
}

/// Database metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name (lower case)
    pub name: String,

    /// Default location for tables of this database
    pub location: Option<String>,

    pub owner_name: Option<String>,

    pub owner_type: Option<PrincipalType>,

    pub comment: Option<String>,

    pub parameters: HashMap<String, String>,
}

impl Database {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            location: None,
            owner_name: None,
            owner_type: None,
            comment: None,
            parameters: HashMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_owner(mut self, owner_name: impl Into<String>, owner_type: PrincipalType) -> Self {
        self.owner_name = Some(owner_name.into());
        self.owner_type = Some(owner_type);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
