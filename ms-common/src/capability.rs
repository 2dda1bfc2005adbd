// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Capability descriptors and the write-operation taxonomy
//!
//! Every write operation on a metastore belongs to exactly one
//! [`OperationCategory`]. A backend declares the categories it supports with a
//! [`CapabilityDescriptor`]; anything not declared is unsupported.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Coarse class of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum OperationCategory {
    Create,
    Insert,
    Update,
    Delete,
    Alter,
}

/// Write operations routed through the capability gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum WriteOperation {
    CreateDatabase,
    DropDatabase,
    RenameDatabase,
    CreateTable,
    DropTable,
    AlterTable,
    RenameTable,
    CommentTable,
    AddColumn,
    RenameColumn,
    DropColumn,
    AddPartitions,
    DropPartition,
    AlterPartition,
    UpdateTableStatistics,
    UpdatePartitionStatistics,
}

impl WriteOperation {
    pub fn category(self) -> OperationCategory {
        match self {
            Self::CreateDatabase | Self::CreateTable => OperationCategory::Create,
            Self::AddPartitions => OperationCategory::Insert,
            Self::AlterPartition
            | Self::UpdateTableStatistics
            | Self::UpdatePartitionStatistics => OperationCategory::Update,
            Self::DropDatabase | Self::DropTable | Self::DropPartition => OperationCategory::Delete,
            Self::RenameDatabase
            | Self::AlterTable
            | Self::RenameTable
            | Self::CommentTable
            | Self::AddColumn
            | Self::RenameColumn
            | Self::DropColumn => OperationCategory::Alter,
        }
    }
}

/// Declared write capabilities of one backend instance
///
/// The default descriptor is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityDescriptor {
    pub can_create: bool,
    pub can_insert: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub can_alter: bool,
}

impl CapabilityDescriptor {
    pub const fn read_only() -> Self {
        Self {
            can_create: false,
            can_insert: false,
            can_update: false,
            can_delete: false,
            can_alter: false,
        }
    }

    pub const fn full() -> Self {
        Self {
            can_create: true,
            can_insert: true,
            can_update: true,
            can_delete: true,
            can_alter: true,
        }
    }

    /// Builder-style toggle of one category
    pub fn with(mut self, category: OperationCategory, allowed: bool) -> Self {
        match category {
            OperationCategory::Create => self.can_create = allowed,
            OperationCategory::Insert => self.can_insert = allowed,
            OperationCategory::Update => self.can_update = allowed,
            OperationCategory::Delete => self.can_delete = allowed,
            OperationCategory::Alter => self.can_alter = allowed,
        }
        self
    }

    pub fn allows(&self, category: OperationCategory) -> bool {
        match category {
            OperationCategory::Create => self.can_create,
            OperationCategory::Insert => self.can_insert,
            OperationCategory::Update => self.can_update,
            OperationCategory::Delete => self.can_delete,
            OperationCategory::Alter => self.can_alter,
        }
    }

    pub fn permits(&self, operation: WriteOperation) -> bool {
        self.allows(operation.category())
    }

    pub fn is_read_only(&self) -> bool {
        *self == Self::read_only()
    }

    /// Categories allowed by both descriptors
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            can_create: self.can_create && other.can_create,
            can_insert: self.can_insert && other.can_insert,
            can_update: self.can_update && other.can_update,
            can_delete: self.can_delete && other.can_delete,
            can_alter: self.can_alter && other.can_alter,
        }
    }
}
