// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Common type definitions

use crate::error::{MetastoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hive column type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiveType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Date,
    Timestamp,
    String,
    Char { len: u32 },
    Varchar { len: u32 },
    Binary,
    Array(Box<HiveType>),
    Map { key: Box<HiveType>, value: Box<HiveType> },
    Struct { fields: Vec<(String, HiveType)> },
}

/// Hive's precision and scale for a bare `decimal`
const DEFAULT_DECIMAL_PRECISION: u8 = 10;
const DEFAULT_DECIMAL_SCALE: u8 = 0;
const MAX_DECIMAL_PRECISION: u8 = 38;

impl HiveType {
    /// Parse a Hive type signature such as `map<string,array<int>>`
    pub fn parse(signature: &str) -> Result<Self> {
        let normalized = signature.trim().to_lowercase();
        let mut parser = TypeParser { input: &normalized, pos: 0 };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != normalized.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(parsed)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Map { .. } | Self::Struct { .. })
    }
}

impl FromStr for HiveType {
    type Err = MetastoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for HiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::TinyInt => write!(f, "tinyint"),
            Self::SmallInt => write!(f, "smallint"),
            Self::Int => write!(f, "int"),
            Self::BigInt => write!(f, "bigint"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            Self::Date => write!(f, "date"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::String => write!(f, "string"),
            Self::Char { len } => write!(f, "char({})", len),
            Self::Varchar { len } => write!(f, "varchar({})", len),
            Self::Binary => write!(f, "binary"),
            Self::Array(element) => write!(f, "array<{}>", element),
            Self::Map { key, value } => write!(f, "map<{},{}>", key, value),
            Self::Struct { fields } => {
                write!(f, "struct<")?;
                for (i, (name, field_type)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, field_type)?;
                }
                write!(f, ">")
            }
        }
    }
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn error(&self, message: &str) -> MetastoreError {
        MetastoreError::InvalidArgument(format!(
            "Invalid Hive type '{}' at position {}: {}",
            self.input, self.pos, message
        ))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{}'", expected))),
        }
    }

    fn consume_if(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        let input = self.input;
        Ok(&input[start..self.pos])
    }

    fn number(&mut self) -> Result<u32> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| self.error("expected number"))
    }

    fn parse_type(&mut self) -> Result<HiveType> {
        let name = self.identifier()?;
        let parsed = match name {
            "boolean" => HiveType::Boolean,
            "tinyint" => HiveType::TinyInt,
            "smallint" => HiveType::SmallInt,
            "int" | "integer" => HiveType::Int,
            "bigint" => HiveType::BigInt,
            "float" => HiveType::Float,
            "double" => HiveType::Double,
            "date" => HiveType::Date,
            "timestamp" => HiveType::Timestamp,
            "string" => HiveType::String,
            "binary" => HiveType::Binary,
            "decimal" => {
                let (mut precision, mut scale) = (DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE);
                if self.consume_if('(') {
                    precision = self.bounded(MAX_DECIMAL_PRECISION as u32)? as u8;
                    scale = if self.consume_if(',') { self.bounded(precision as u32)? as u8 } else { 0 };
                    self.expect(')')?;
                }
                if precision == 0 {
                    return Err(self.error("decimal precision must be positive"));
                }
                HiveType::Decimal { precision, scale }
            }
            "char" | "varchar" => {
                self.expect('(')?;
                let len = self.number()?;
                self.expect(')')?;
                if len == 0 {
                    return Err(self.error("length must be positive"));
                }
                if name == "char" {
                    HiveType::Char { len }
                } else {
                    HiveType::Varchar { len }
                }
            }
            "array" => {
                self.expect('<')?;
                let element = self.parse_type()?;
                self.expect('>')?;
                HiveType::Array(Box::new(element))
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                HiveType::Map { key: Box::new(key), value: Box::new(value) }
            }
            "struct" => {
                self.expect('<')?;
                let mut fields = Vec::new();
                loop {
                    let field_name = self.identifier()?.to_string();
                    self.expect(':')?;
                    fields.push((field_name, self.parse_type()?));
                    if !self.consume_if(',') {
                        break;
                    }
                }
                self.expect('>')?;
                HiveType::Struct { fields }
            }
            other => return Err(self.error(&format!("unknown type '{}'", other))),
        };
        Ok(parsed)
    }

    fn bounded(&mut self, max: u32) -> Result<u32> {
        let value = self.number()?;
        if value > max {
            return Err(self.error(&format!("{} exceeds maximum {}", value, max)));
        }
        Ok(value)
    }
}

/// Catalog schema generation the engine is talking to
///
/// Offline partitions only exist in the legacy generation; later catalog
/// versions removed `ALTER TABLE .. ENABLE OFFLINE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaCompatibility {
    /// Hive 1.x schema, offline partitions are readable
    Legacy,
    /// Hive 2.0 and later, offline partitions are skipped
    Modern,
}

impl SchemaCompatibility {
    pub fn from_hive_version_major(major: u32) -> Self {
        if major >= crate::constants::OFFLINE_PARTITIONS_REMOVED_IN_MAJOR {
            Self::Modern
        } else {
            Self::Legacy
        }
    }

    pub fn offline_partitions_removed(&self) -> bool {
        matches!(self, Self::Modern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(HiveType::parse("bigint").unwrap(), HiveType::BigInt);
        assert_eq!(HiveType::parse(" INT ").unwrap(), HiveType::Int);
        assert_eq!(HiveType::parse("varchar(255)").unwrap(), HiveType::Varchar { len: 255 });
        assert_eq!(
            HiveType::parse("decimal").unwrap(),
            HiveType::Decimal { precision: 10, scale: 0 }
        );
        assert_eq!(
            HiveType::parse("decimal(12, 3)").unwrap(),
            HiveType::Decimal { precision: 12, scale: 3 }
        );
    }

    #[test]
    fn test_parse_nested() {
        let parsed = HiveType::parse("map<string,array<struct<a:int,b:varchar(10)>>>").unwrap();
        assert_eq!(parsed.to_string(), "map<string,array<struct<a:int,b:varchar(10)>>>");
        assert!(!parsed.is_primitive());
    }

    #[test]
    fn test_parse_errors() {
        assert!(HiveType::parse("").is_err());
        assert!(HiveType::parse("uuid").is_err());
        assert!(HiveType::parse("array<int").is_err());
        assert!(HiveType::parse("varchar").is_err());
        assert!(HiveType::parse("decimal(50,2)").is_err());
        assert!(HiveType::parse("decimal(5,7)").is_err());
        assert!(HiveType::parse("int int").is_err());
    }

    #[test]
    fn test_schema_compatibility() {
        assert_eq!(SchemaCompatibility::from_hive_version_major(1), SchemaCompatibility::Legacy);
        assert_eq!(SchemaCompatibility::from_hive_version_major(2), SchemaCompatibility::Modern);
        assert_eq!(SchemaCompatibility::from_hive_version_major(3), SchemaCompatibility::Modern);
        assert!(!SchemaCompatibility::Legacy.offline_partitions_removed());
    }
}
