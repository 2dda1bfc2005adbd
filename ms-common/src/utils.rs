// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Utility functions

use crate::error::{MetastoreError, Result};

/// Parse size string (e.g., "10GB", "512MB") to bytes
pub fn parse_size(size_str: &str) -> std::result::Result<u64, String> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, unit) = if let Some(pos) = size_str.find(|c: char| !c.is_numeric() && c != '.') {
        (&size_str[..pos], size_str[pos..].trim())
    } else {
        (size_str.as_str(), "")
    };

    let number: f64 = num_str.parse()
        .map_err(|e| format!("Invalid number: {}", e))?;

    let multiplier: u64 = match unit {
        "" | "B" => 1,
        "KB" | "K" => 1024,
        "MB" | "M" => 1024 * 1024,
        "GB" | "G" => 1024 * 1024 * 1024,
        "TB" | "T" => 1024 * 1024 * 1024 * 1024,
        _ => return Err(format!("Unknown unit: {}", unit)),
    };

    Ok((number * multiplier as f64) as u64)
}

/// Database and table names are case-insensitive
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Split a `host:port` address
pub fn split_host_port(address: &str) -> Result<(String, u16)> {
    let invalid = || MetastoreError::Config(format!("Invalid address '{}', expected host:port", address));

    let (host, port) = address.trim().rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    let port: u16 = port.parse().map_err(|_| invalid())?;
    if port == 0 {
        return Err(invalid());
    }
    Ok((host.to_string(), port))
}
