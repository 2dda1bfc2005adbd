// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Process-wide table-master clients
//!
//! Exactly one transport exists per master address. The first caller for an
//! address connects; every later caller shares that client until the process
//! exits or the address is explicitly released.

use crate::transport::TableMasterTransport;
use dashmap::DashMap;
use lazy_static::lazy_static;
use ms_common::utils::split_host_port;
use ms_common::Result;
use std::sync::Arc;
use tracing::info;

/// Opens a transport to one master address
pub trait TransportFactory: Send + Sync {
    fn connect(&self, address: &str, principal: Option<&str>) -> Result<Arc<dyn TableMasterTransport>>;
}

impl<F> TransportFactory for F
where
    F: Fn(&str, Option<&str>) -> Result<Arc<dyn TableMasterTransport>> + Send + Sync,
{
    fn connect(&self, address: &str, principal: Option<&str>) -> Result<Arc<dyn TableMasterTransport>> {
        self(address, principal)
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: ClientRegistry = ClientRegistry::new();
}

pub struct ClientRegistry {
    /// Normalized `host:port` -> client
    clients: DashMap<String, Arc<dyn TableMasterTransport>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    pub fn global() -> &'static ClientRegistry {
        &GLOBAL_REGISTRY
    }

    fn registry_key(address: &str) -> Result<String> {
        let (host, port) = split_host_port(address)?;
        Ok(format!("{}:{}", host.to_lowercase(), port))
    }

    /// Shared client for `address`, connecting through `factory` on first use
    pub fn get_or_connect(
        &self,
        address: &str,
        principal: Option<&str>,
        factory: &dyn TransportFactory,
    ) -> Result<Arc<dyn TableMasterTransport>> {
        let key = Self::registry_key(address)?;
        if let Some(client) = self.clients.get(&key) {
            return Ok(client.value().clone());
        }
        // Connect runs under the shard lock so each address connects once;
        // lookups of other addresses on the same shard wait for it
        let client = self.clients.entry(key.clone()).or_try_insert_with(|| {
            info!("Connecting to table master at {}", key);
            factory.connect(&key, principal)
        })?;
        Ok(client.value().clone())
    }

    pub fn get(&self, address: &str) -> Option<Arc<dyn TableMasterTransport>> {
        let key = Self::registry_key(address).ok()?;
        self.clients.get(&key).map(|client| client.value().clone())
    }

    /// Drop the registry's handle; callers still holding the client keep it alive
    pub fn release(&self, address: &str) -> Option<Arc<dyn TableMasterTransport>> {
        let key = Self::registry_key(address).ok()?;
        let removed = self.clients.remove(&key).map(|(_, client)| client);
        if removed.is_some() {
            info!("Released table master client for {}", key);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
