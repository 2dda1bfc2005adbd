// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Caller-controlled retry of transient catalog failures

use backon::{BlockingRetryable, ExponentialBuilder};
use ms_common::{MetastoreError, Result, RetryConfig};
use std::time::Duration;
use tracing::warn;

pub fn backoff_policy(config: &RetryConfig) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(config.min_delay_ms))
        .with_max_delay(Duration::from_millis(config.max_delay_ms))
        .with_max_times(config.max_attempts)
}

/// Run `call`, retrying only `TransientCatalog` failures under `config`
///
/// Without a config the call runs exactly once.
pub fn with_retry<T>(
    config: Option<&RetryConfig>,
    operation: &str,
    call: impl FnMut() -> Result<T>,
) -> Result<T> {
    let Some(config) = config else {
        let mut call = call;
        return call();
    };

    call.retry(backoff_policy(config))
        .sleep(std::thread::sleep)
        .when(MetastoreError::is_retryable)
        .notify(|err: &MetastoreError, dur: Duration| {
            warn!(
                error = %err,
                operation,
                "Catalog call failed. Retrying in {:.1}s",
                dur.as_secs_f32()
            );
        })
        .call()
}
