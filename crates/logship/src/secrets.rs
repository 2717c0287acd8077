// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;
use std::{future::Future, pin::Pin};

use crate::error::SecretError;

/// Source of secrets such as the shipping token.
///
/// Looked up once per delivery, so implementations may rotate values freely.
#[async_trait]
pub trait SecretsManager: Send + Sync {
    async fn obtain(&self, key: &str) -> Result<String, SecretError>;
}

/// Secrets kept in memory, mostly useful for tests and static deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretsManager {
    secrets: HashMap<String, String>,
}

impl StaticSecretsManager {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    pub fn with_secret(key: &str, value: &str) -> Self {
        Self::new(HashMap::from([(key.to_string(), value.to_string())]))
    }
}

#[async_trait]
impl SecretsManager for StaticSecretsManager {
    async fn obtain(&self, key: &str) -> Result<String, SecretError> {
        self.secrets
            .get(key)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(key.to_string()))
    }
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretsManager;

#[async_trait]
impl SecretsManager for EnvSecretsManager {
    async fn obtain(&self, key: &str) -> Result<String, SecretError> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(SecretError::NotFound(key.to_string())),
        }
    }
}

pub type SecretResolverFn = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<String, SecretError>> + Send>>
        + Send
        + Sync,
>;

/// Defers every lookup to an async closure, e.g. a call into a cloud secret store.
#[derive(Clone)]
pub struct ResolverSecretsManager {
    resolver_fn: SecretResolverFn,
}

impl ResolverSecretsManager {
    pub fn new(resolver_fn: SecretResolverFn) -> Self {
        Self { resolver_fn }
    }
}

#[async_trait]
impl SecretsManager for ResolverSecretsManager {
    async fn obtain(&self, key: &str) -> Result<String, SecretError> {
        (self.resolver_fn)(key.to_string()).await
    }
}

impl Debug for ResolverSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResolverSecretsManager")
    }
}
