//! Credential mapping / 凭证映射
//!
//! Turns a `credentials: {key, secret}` block of the wrapper options into a
//! credential provider. Malformed blocks are dropped so the storage client
//! falls back to its default credential chain.
//! 凭证块不完整时直接丢弃，存储客户端回退到默认凭证链。

use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::WrapperOptions;

pub const CREDENTIALS_KEY: &str = "credentials";

/// Static access key / secret key pair / 静态访问密钥对
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

type ResolveFn = Arc<dyn Fn() -> Result<Credentials> + Send + Sync>;

/// Yields credentials to a storage client, resolved on every request
/// 为存储客户端提供凭证，每次请求时解析
#[derive(Clone)]
pub struct CredentialProvider {
    resolve: ResolveFn,
}

impl CredentialProvider {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn() -> Result<Credentials> + Send + Sync + 'static,
    {
        Self {
            resolve: Arc::new(resolve),
        }
    }

    /// Provider that always yields the given pair / 始终返回给定凭证的提供者
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self::new(move || Ok(credentials.clone()))
    }

    pub fn resolve(&self) -> Result<Credentials> {
        (self.resolve)()
    }
}

impl fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialProvider")
    }
}

/// Options handed to a storage client factory / 交给存储客户端工厂的选项
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Opaque options (never contains `credentials`) / 透传选项
    pub options: WrapperOptions,
    pub credentials: Option<CredentialProvider>,
}

impl ClientOptions {
    /// Fill keys missing from the options with the baseline / 用基线补全缺失的键
    pub fn merged_over(mut self, baseline: &WrapperOptions) -> Self {
        for (k, v) in baseline {
            if !self.options.contains_key(k) {
                self.options.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }
}

/// Build a provider from a credentials block / 根据凭证块构建凭证提供者
///
/// Needs both `key` and `secret` as strings, otherwise None.
pub fn build_client_credentials(credentials: &Value) -> Option<CredentialProvider> {
    let key = credentials.get("key").and_then(|v| v.as_str())?;
    let secret = credentials.get("secret").and_then(|v| v.as_str())?;
    Some(CredentialProvider::from_credentials(Credentials::new(key, secret)))
}

/// Map any credentials block into a provider / 将凭证块映射为凭证提供者
pub fn map_any_credentials(mut options: WrapperOptions) -> ClientOptions {
    let Some(raw) = options.remove(CREDENTIALS_KEY) else {
        return ClientOptions {
            options,
            credentials: None,
        };
    };

    let credentials = build_client_credentials(&raw);
    if credentials.is_none() {
        tracing::warn!("Credentials block needs both key and secret, falling back to default chain");
    }

    ClientOptions {
        options,
        credentials,
    }
}
