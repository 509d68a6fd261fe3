//! Plugin configuration module / 插件配置模块
//!
//! Resolves the `aws-composer` block of the host project configuration
//! into per-protocol wrapper options.
//! 将宿主项目配置中的 `aws-composer` 配置块解析为按协议划分的包装器选项。

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Key of the plugin block inside the host config / 宿主配置中插件配置块的键名
pub const CONFIG_KEY: &str = "aws-composer";

/// Options passed to storage client construction / 传给存储客户端的选项
pub type WrapperOptions = Map<String, Value>;

/// Protocol name -> resolved options / 协议名 -> 解析后的选项
pub type PluginConfig = HashMap<String, WrapperOptions>;

/// Read access to the host project configuration / 宿主项目配置的只读访问
pub trait HostConfig: Send + Sync {
    fn has(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<Value>;
}

/// Host configuration backed by the `config` object of a JSON manifest
/// 基于 JSON 清单中 `config` 对象的宿主配置
#[derive(Debug, Clone, Default)]
pub struct JsonHostConfig {
    values: Map<String, Value>,
}

impl JsonHostConfig {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build from a whole manifest value (uses its `config` object) / 从完整清单构建
    pub fn from_manifest(manifest: &Value) -> Self {
        let values = manifest
            .get("config")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        Self { values }
    }

    /// Load manifest from file / 从文件加载清单
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read manifest {:?}: {}", path, e))?;
        let manifest: Value = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse manifest {:?}: {}", path, e))?;

        tracing::info!("Loaded host configuration from {:?}", path);
        Ok(Self::from_manifest(&manifest))
    }
}

impl HostConfig for JsonHostConfig {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// Non-empty object or nothing / 非空对象，否则视为空
fn non_empty_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(|v| v.as_object()).filter(|m| !m.is_empty())
}

fn merged(defaults: &WrapperOptions, overrides: Option<&WrapperOptions>) -> WrapperOptions {
    let mut options = defaults.clone();
    if let Some(overrides) = overrides {
        for (k, v) in overrides {
            options.insert(k.clone(), v.clone());
        }
    }
    options
}

/// Build plugin config from the `aws-composer` block / 根据配置块构建插件配置
///
/// Override keys win over `defaults` (shallow merge). Protocol names are
/// lowercased to match URL schemes. A missing block yields an empty config.
pub fn build_plugin_config(source: Option<&Value>) -> PluginConfig {
    let mut config = PluginConfig::new();
    let Some(source) = source else {
        return config;
    };

    let empty = WrapperOptions::new();
    let defaults = non_empty_object(source.get("defaults")).unwrap_or(&empty);

    match source.get("wrappers") {
        Some(Value::Array(names)) => {
            for entry in names {
                match entry.as_str() {
                    Some(protocol) => {
                        config.insert(protocol.to_ascii_lowercase(), defaults.clone());
                    }
                    None => tracing::warn!("Ignoring non-string wrapper entry: {}", entry),
                }
            }
        }
        Some(Value::Object(wrappers)) => {
            for (protocol, value) in wrappers {
                match value {
                    Value::Object(overrides) => {
                        config.insert(protocol.to_ascii_lowercase(), merged(defaults, Some(overrides)));
                    }
                    Value::Null | Value::Bool(false) => {
                        tracing::debug!("Wrapper disabled: {}", protocol);
                    }
                    _ => {
                        config.insert(protocol.to_ascii_lowercase(), merged(defaults, None));
                    }
                }
            }
        }
        Some(other) if !other.is_null() => {
            tracing::warn!("Ignoring malformed wrappers block: {}", other);
        }
        _ => {}
    }

    tracing::debug!("Plugin config resolved for protocols: {:?}", config.keys().collect::<Vec<_>>());
    config
}
