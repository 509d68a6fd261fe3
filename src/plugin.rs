//! Download interception plugin / 下载拦截插件
//!
//! On every pre-file-download event the URL scheme is checked against the
//! configured wrappers. The first matching event builds a storage client for
//! that scheme and installs it as a stream wrapper; later events for the same
//! scheme reuse it. Everything else is left to the host's HTTP download.
//! 每个协议只创建一次客户端，其余下载交给宿主默认处理。

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{build_plugin_config, HostConfig, PluginConfig, CONFIG_KEY};
use crate::credentials::map_any_credentials;
use crate::event::{
    EventSubscriber, Plugin, PluginEvent, PreFileDownloadEvent, PreFileDownloadHandler, Subscription,
};
use crate::storage::{ClientRegistry, StorageClientFactory};
use crate::stream::StreamWrappers;
use crate::utils::url_scheme;

pub struct SushiPlugin {
    /// Raw `aws-composer` block captured on activation
    source: Option<Value>,
    config: OnceCell<PluginConfig>,
    clients: ClientRegistry,
    runtime_loaded: OnceCell<()>,
    factory: Arc<dyn StorageClientFactory>,
    wrappers: Arc<StreamWrappers>,
}

impl SushiPlugin {
    pub fn new(factory: Arc<dyn StorageClientFactory>, wrappers: Arc<StreamWrappers>) -> Self {
        Self {
            source: None,
            config: OnceCell::new(),
            clients: ClientRegistry::new(),
            runtime_loaded: OnceCell::new(),
            factory,
            wrappers,
        }
    }

    /// Plugin backed by the S3 driver / 使用S3驱动的插件
    pub fn with_s3(wrappers: Arc<StreamWrappers>) -> Self {
        Self::new(crate::drivers::default_factory(), wrappers)
    }

    /// Resolved per-protocol config, computed once / 解析后的配置（只计算一次）
    ///
    /// Calling this before `activate` caches an empty config.
    pub fn get_config(&self) -> &PluginConfig {
        self.config
            .get_or_init(|| build_plugin_config(self.source.as_ref()))
    }

    /// Protocols compare case-insensitively / 协议名不区分大小写
    pub fn should_create_client(&self, protocol: &str) -> bool {
        let protocol = protocol.to_ascii_lowercase();
        !self.clients.contains(&protocol) && self.get_config().contains_key(&protocol)
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn wrappers(&self) -> &Arc<StreamWrappers> {
        &self.wrappers
    }

    fn load_runtime_once(&self) -> Result<()> {
        self.runtime_loaded.get_or_try_init(|| {
            tracing::debug!("Loading {} runtime", self.factory.client_type());
            self.factory.load_runtime()
        })?;
        Ok(())
    }

    fn register_client(&self, protocol: &str) -> Result<()> {
        let (client, created) = self.clients.get_or_create(protocol, || {
            self.load_runtime_once()?;

            let options = self.get_config().get(protocol).cloned().unwrap_or_default();
            let options = map_any_credentials(options).merged_over(&self.factory.baseline_options());

            self.factory.create_client(options)
        })?;

        if created {
            self.wrappers.register(client, protocol);
        }
        Ok(())
    }
}

impl Plugin for SushiPlugin {
    fn activate(&mut self, host: &dyn HostConfig) {
        self.source = if host.has(CONFIG_KEY) {
            host.get(CONFIG_KEY)
        } else {
            None
        };
        tracing::info!("Plugin activated (configured: {})", self.source.is_some());
    }
}

impl EventSubscriber for SushiPlugin {
    fn subscribed_events() -> Vec<Subscription> {
        vec![Subscription {
            event: PluginEvent::PreFileDownload,
            handler: "on_pre_file_download",
            priority: 0,
        }]
    }
}

impl PreFileDownloadHandler for SushiPlugin {
    fn on_pre_file_download(&self, event: &PreFileDownloadEvent) -> Result<()> {
        let Some(protocol) = url_scheme(event.processed_url()) else {
            return Ok(());
        };

        if !self.should_create_client(&protocol) {
            return Ok(());
        }

        self.register_client(&protocol)
    }
}
