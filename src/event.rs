//! Host plugin API / 宿主插件接口
//!
//! The host activates plugins with its configuration and calls the
//! subscribed handlers serially for each event.

use anyhow::Result;
use std::fmt;

use crate::config::HostConfig;

/// Events a plugin can subscribe to / 插件可订阅的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginEvent {
    /// Fired before every file download / 每次下载文件前触发
    PreFileDownload,
}

impl PluginEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginEvent::PreFileDownload => "pre-file-download",
        }
    }
}

impl fmt::Display for PluginEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event subscription with priority (higher runs first) / 带优先级的事件订阅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub event: PluginEvent,
    pub handler: &'static str,
    pub priority: i32,
}

#[derive(Debug, Clone)]
pub struct PreFileDownloadEvent {
    processed_url: String,
}

impl PreFileDownloadEvent {
    pub fn new(processed_url: impl Into<String>) -> Self {
        Self {
            processed_url: processed_url.into(),
        }
    }

    /// URL after the host applied its rewrites / 宿主处理后的URL
    pub fn processed_url(&self) -> &str {
        &self.processed_url
    }
}

pub trait Plugin {
    /// Activate the plugin / 激活插件
    fn activate(&mut self, host: &dyn HostConfig);
}

pub trait EventSubscriber {
    fn subscribed_events() -> Vec<Subscription>
    where
        Self: Sized;
}

/// Handler for [`PluginEvent::PreFileDownload`]
pub trait PreFileDownloadHandler {
    fn on_pre_file_download(&self, event: &PreFileDownloadEvent) -> Result<()>;
}
