use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::ops::Range;
use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::config::WrapperOptions;
use crate::credentials::ClientOptions;

/// Object metadata / 对象元信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStat {
    pub size: u64,
    pub modified: Option<String>,
}

/// Storage client interface (read side only) / 存储客户端接口（只读）
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Client name / 客户端名称
    fn name(&self) -> &str;

    /// Open object reader (supports range reading) / 打开对象读取器
    async fn open_reader(
        &self,
        bucket: &str,
        key: &str,
        range: Option<Range<u64>>,
    ) -> Result<Box<dyn AsyncRead + Unpin + Send>>;

    /// Object metadata, None if the object does not exist / 获取对象元信息
    async fn stat(&self, bucket: &str, key: &str) -> Result<Option<ObjectStat>>;
}

pub type ClientHandle = Arc<dyn StorageClient>;

/// Storage client factory trait / 存储客户端工厂 trait
pub trait StorageClientFactory: Send + Sync {
    /// Client type name / 客户端类型名称
    fn client_type(&self) -> &'static str;

    /// Load runtime glue the SDK needs before the first client is built.
    /// Called at most once per plugin.
    fn load_runtime(&self) -> Result<()> {
        Ok(())
    }

    /// Options every client starts from / 所有客户端的基线选项
    fn baseline_options(&self) -> WrapperOptions {
        let mut baseline = WrapperOptions::new();
        baseline.insert("version".to_string(), json!("latest"));
        baseline
    }

    /// Create client instance / 创建客户端实例
    fn create_client(&self, options: ClientOptions) -> Result<Box<dyn StorageClient>>;
}

pub mod manager;

pub use manager::ClientRegistry;

#[cfg(test)]
pub(crate) mod testing;
