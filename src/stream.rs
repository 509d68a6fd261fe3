//! URL interception layer / URL拦截层
//!
//! Binds a URL scheme to a storage client so that reads of
//! `scheme://bucket/key` are served by the client instead of HTTP.
//! Schemes without a wrapper return None and are left to the host.
//! 未注册的协议返回 None，由宿主按默认方式下载。

use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::storage::{ClientHandle, ObjectStat};
use crate::utils::{split_bucket_key, url_scheme};

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("URL must look like {scheme}://bucket/key, got {url}")]
    MalformedUrl { scheme: String, url: String },
}

/// Registered stream wrappers (scheme -> client) / 已注册的流包装器
#[derive(Default)]
pub struct StreamWrappers {
    wrappers: RwLock<HashMap<String, ClientHandle>>,
}

impl StreamWrappers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scheme to a client, replacing any previous binding / 注册协议
    pub fn register(&self, client: ClientHandle, protocol: &str) {
        let previous = self.wrappers.write().insert(protocol.to_string(), client);
        if previous.is_some() {
            tracing::warn!("Stream wrapper replaced: {}", protocol);
        } else {
            tracing::debug!("Stream wrapper registered: {}", protocol);
        }
    }

    pub fn is_registered(&self, protocol: &str) -> bool {
        self.wrappers.read().contains_key(protocol)
    }

    pub fn protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self.wrappers.read().keys().cloned().collect();
        protocols.sort();
        protocols
    }

    /// Find the client and object location for a URL
    fn resolve(&self, url: &str) -> Result<Option<(ClientHandle, String, String)>> {
        let Some(scheme) = url_scheme(url) else {
            return Ok(None);
        };
        let Some(client) = self.wrappers.read().get(&scheme).cloned() else {
            return Ok(None);
        };
        let (bucket, key) = split_bucket_key(url).ok_or_else(|| StreamError::MalformedUrl {
            scheme,
            url: url.to_string(),
        })?;
        Ok(Some((client, bucket, key)))
    }

    /// Open a reader for the URL / 打开URL读取器
    pub async fn open(&self, url: &str) -> Result<Option<Box<dyn AsyncRead + Unpin + Send>>> {
        self.open_range(url, None).await
    }

    pub async fn open_range(
        &self,
        url: &str,
        range: Option<Range<u64>>,
    ) -> Result<Option<Box<dyn AsyncRead + Unpin + Send>>> {
        let Some((client, bucket, key)) = self.resolve(url)? else {
            return Ok(None);
        };
        tracing::debug!("Reading {}/{} through {}", bucket, key, client.name());
        Ok(Some(client.open_reader(&bucket, &key, range).await?))
    }

    /// Object metadata for the URL / 获取URL对应对象的元信息
    ///
    /// Outer None: scheme not wrapped. Inner None: object missing.
    pub async fn stat(&self, url: &str) -> Result<Option<Option<ObjectStat>>> {
        let Some((client, bucket, key)) = self.resolve(url)? else {
            return Ok(None);
        };
        Ok(Some(client.stat(&bucket, &key).await?))
    }

    /// Copy the object behind the URL into a local file / 将对象下载到本地文件
    ///
    /// Returns bytes written, or None if the scheme is not wrapped.
    pub async fn copy_to_file(&self, url: &str, path: impl AsRef<Path>) -> Result<Option<u64>> {
        let Some(mut reader) = self.open(url).await? else {
            return Ok(None);
        };
        let mut file = tokio::fs::File::create(path.as_ref()).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        // 确保数据落盘
        file.flush().await?;
        file.sync_all().await?;

        tracing::info!("Downloaded {} ({} bytes)", url, written);
        Ok(Some(written))
    }
}
