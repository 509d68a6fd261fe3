//! S3客户端核心实现
//!
//! 每次请求按URL中的存储桶创建Bucket
//! 静态凭证在每次请求时解析；默认凭证链只在创建客户端时解析一次（可能阻塞）

use std::ops::Range;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;
use tokio::io::AsyncRead;

use crate::credentials::CredentialProvider;
use crate::storage::{ObjectStat, StorageClient};
use super::config::S3Config;

/// S3客户端
pub struct S3Client {
    config: S3Config,
    region: Region,
    credentials: CredentialSource,
}

/// 凭证来源
enum CredentialSource {
    /// 配置中的静态凭证
    Provider(CredentialProvider),
    /// 默认凭证链（环境变量、配置文件、实例元数据）的解析结果
    DefaultChain(Credentials),
}

impl S3Client {
    /// 创建新的S3客户端，区域无效或默认凭证链不可用时失败
    ///
    /// 没有静态凭证时在这里同步解析默认凭证链，请求路径上不再阻塞
    pub fn new(config: S3Config, credentials: Option<CredentialProvider>) -> Result<Self> {
        let region = config.region()?;
        let credentials = match credentials {
            Some(provider) => CredentialSource::Provider(provider),
            None => CredentialSource::DefaultChain(
                Credentials::default().map_err(|e| anyhow!("解析默认S3凭证失败: {}", e))?,
            ),
        };
        Ok(Self {
            config,
            region,
            credentials,
        })
    }

    /// 解析凭证：静态凭证每次解析，默认凭证链直接复用
    fn resolve_credentials(&self) -> Result<Credentials> {
        match &self.credentials {
            CredentialSource::Provider(provider) => {
                let resolved = provider.resolve()?;
                Credentials::new(Some(&resolved.key), Some(&resolved.secret), None, None, None)
                    .map_err(|e| anyhow!("创建S3凭证失败: {}", e))
            }
            CredentialSource::DefaultChain(credentials) => Ok(credentials.clone()),
        }
    }

    /// 创建S3 Bucket客户端
    pub fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        let credentials = self.resolve_credentials()?;

        let bucket = Bucket::new(name, self.region.clone(), credentials)
            .map_err(|e| anyhow!("创建S3 Bucket失败: {}", e))?;

        let bucket = if self.config.use_path_style_endpoint {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket)
    }
}

#[async_trait]
impl StorageClient for S3Client {
    fn name(&self) -> &str {
        "S3"
    }

    async fn open_reader(
        &self,
        bucket: &str,
        key: &str,
        range: Option<Range<u64>>,
    ) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        let bucket = self.bucket(bucket)?;

        let response = match range {
            Some(r) if r.end <= r.start => {
                return Ok(Box::new(std::io::Cursor::new(Vec::new())));
            }
            // S3的Range结束位置是闭区间
            Some(r) => bucket
                .get_object_range(key, r.start, Some(r.end - 1))
                .await
                .map_err(|e| anyhow!("获取S3对象失败: {}", e))?,
            None => bucket
                .get_object(key)
                .await
                .map_err(|e| anyhow!("获取S3对象失败: {}", e))?,
        };

        let code = response.status_code();
        if !(200..300).contains(&code) {
            bail!("获取S3对象失败: {} 返回 {}", key, code);
        }

        // rust-s3返回完整响应，封装为AsyncRead
        let data = response.bytes().to_vec();
        Ok(Box::new(std::io::Cursor::new(data)))
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<Option<ObjectStat>> {
        let bucket = self.bucket(bucket)?;

        let (head, code) = match bucket.head_object(key).await {
            Ok(result) => result,
            Err(S3Error::HttpFailWithBody(404, _)) => return Ok(None),
            Err(e) => return Err(anyhow!("获取S3对象信息失败: {}", e)),
        };

        match code {
            404 => Ok(None),
            200..=299 => Ok(Some(ObjectStat {
                size: head.content_length.unwrap_or(0) as u64,
                modified: head.last_modified,
            })),
            _ => bail!("获取S3对象信息失败: {} 返回 {}", key, code),
        }
    }
}
