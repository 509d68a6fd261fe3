// Driver package / 驱动包
pub mod s3;

use std::sync::Arc;

use crate::storage::StorageClientFactory;

/// Factory used when the host does not inject one / 默认客户端工厂
pub fn default_factory() -> Arc<dyn StorageClientFactory> {
    Arc::new(s3::S3ClientFactory)
}
