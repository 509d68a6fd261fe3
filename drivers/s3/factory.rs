//! S3客户端工厂

use anyhow::Result;

use crate::credentials::ClientOptions;
use crate::storage::{StorageClient, StorageClientFactory};
use super::config::S3Config;
use super::driver::S3Client;

/// S3客户端工厂
pub struct S3ClientFactory;

impl StorageClientFactory for S3ClientFactory {
    fn client_type(&self) -> &'static str {
        "s3"
    }

    fn load_runtime(&self) -> Result<()> {
        tracing::info!("S3 runtime loaded (rust-s3, native-tls)");
        Ok(())
    }

    fn create_client(&self, options: ClientOptions) -> Result<Box<dyn StorageClient>> {
        let config = S3Config::from_options(&options.options)?;
        tracing::debug!(
            "Creating S3 client: version={}, region={:?}, endpoint={:?}, static_credentials={}",
            config.version,
            config.region,
            config.endpoint,
            options.credentials.is_some()
        );
        Ok(Box::new(S3Client::new(config, options.credentials)?))
    }
}
