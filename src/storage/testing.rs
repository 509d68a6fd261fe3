//! In-memory client and recording factory for tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::AsyncRead;

use super::{ObjectStat, StorageClient, StorageClientFactory};
use crate::credentials::ClientOptions;

#[derive(Default)]
pub struct MemoryClient {
    objects: HashMap<(String, String), Vec<u8>>,
}

impl MemoryClient {
    pub fn with_object(mut self, bucket: &str, key: &str, data: &[u8]) -> Self {
        self.objects.insert((bucket.to_string(), key.to_string()), data.to_vec());
        self
    }
}

#[async_trait]
impl StorageClient for MemoryClient {
    fn name(&self) -> &str {
        "memory"
    }

    async fn open_reader(
        &self,
        bucket: &str,
        key: &str,
        range: Option<Range<u64>>,
    ) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        let data = self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| anyhow!("NoSuchKey: {}/{}", bucket, key))?;
        let data = match range {
            Some(r) => {
                let end = (r.end as usize).min(data.len());
                let start = (r.start as usize).min(end);
                data[start..end].to_vec()
            }
            None => data.clone(),
        };
        Ok(Box::new(std::io::Cursor::new(data)))
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<Option<ObjectStat>> {
        Ok(self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|data| ObjectStat {
                size: data.len() as u64,
                modified: None,
            }))
    }
}

/// Factory that records what it was asked to do
#[derive(Default)]
pub struct RecordingFactory {
    pub runtime_loads: AtomicUsize,
    pub created: Mutex<Vec<ClientOptions>>,
    pub fail_with: Option<String>,
    pub objects: Vec<(String, String, Vec<u8>)>,
}

impl RecordingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn serving(bucket: &str, key: &str, data: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            objects: vec![(bucket.to_string(), key.to_string(), data.to_vec())],
            ..Self::default()
        })
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }

    pub fn runtime_load_count(&self) -> usize {
        self.runtime_loads.load(Ordering::SeqCst)
    }
}

impl StorageClientFactory for RecordingFactory {
    fn client_type(&self) -> &'static str {
        "memory"
    }

    fn load_runtime(&self) -> Result<()> {
        self.runtime_loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn create_client(&self, options: ClientOptions) -> Result<Box<dyn StorageClient>> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!("{}", message));
        }
        self.created.lock().push(options);

        let client = self
            .objects
            .iter()
            .fold(MemoryClient::default(), |client, (bucket, key, data)| {
                client.with_object(bucket, key, data)
            });
        Ok(Box::new(client))
    }
}
