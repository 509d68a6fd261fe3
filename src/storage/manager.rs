use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use anyhow::Result;

use super::{ClientHandle, StorageClient};

/// Client registry (protocol -> client, never replaced) / 客户端注册表
///
/// Check-then-create runs under a single lock so a protocol never ends up
/// with two clients.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<Mutex<HashMap<String, ClientHandle>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a client exists for the protocol / 协议是否已有客户端
    pub fn contains(&self, protocol: &str) -> bool {
        self.clients.lock().contains_key(protocol)
    }

    /// Get client instance / 获取客户端实例
    pub fn get(&self, protocol: &str) -> Option<ClientHandle> {
        self.clients.lock().get(protocol).cloned()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.lock().is_empty()
    }

    /// List registered protocols / 列出已注册的协议
    pub fn protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self.clients.lock().keys().cloned().collect();
        protocols.sort();
        protocols
    }

    /// Return the existing client or create and register one
    /// 返回已有客户端，或创建并注册新客户端
    ///
    /// The bool is true when `create` ran. Errors from `create` leave the
    /// registry untouched.
    pub fn get_or_create<F>(&self, protocol: &str, create: F) -> Result<(ClientHandle, bool)>
    where
        F: FnOnce() -> Result<Box<dyn StorageClient>>,
    {
        let mut clients = self.clients.lock();
        if let Some(existing) = clients.get(protocol) {
            return Ok((existing.clone(), false));
        }

        let client: ClientHandle = Arc::from(create()?);
        clients.insert(protocol.to_string(), client.clone());

        tracing::info!("Storage client registered: {} ({})", protocol, client.name());
        Ok((client, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::MemoryClient;
    use anyhow::anyhow;

    #[test]
    fn test_create_once() {
        let registry = ClientRegistry::new();
        let (_, created) = registry
            .get_or_create("sushi-s3", || Ok(Box::new(MemoryClient::default())))
            .unwrap();
        assert!(created);

        let (_, created) = registry
            .get_or_create("sushi-s3", || panic!("must not build a second client"))
            .unwrap();
        assert!(!created);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("sushi-s3"));
    }

    #[test]
    fn test_failed_create_leaves_registry_empty() {
        let registry = ClientRegistry::new();
        let result = registry.get_or_create("sushi-s3", || Err(anyhow!("invalid region")));
        assert!(result.is_err());
        assert!(registry.is_empty());
        assert!(registry.get("sushi-s3").is_none());
    }

    #[test]
    fn test_concurrent_create_builds_one_client() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let registry = ClientRegistry::new();
        let built = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let built = built.clone();
                std::thread::spawn(move || {
                    registry
                        .get_or_create("sushi-s3", || {
                            built.fetch_add(1, Ordering::SeqCst);
                            Ok(Box::new(MemoryClient::default()))
                        })
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(registry.protocols(), vec!["sushi-s3".to_string()]);
    }
}
