pub mod config;
pub mod credentials;
pub mod event;
pub mod plugin;
pub mod storage;
pub mod stream;
pub mod utils;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use config::{build_plugin_config, HostConfig, JsonHostConfig, PluginConfig, WrapperOptions};
pub use credentials::{map_any_credentials, ClientOptions, CredentialProvider, Credentials};
pub use event::{EventSubscriber, Plugin, PluginEvent, PreFileDownloadEvent, PreFileDownloadHandler};
pub use plugin::SushiPlugin;
pub use storage::{ClientHandle, ClientRegistry, StorageClient, StorageClientFactory};
pub use stream::StreamWrappers;
