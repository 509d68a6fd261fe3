//! S3客户端驱动
//!
//! 支持：
//! - AWS S3（按区域自动拼接端点）
//! - 兼容S3的存储（MinIO、阿里云OSS等，通过endpoint指定）
//! - 静态凭证或默认凭证链（环境变量、配置文件）
//!
//! 只负责读取：open_reader / stat

mod config;
mod driver;
mod factory;

pub use config::{S3Config, S3ConfigError};
pub use driver::S3Client;
pub use factory::S3ClientFactory;
