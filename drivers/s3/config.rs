//! S3客户端配置

use s3::Region;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WrapperOptions;

const DEFAULT_CUSTOM_REGION: &str = "us-east-1";

#[derive(Debug, thiserror::Error)]
pub enum S3ConfigError {
    #[error("Missing required client configuration options: region")]
    MissingRegion,
    #[error("Invalid S3 client options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// S3配置
///
/// 未识别的选项会被忽略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// SDK版本标记
    #[serde(default = "default_version")]
    pub version: String,
    /// 区域
    #[serde(default)]
    pub region: Option<String>,
    /// S3端点地址
    /// AWS: 留空，按区域生成 https://s3.{region}.amazonaws.com
    /// MinIO: http://localhost:9000
    #[serde(default)]
    pub endpoint: Option<String>,
    /// 强制使用路径风格（而非虚拟主机风格）
    /// MinIO等需要设置为true
    #[serde(default)]
    pub use_path_style_endpoint: bool,
}

fn default_version() -> String {
    "latest".to_string()
}

impl S3Config {
    /// 从包装器选项解析
    pub fn from_options(options: &WrapperOptions) -> Result<Self, S3ConfigError> {
        Ok(serde_json::from_value(Value::Object(options.clone()))?)
    }

    /// 生成区域（带端点）
    pub fn region(&self) -> Result<Region, S3ConfigError> {
        let region = self.region.as_deref().filter(|r| !r.is_empty());
        let endpoint = self.endpoint.as_deref().filter(|e| !e.is_empty());

        match (region, endpoint) {
            (region, Some(endpoint)) => Ok(Region::Custom {
                region: region.unwrap_or(DEFAULT_CUSTOM_REGION).to_string(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
            }),
            (Some(region), None) => Ok(Region::Custom {
                region: region.to_string(),
                endpoint: format!("https://s3.{}.amazonaws.com", region),
            }),
            (None, None) => Err(S3ConfigError::MissingRegion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<S3Config, S3ConfigError> {
        S3Config::from_options(value.as_object().unwrap())
    }

    #[test]
    fn test_aws_region() {
        let config = parse(json!({"version": "latest", "region": "eu-west-2", "bucket_endpoint": true})).unwrap();
        match config.region().unwrap() {
            Region::Custom { region, endpoint } => {
                assert_eq!(region, "eu-west-2");
                assert_eq!(endpoint, "https://s3.eu-west-2.amazonaws.com");
            }
            other => panic!("unexpected region: {:?}", other),
        }
    }

    #[test]
    fn test_custom_endpoint() {
        let config = parse(json!({"endpoint": "http://localhost:9000/", "use_path_style_endpoint": true})).unwrap();
        assert!(config.use_path_style_endpoint);
        match config.region().unwrap() {
            Region::Custom { region, endpoint } => {
                assert_eq!(region, "us-east-1");
                assert_eq!(endpoint, "http://localhost:9000");
            }
            other => panic!("unexpected region: {:?}", other),
        }
    }

    #[test]
    fn test_missing_region() {
        let config = parse(json!({"version": "latest"})).unwrap();
        assert!(matches!(config.region(), Err(S3ConfigError::MissingRegion)));
        let config = parse(json!({"region": ""})).unwrap();
        assert!(matches!(config.region(), Err(S3ConfigError::MissingRegion)));
    }

    #[test]
    fn test_invalid_options() {
        assert!(matches!(
            parse(json!({"region": 42})),
            Err(S3ConfigError::InvalidOptions(_))
        ));
        assert_eq!(parse(json!({})).unwrap().version, "latest");
    }
}
