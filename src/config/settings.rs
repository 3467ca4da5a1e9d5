use serde::{Deserialize, Serialize};

/// 百度智能云 API 默认地址
pub const DEFAULT_ENDPOINT: &str = "https://aip.baidubce.com";

/// OCR 配置
///
/// 由上层应用负责加载，本 crate 不读写任何配置文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            endpoint: default_endpoint(),
        }
    }
}
