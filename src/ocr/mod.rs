mod baidu;
mod token;
mod traits;

pub use baidu::BaiduOcr;
pub use traits::{OcrError, OcrKind, OcrService};

use crate::config::{OcrConfig, DEFAULT_ENDPOINT};

/// 根据配置创建 OCR 服务
pub fn create_ocr_service(config: &OcrConfig) -> Result<Box<dyn OcrService>, OcrError> {
    if config.api_key.is_empty() {
        return Err(OcrError::Config("百度 OCR API Key 缺失".to_string()));
    }
    if config.secret_key.is_empty() {
        return Err(OcrError::Config("百度 OCR Secret Key 缺失".to_string()));
    }

    Ok(Box::new(
        BaiduOcr::new(config.api_key.clone(), config.secret_key.clone())
            .with_endpoint(config.endpoint.clone()),
    ))
}

/// 测试百度 OCR API
pub async fn test_baidu_api(api_key: &str, secret_key: &str) -> Result<String, OcrError> {
    baidu::test_api(DEFAULT_ENDPOINT, api_key, secret_key).await
}

/// 测试指定地址的百度 OCR API
pub async fn test_baidu_api_at(
    endpoint: &str,
    api_key: &str,
    secret_key: &str,
) -> Result<String, OcrError> {
    baidu::test_api(endpoint, api_key, secret_key).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, secret_key: &str) -> OcrConfig {
        OcrConfig {
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
            ..OcrConfig::default()
        }
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = create_ocr_service(&config("", "sk")).err();
        assert!(matches!(err, Some(OcrError::Config(_))));
    }

    #[test]
    fn missing_secret_key_is_rejected() {
        let err = create_ocr_service(&config("ak", "")).err();
        assert!(matches!(err, Some(OcrError::Config(_))));
    }

    #[test]
    fn service_is_created_from_config() {
        assert!(create_ocr_service(&config("ak", "sk")).is_ok());
    }

    #[test]
    fn kind_paths() {
        assert_eq!(OcrKind::General.path(), "/rest/2.0/ocr/v1/general");
        assert_eq!(OcrKind::Numbers.path(), "/rest/2.0/ocr/v1/numbers");
    }
}
