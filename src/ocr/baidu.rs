use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;

use super::token::{fetch_token, TokenCache};
use super::traits::{OcrError, OcrKind, OcrService};
use crate::config::DEFAULT_ENDPOINT;

/// 百度 OCR 服务
pub struct BaiduOcr {
    api_key: String,
    secret_key: String,
    endpoint: String,
    client: Client,
    token: TokenCache,
}

impl BaiduOcr {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: Client::new(),
            token: TokenCache::new(),
        }
    }

    /// 替换 API 地址（私有化部署或测试）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    async fn recognize(&self, kind: OcrKind, image: &[u8]) -> Result<String, OcrError> {
        let access_token = self
            .token
            .get_or_refresh(&self.client, &self.endpoint, &self.api_key, &self.secret_key)
            .await?;

        tracing::debug!("OCR request: {:?}, {} bytes", kind, image.len());

        let params = [("image", BASE64.encode(image))];

        let response = self
            .client
            .post(format!("{}{}", self.endpoint, kind.path()))
            .query(&[("access_token", access_token.as_str())])
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let result: WordsResponse = match serde_json::from_str(&body) {
            Ok(result) => result,
            Err(_) if !status.is_success() => {
                return Err(OcrError::Api(format!("HTTP {}: {}", status, body)));
            }
            Err(e) => return Err(OcrError::Parse(e)),
        };

        if let Some(code) = result.error_code {
            let message = result.error_msg.unwrap_or_default();
            tracing::warn!("OCR API error {}: {}", code, message);
            return Err(OcrError::Api(message));
        }

        tracing::debug!("OCR result: {} record(s)", result.words_result_num);

        result.first_words()
    }
}

#[derive(Debug, Deserialize)]
struct WordsRecord {
    #[serde(default)]
    words: String,
}

#[derive(Debug, Deserialize)]
struct WordsResponse {
    #[serde(default)]
    words_result_num: u32,
    #[serde(default)]
    words_result: Vec<WordsRecord>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: Option<String>,
}

impl WordsResponse {
    /// 只取第一条识别结果
    fn first_words(self) -> Result<String, OcrError> {
        if self.words_result_num == 0 {
            return Err(OcrError::NoText);
        }

        match self.words_result.into_iter().next() {
            Some(record) if !record.words.is_empty() => Ok(record.words),
            _ => Err(OcrError::NoText),
        }
    }
}

#[async_trait]
impl OcrService for BaiduOcr {
    async fn recognize_text(&self, image: &[u8]) -> Result<String, OcrError> {
        self.recognize(OcrKind::General, image).await
    }

    async fn recognize_digits(&self, image: &[u8]) -> Result<String, OcrError> {
        self.recognize(OcrKind::Numbers, image).await
    }
}

/// 测试百度 API Key / Secret Key 是否可用
pub async fn test_api(endpoint: &str, api_key: &str, secret_key: &str) -> Result<String, OcrError> {
    let client = Client::new();
    let endpoint = endpoint.trim_end_matches('/');

    fetch_token(&client, endpoint, api_key, secret_key).await?;

    Ok("API Key 验证成功".to_string())
}
