//! access_token 缓存
//!
//! 百度 OCR 接口需要先用 API Key / Secret Key 换取 access_token，
//! 过期前复用，过期或缺失时在下一次调用时惰性刷新。

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::traits::OcrError;

const TOKEN_PATH: &str = "/oauth/2.0/token";

/// 已获取的 access_token
#[derive(Debug, Clone)]
pub(crate) struct AccessToken {
    access_token: String,
    // 上游会下发，但只走 client_credentials 重新换取，从不使用
    #[allow(dead_code)]
    refresh_token: String,
    expires_at: Instant,
}

impl AccessToken {
    fn new(access_token: String, refresh_token: String, expires_in: i64, now: Instant) -> Self {
        let lifetime = Duration::from_secs(expires_in.max(0) as u64);
        Self {
            access_token,
            refresh_token,
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        }
    }

    /// 非空且当前时间严格早于过期时间
    fn is_valid(&self, now: Instant) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    access_token: String,
}

/// token 缓存，同一时刻最多持有一个 token
///
/// 刷新期间持有锁，并发调用会等待同一次刷新完成。
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    state: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 返回有效的 access_token，必要时先刷新
    pub(crate) async fn get_or_refresh(
        &self,
        client: &Client,
        endpoint: &str,
        api_key: &str,
        secret_key: &str,
    ) -> Result<String, OcrError> {
        let mut state = self.state.lock().await;

        if let Some(token) = state.as_ref() {
            if token.is_valid(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        *state = None;
        let token = fetch_token(client, endpoint, api_key, secret_key).await?;
        let access_token = token.access_token.clone();
        *state = Some(token);

        Ok(access_token)
    }
}

/// 通过 client_credentials 换取 access_token
pub(crate) async fn fetch_token(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    secret_key: &str,
) -> Result<AccessToken, OcrError> {
    tracing::debug!("Requesting access token from {}", endpoint);

    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", api_key),
        ("client_secret", secret_key),
    ];

    let response = client
        .post(format!("{}{}", endpoint, TOKEN_PATH))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    let result: TokenResponse = match serde_json::from_str(&body) {
        Ok(result) => result,
        Err(_) if !status.is_success() => {
            return Err(OcrError::Api(format!("HTTP {}: {}", status, body)));
        }
        Err(e) => return Err(OcrError::Parse(e)),
    };

    if !result.error.is_empty() {
        tracing::warn!("Access token request rejected: {}", result.error);
        let description = if result.error_description.is_empty() {
            result.error
        } else {
            result.error_description
        };
        return Err(OcrError::Auth(description));
    }

    if !status.is_success() {
        return Err(OcrError::Api(format!("HTTP {}: {}", status, body)));
    }

    tracing::info!("Access token refreshed, expires in {}s", result.expires_in);

    Ok(AccessToken::new(
        result.access_token,
        result.refresh_token,
        result.expires_in,
        Instant::now(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_valid_before_expiry() {
        let now = Instant::now();
        let token = AccessToken::new("tok".to_string(), String::new(), 3600, now);
        assert!(token.is_valid(now));
        assert!(token.is_valid(now + Duration::from_secs(3599)));
    }

    #[test]
    fn token_invalid_at_expiry() {
        let now = Instant::now();
        let token = AccessToken::new("tok".to_string(), String::new(), 60, now);
        assert!(!token.is_valid(now + Duration::from_secs(60)));
        assert!(!token.is_valid(now + Duration::from_secs(61)));
    }

    #[test]
    fn empty_token_is_never_valid() {
        let now = Instant::now();
        let token = AccessToken::new(String::new(), String::new(), 3600, now);
        assert!(!token.is_valid(now));
    }

    #[test]
    fn zero_or_negative_lifetime_expires_immediately() {
        let now = Instant::now();
        assert!(!AccessToken::new("tok".to_string(), String::new(), 0, now).is_valid(now));
        assert!(!AccessToken::new("tok".to_string(), String::new(), -5, now).is_valid(now));
    }

    #[test]
    fn token_response_error_fields() {
        let result: TokenResponse = serde_json::from_str(
            r#"{"error":"invalid_client","error_description":"bad creds"}"#,
        )
        .unwrap();
        assert_eq!(result.error, "invalid_client");
        assert_eq!(result.error_description, "bad creds");
        assert!(result.access_token.is_empty());
        assert_eq!(result.expires_in, 0);
    }

    #[test]
    fn token_response_success_fields() {
        let result: TokenResponse = serde_json::from_str(
            r#"{"refresh_token":"r","expires_in":2592000,"access_token":"a","scope":"public"}"#,
        )
        .unwrap();
        assert!(result.error.is_empty());
        assert_eq!(result.access_token, "a");
        assert_eq!(result.refresh_token, "r");
        assert_eq!(result.expires_in, 2592000);
    }

    #[tokio::test]
    async fn cache_starts_empty() {
        let cache = TokenCache::new();
        assert!(cache.state.lock().await.is_none());
    }
}
