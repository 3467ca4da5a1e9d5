use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// 鉴权失败，内容为上游返回的 error_description
    #[error("{0}")]
    Auth(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Invalid response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No text recognized")]
    NoText,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 识别类型，对应不同的 OCR 接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrKind {
    /// 通用文字识别
    General,
    /// 数字识别
    Numbers,
}

impl OcrKind {
    pub fn path(self) -> &'static str {
        match self {
            OcrKind::General => "/rest/2.0/ocr/v1/general",
            OcrKind::Numbers => "/rest/2.0/ocr/v1/numbers",
        }
    }
}

/// OCR 服务 trait
#[async_trait]
pub trait OcrService: Send + Sync {
    /// 识别图片中的文字（通用）
    async fn recognize_text(&self, image: &[u8]) -> Result<String, OcrError>;

    /// 识别图片中的数字
    async fn recognize_digits(&self, image: &[u8]) -> Result<String, OcrError>;
}
