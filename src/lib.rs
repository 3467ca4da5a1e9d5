pub mod config;
pub mod ocr;

pub use config::OcrConfig;
pub use ocr::{
    create_ocr_service, test_baidu_api, test_baidu_api_at, BaiduOcr, OcrError, OcrKind,
    OcrService,
};
