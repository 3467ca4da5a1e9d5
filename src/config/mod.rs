pub mod settings;

pub use settings::{OcrConfig, DEFAULT_ENDPOINT};
