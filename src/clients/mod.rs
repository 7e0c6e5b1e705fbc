pub mod ocr_client;

pub use crate::infrastructure::RawResponse;
pub use ocr_client::OcrClient;
