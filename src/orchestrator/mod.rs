//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PageImage>)
//!     ↓
//! workflow::AttemptFlow (处理单页，含重试)
//!     ↓
//! clients::OcrClient + services (能力层：枚举 / 解析 / 隔离 / 汇总)
//!     ↓
//! infrastructure (基础设施：HttpSession)
//! ```
//!
//! 只做调度和统计，不做具体业务判断

pub mod batch_processor;

pub use batch_processor::{App, RunSummary};
