//! # Batch OCR
//!
//! 把一个目录里的扫描页图片逐页提交给远程 OCR 服务，
//! 按页码合并识别结果，识别失败的原图复制到隔离目录以便人工处理。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 会话），只暴露能力
//!
//! ### ② 业务能力层（Clients / Services）
//! - `OcrClient` - 上传一页图片，返回原始响应
//! - `PageEnumerator` - 扫描并排序页面
//! - `ResponseExtractor` - JSON / HTML 响应 → 纯文本 + 分类
//! - `FailureQuarantine` - 复制失败页原图
//! - `ResultAggregator` - 按页码写出合并文本
//!
//! ### ③ 流程层（Workflow）
//! - `AttemptFlow` - 单页的重试状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 顺序处理所有页面并汇总

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Classification, FailedPage, PageImage, PageOutcome, PageResult};
pub use orchestrator::{App, RunSummary};
