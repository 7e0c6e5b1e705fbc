//! 单页识别流程 - 流程层
//!
//! 核心职责：定义"一页"的完整处理流程
//!
//! 状态：`Pending → Attempting → {Succeeded, Retrying, Exhausted}`
//! 1. 上传 → 解析 → 分类
//! 2. 成功：记录结果，结束
//! 3. 失败（HTTP 错误 / 网络错误 / 无文本）：未达上限则等待 retry_delay 后重试
//! 4. 达到上限：复制原图到隔离目录，记录失败
//!
//! 所有单次失败都在这里消化，不向上抛出

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::clients::OcrClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AttemptOutcome, Classification, FailedPage, PageImage, PageOutcome, PageResult};
use crate::services::{FailureQuarantine, ResponseExtractor};
use crate::utils::logging::truncate_text;
use crate::workflow::page_ctx::PageCtx;

/// 单页识别流程
///
/// - 编排上传、解析、重试、隔离
/// - 不持有会话，只借用 OcrClient
/// - 一次只处理一页
pub struct AttemptFlow<'a> {
    client: OcrClient<'a>,
    extractor: ResponseExtractor,
    quarantine: FailureQuarantine,
    max_retries: u32,
    retry_delay: Duration,
}

impl<'a> AttemptFlow<'a> {
    /// 创建新的单页识别流程
    pub fn new(client: OcrClient<'a>, config: &Config) -> Self {
        Self {
            client,
            extractor: ResponseExtractor::new(),
            quarantine: FailureQuarantine::new(&config.failed_dir),
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
        }
    }

    /// 处理一页，必然以成功或失败之一结束
    pub async fn run(&self, page: &PageImage, ctx: &PageCtx) -> PageOutcome {
        let mut attempt_index = 1;

        loop {
            let outcome = self.attempt(page, attempt_index, ctx).await;
            report(&outcome, ctx);

            if outcome.classification.is_success() {
                return PageOutcome::Succeeded {
                    result: PageResult {
                        page_number: page.page_number,
                        text: outcome.extracted_text,
                    },
                    attempts: outcome.attempt_index,
                };
            }

            if attempt_index >= self.max_retries {
                break;
            }

            info!("{} ↩️ {} 秒后重试…", ctx, self.retry_delay.as_secs_f32());
            sleep(self.retry_delay).await;
            attempt_index += 1;
        }

        error!("{} 🚨 {} 次尝试后仍识别失败", ctx, self.max_retries);
        self.isolate(page, ctx).await;

        PageOutcome::Exhausted {
            failed: FailedPage {
                page_number: page.page_number,
                filename: page.filename.clone(),
            },
            attempts: attempt_index,
        }
    }

    /// 执行一次尝试：上传 → 解析 → 分类
    async fn attempt(&self, page: &PageImage, attempt_index: u32, ctx: &PageCtx) -> AttemptOutcome {
        match self.client.recognise(page).await {
            Ok(response) => {
                let (extracted_text, classification) = self.extractor.extract(&response);
                AttemptOutcome {
                    attempt_index,
                    http_status: Some(response.status),
                    extracted_text,
                    classification,
                }
            }
            Err(e) => {
                match &e {
                    AppError::Transport(t) if t.timed_out => debug!("{} 请求超时: {}", ctx, t.endpoint),
                    _ => debug!("{} {}", ctx, e),
                }
                AttemptOutcome {
                    attempt_index,
                    http_status: None,
                    extracted_text: String::new(),
                    classification: Classification::HttpError,
                }
            }
        }
    }

    /// 复制原图到隔离目录；复制失败只记录日志，页面仍按失败处理
    async fn isolate(&self, page: &PageImage, ctx: &PageCtx) {
        match self.quarantine.quarantine(&page.path).await {
            Ok(target) => info!("{} 📂 原图已复制到 {}", ctx, target.display()),
            Err(e) => error!("{} 无法隔离原图: {}", ctx, e),
        }
    }
}

/// 按单次尝试的结果记录日志
fn report(outcome: &AttemptOutcome, ctx: &PageCtx) {
    let n = outcome.attempt_index;
    match (outcome.classification, outcome.http_status) {
        (Classification::Success, _) => {
            info!("{} ✅ 第 {} 次尝试成功", ctx, n);
            debug!("{} 文本: {}", ctx, truncate_text(&outcome.extracted_text, 80));
        }
        (Classification::EmptyText, _) => warn!("{} ❌ 第 {} 次尝试: 没有提取到有效文本", ctx, n),
        (Classification::HttpError, Some(status)) => warn!("{} ⚠️ 第 {} 次尝试: HTTP {}", ctx, n, status),
        (Classification::HttpError, None) => warn!("{} ⚠️ 第 {} 次尝试: 未收到响应", ctx, n),
    }
}
