//! 批量页面处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的批量识别。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建输出目录、建立 HTTP 会话并预热
//! 2. **页面加载**：扫描并排序所有待识别页面（`Vec<PageImage>`）
//! 3. **顺序处理**：一次只处理一页，页与页之间等待 page_delay
//! 4. **结果汇总**：成功页交给 ResultAggregator，失败页记录在统计中
//! 5. **全局统计**：输出本次运行的汇总信息
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 HttpSession 的模块
//! - **向下委托**：委托 AttemptFlow 处理单页
//! - **部分失败是正常结果**：只有目录创建或合并文件写入失败才返回错误

use crate::clients::OcrClient;
use crate::config::Config;
use crate::error::FileError;
use crate::infrastructure::HttpSession;
use crate::models::{FailedPage, PageImage, PageOutcome};
use crate::services::{PageEnumerator, ResultAggregator};
use crate::utils::logging::{log_pages_loaded, log_startup, print_final_stats};
use crate::workflow::{AttemptFlow, PageCtx};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    session: HttpSession,
}

/// 一次运行的汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedPage>,
    /// 没有任何成功页面时为 None
    pub output_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn nothing_recognized(&self) -> bool {
        self.succeeded == 0
    }
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        for dir in [&config.output_dir, &config.failed_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| FileError::create_dir_failed(dir, e))
                .with_context(|| format!("无法创建目录: {}", dir.display()))?;
        }

        let session = HttpSession::new(&config).context("无法创建 HTTP 会话")?;
        session.bootstrap().await;

        Ok(Self { config, session })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let pages = self.load_pages().await?;
        let total = pages.len();

        if pages.is_empty() {
            warn!("⚠️ 没有找到待识别的页面，程序结束");
            let summary = RunSummary::default();
            self.report(&summary);
            return Ok(summary);
        }

        log_pages_loaded(total, &self.config.image_dir);

        let mut aggregator = ResultAggregator::new();
        let failed = self.process_all_pages(&pages, &mut aggregator).await;

        let output_path = aggregator
            .write_to(&self.config.output_path())
            .await
            .context("无法写入合并文本")?;

        let summary = RunSummary {
            total,
            succeeded: aggregator.len(),
            failed,
            output_path,
        };
        self.report(&summary);

        Ok(summary)
    }

    /// 加载页面
    async fn load_pages(&self) -> Result<Vec<PageImage>> {
        info!("\n📁 正在扫描待识别的页面...");
        PageEnumerator::new(self.config.page_filter)
            .enumerate(&self.config.image_dir)
            .await
    }

    /// 顺序处理所有页面，返回失败页列表
    async fn process_all_pages(
        &self,
        pages: &[PageImage],
        aggregator: &mut ResultAggregator,
    ) -> Vec<FailedPage> {
        let flow = AttemptFlow::new(OcrClient::new(&self.session, &self.config), &self.config);
        let total = pages.len();
        let mut failed = Vec::new();

        for (index, page) in pages.iter().enumerate() {
            let ctx = PageCtx::new(index + 1, total, page.page_number, &page.filename);
            info!("\n{} ⏳ 开始处理", ctx);

            match flow.run(page, &ctx).await {
                PageOutcome::Succeeded { result, .. } => aggregator.push(result),
                PageOutcome::Exhausted { failed: failed_page, .. } => failed.push(failed_page),
            }

            // 失败之后同样要等待
            info!("{} ⏱ 等待 {} 秒后处理下一页…", ctx, self.config.page_delay.as_secs_f32());
            sleep(self.config.page_delay).await;
        }

        failed
    }

    fn report(&self, summary: &RunSummary) {
        print_final_stats(
            summary.succeeded,
            &summary.failed,
            summary.total,
            summary.output_path.as_deref(),
            &self.config.failed_dir,
        );
    }
}
