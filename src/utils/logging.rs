/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use crate::models::FailedPage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。重复调用不会报错
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量 OCR 识别");
    info!("🌐 OCR 服务: {}", config.recognise_url());
    info!("🔤 语言: {} | 引擎: {}", config.lang, config.service);
    info!(
        "🔁 每页最多 {} 次尝试, 重试间隔 {}s, 页间隔 {}s",
        config.max_retries,
        config.retry_delay.as_secs_f32(),
        config.page_delay.as_secs_f32()
    );
    info!("{}", "=".repeat(60));
}

/// 记录页面加载信息
pub fn log_pages_loaded(total: usize, image_dir: &std::path::Path) {
    info!("✓ 在 {} 中找到 {} 个待识别页面", image_dir.display(), total);
}

/// 打印最终统计信息
pub fn print_final_stats(
    succeeded: usize,
    failed: &[FailedPage],
    total: usize,
    output_path: Option<&std::path::Path>,
    failed_dir: &std::path::Path,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", succeeded, total);
    info!("❌ 失败: {}", failed.len());
    info!("{}", "=".repeat(60));

    match output_path {
        Some(path) => info!("\n🎉 合并文本已保存至: {}", path.display()),
        None if total == 0 => warn!("\n⚠️ 没有需要处理的页面"),
        None => warn!("\n⚠️ 没有任何页面识别成功"),
    }

    if !failed.is_empty() {
        let list: Vec<String> = failed.iter().map(ToString::to_string).collect();
        warn!(
            "\n❌ 识别失败并已复制到 {} 的页面: [{}]",
            failed_dir.display(),
            list.join(", ")
        );
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
