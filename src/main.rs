use anyhow::Result;
use batch_ocr::utils::logging;
use batch_ocr::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用；部分页面失败不影响退出码
    App::initialize(config).await?.run().await?;

    Ok(())
}
