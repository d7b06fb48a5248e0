use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use radar_lib::AppState;

#[derive(Parser)]
#[command(name = "limit-up-radar")]
#[command(about = "A股涨停潜力扫描：评分、排名并推送提醒", long_about = None)]
#[command(version)]
struct Cli {
    /// 行情帧 JSON 文件（MarketFrame 数组）
    frames: PathBuf,

    /// 按刷新间隔持续扫描，Ctrl+C 退出
    #[arg(long)]
    watch: bool,

    /// 讨论帖 JSON 文件，提供时按关注标签输出推荐
    #[arg(long)]
    threads: Option<PathBuf>,

    /// 数据目录（SQLite 文件所在）
    #[arg(long, env = "RADAR_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    radar_lib::init_logging();

    let state = AppState::open(cli.data_dir)?;

    if cli.watch {
        let handle = state.watcher(&cli.frames)?.spawn();
        log::info!("定时扫描已启动，Ctrl+C 退出");
        tokio::signal::ctrl_c().await?;
        handle.shutdown().await?;
    } else {
        let report = state.scan_file(&cli.frames).await?;
        let recommendations = match &cli.threads {
            Some(path) => state.interest_recommendations(&radar_lib::load_threads(path)?)?,
            None => vec![],
        };
        let output = serde_json::json!({
            "scan": report,
            "recommendations": recommendations,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    let remaining = std::sync::Arc::try_unwrap(state.notifier)
        .map(|m| m.into_inner().dispose().len())
        .unwrap_or_default();
    log::info!("退出，本次站内信 {} 条", remaining);
    Ok(())
}
