pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use env_logger::Env;
use tokio::sync::Mutex;

use db::database::Database;
use models::discussion::{DiscussionThread, RecommendationItem};
use services::notification::NotificationService;
use services::recommendation::RecommendationEngine;
use services::watcher::{LimitUpWatcher, ScanReport, StaticProvider};

/// 初始化日志，默认 info 级别，可用 RUST_LOG 覆盖；重复调用无副作用
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

pub struct AppState {
    pub db: Arc<Database>,
    pub notifier: Arc<Mutex<NotificationService>>,
}

impl AppState {
    /// 打开数据库、读取设置并构建提醒服务
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let db = Arc::new(Database::new(data_dir)?);
        let settings = db.load_settings()?;
        let notifier = NotificationService::from_settings(settings.notification);
        Ok(Self {
            db,
            notifier: Arc::new(Mutex::new(notifier)),
        })
    }

    /// 基于行情文件构建 watcher，已保存的价格提醒一并载入
    pub fn watcher(&self, frames_path: &Path) -> Result<LimitUpWatcher> {
        let provider = StaticProvider::from_json_file(frames_path)?;
        let settings = self.db.load_settings()?;
        let alerts = self.db.list_price_alerts()?;
        Ok(LimitUpWatcher::new(Arc::new(provider), self.notifier.clone(), settings)
            .with_price_alerts(alerts)
            .with_database(self.db.clone()))
    }

    /// 按设置中的关注标签推荐讨论帖
    pub fn interest_recommendations(&self, threads: &[DiscussionThread]) -> Result<Vec<RecommendationItem>> {
        let settings = self.db.load_settings()?;
        Ok(RecommendationEngine::for_interests(threads, &settings.interest_tags))
    }

    /// 单次扫描
    pub async fn scan_file(&self, frames_path: &Path) -> Result<ScanReport> {
        let mut watcher = self.watcher(frames_path)?;
        watcher.scan_once(Local::now()).await
    }
}

/// 读取讨论帖 JSON 数组
pub fn load_threads(path: &Path) -> Result<Vec<DiscussionThread>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
