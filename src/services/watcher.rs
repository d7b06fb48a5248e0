//! 定时扫描：盘中定期重新评分，高置信度结果转为提醒

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::db::database::Database;
use crate::models::alert::PriceAlert;
use crate::models::analysis::{AnalysisResult, Horizon, RankedCandidate};
use crate::models::notification::{DispatchReport, Notification};
use crate::models::settings::AppSettings;
use crate::models::stock::{MarketFrame, StockSnapshot};
use crate::services::limit_up::{DailyLimitUpAnalyzer, LimitUpRanker, NextDayLimitUpAnalyzer};
use crate::services::notification::NotificationService;
use crate::services::price_alert::PriceAlertEngine;
use crate::services::scheduler::TradingScheduler;

/// 行情数据源
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn frames(&self) -> Result<Vec<MarketFrame>>;
}

/// 固定行情帧（JSON 文件或测试数据）
pub struct StaticProvider {
    frames: Vec<MarketFrame>,
}

impl StaticProvider {
    pub fn new(frames: Vec<MarketFrame>) -> Self {
        Self { frames }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let frames: Vec<MarketFrame> = serde_json::from_str(&text)?;
        Ok(Self::new(frames))
    }
}

#[async_trait]
impl SnapshotProvider for StaticProvider {
    async fn frames(&self) -> Result<Vec<MarketFrame>> {
        Ok(self.frames.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub intraday: Vec<RankedCandidate>,
    pub next_day: Vec<RankedCandidate>,
    pub dispatched: Vec<DispatchReport>,
    /// 输入非法被跳过的帧数
    pub skipped: usize,
}

/// 当日已推送的 (代码, 周期, 交易日)
type AlertKey = (String, Horizon, NaiveDate);

pub struct LimitUpWatcher {
    provider: Arc<dyn SnapshotProvider>,
    notifier: Arc<Mutex<NotificationService>>,
    settings: AppSettings,
    alerts: Vec<PriceAlert>,
    db: Option<Arc<Database>>,
    alerted: HashSet<AlertKey>,
}

impl LimitUpWatcher {
    pub fn new(
        provider: Arc<dyn SnapshotProvider>,
        notifier: Arc<Mutex<NotificationService>>,
        settings: AppSettings,
    ) -> Self {
        Self {
            provider,
            notifier,
            settings,
            alerts: vec![],
            db: None,
            alerted: HashSet::new(),
        }
    }

    pub fn with_price_alerts(mut self, alerts: Vec<PriceAlert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn price_alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    /// 执行一轮扫描
    pub async fn scan_once(&mut self, now: DateTime<Local>) -> Result<ScanReport> {
        let frames = self.provider.frames().await?;
        let today = now.date_naive();
        self.alerted.retain(|(_, _, day)| *day == today);

        let mut report = ScanReport::default();
        let mut intraday: Vec<AnalysisResult> = Vec::new();
        let mut next_day: Vec<AnalysisResult> = Vec::new();

        for frame in &frames {
            let s = &frame.snapshot;
            match DailyLimitUpAnalyzer::analyze(s) {
                Ok(r) => intraday.push(r),
                Err(e) => {
                    log::warn!("跳过 {}({}): {}", s.name, s.code, e);
                    report.skipped += 1;
                    continue;
                }
            }
            if let Some(day) = &frame.day {
                match NextDayLimitUpAnalyzer::analyze(s, day) {
                    Ok(r) => next_day.push(r),
                    Err(e) => log::warn!("次日分析跳过 {}: {}", s.code, e),
                }
            }
        }

        let snapshots: Vec<StockSnapshot> = frames.into_iter().map(|f| f.snapshot).collect();
        let top_n = self.settings.top_n;
        report.intraday = LimitUpRanker::rank_with_labels(&intraday, &snapshots, top_n);
        report.next_day = LimitUpRanker::rank_with_labels(&next_day, &snapshots, top_n);
        log::info!(
            "扫描完成：{} 只股票，盘中候选 {}，次日候选 {}",
            snapshots.len(),
            report.intraday.len(),
            report.next_day.len()
        );

        let threshold = self.settings.alert_probability_threshold;
        // (去重键, 提醒)：价格提醒无去重键
        let mut outgoing: Vec<(Option<AlertKey>, Notification)> = Vec::new();
        for candidate in report.intraday.iter().chain(report.next_day.iter()) {
            let r = &candidate.result;
            if let Some(db) = &self.db {
                if let Err(e) = db.save_analysis(r) {
                    log::warn!("保存分析记录失败 {}: {}", r.stock_code, e);
                }
            }
            if r.probability < threshold {
                continue;
            }
            let key = (r.stock_code.clone(), r.horizon, today);
            if !self.alerted.contains(&key) {
                outgoing.push((Some(key), Notification::from_analysis(r)));
            }
        }

        let cooldown = chrono::Duration::minutes(self.settings.price_alert_cooldown_mins);
        let fired = PriceAlertEngine::evaluate(&mut self.alerts, &snapshots, now.with_timezone(&Utc), cooldown);
        if !fired.is_empty() {
            if let Some(db) = &self.db {
                for alert in &self.alerts {
                    if let Err(e) = db.upsert_price_alert(alert) {
                        log::warn!("保存价格提醒失败 {}: {}", alert.stock_code, e);
                    }
                }
            }
        }
        outgoing.extend(fired.into_iter().map(|n| (None, n)));

        let mut notifier = self.notifier.lock().await;
        for (key, n) in outgoing {
            if let Some(db) = &self.db {
                if let Err(e) = db.save_notification(&n) {
                    log::warn!("保存提醒失败 {}: {}", n.title, e);
                }
            }
            report.dispatched.push(notifier.dispatch_at(n, now.time()).await);
            if let Some(key) = key {
                self.alerted.insert(key);
            }
        }

        Ok(report)
    }

    /// 后台定时运行，返回用于关闭的句柄
    pub fn spawn(mut self) -> WatcherHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = Duration::from_secs(self.settings.refresh_interval_secs.max(1));
        let only_trading = self.settings.only_trading_hours;

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = Local::now();
                        if only_trading && !TradingScheduler::is_trading_time_at(now.naive_local()) {
                            log::debug!("非交易时段，跳过扫描: {}", TradingScheduler::market_status_at(now.naive_local()));
                            continue;
                        }
                        if let Err(e) = self.scan_once(now).await {
                            log::error!("扫描失败: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            log::info!("定时扫描已停止");
            self
        });

        WatcherHandle { shutdown_tx, join }
    }
}

pub struct WatcherHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<LimitUpWatcher>,
}

impl WatcherHandle {
    /// 停止扫描并取回 watcher
    pub async fn shutdown(self) -> Result<LimitUpWatcher> {
        let _ = self.shutdown_tx.send(true);
        Ok(self.join.await?)
    }
}
