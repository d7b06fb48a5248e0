use std::collections::VecDeque;

use chrono::{Local, NaiveTime};
use futures::future::join_all;

use crate::models::notification::{Channel, DispatchReport, Notification, NotificationPriority};
use crate::models::settings::NotificationSettings;
use crate::services::channels::{senders_from_config, ChannelSender};
use crate::utils::retry::retry_with_backoff;

/// 提醒分发服务：显式构造、注入使用，`dispose` 结束生命周期
pub struct NotificationService {
    settings: NotificationSettings,
    senders: Vec<Box<dyn ChannelSender>>,
    inbox: VecDeque<Notification>,
}

impl NotificationService {
    pub fn new(settings: NotificationSettings, senders: Vec<Box<dyn ChannelSender>>) -> Self {
        Self {
            settings,
            senders,
            inbox: VecDeque::new(),
        }
    }

    /// 按配置中的 webhook 构建发送器
    pub fn from_settings(settings: NotificationSettings) -> Self {
        let senders = senders_from_config(&settings.webhooks);
        let svc = Self::new(settings, senders);
        log::info!("提醒服务启动，外部渠道: {:?}", svc.registered_channels());
        svc
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// 更新设置；webhook 配置有变化时重建发送器
    pub fn update_settings(&mut self, settings: NotificationSettings) {
        if settings.webhooks != self.settings.webhooks {
            self.senders = senders_from_config(&settings.webhooks);
            log::info!("推送渠道已更新: {} 个", self.senders.len());
        }
        self.settings = settings;
        let cap = self.settings.inbox_capacity;
        self.inbox.truncate(cap);
    }

    pub fn is_quiet_at(&self, t: NaiveTime) -> bool {
        self.settings.quiet_hours.is_some_and(|q| q.contains(t))
    }

    /// 以本地当前时间分发
    pub async fn dispatch(&mut self, notification: Notification) -> DispatchReport {
        let now = Local::now().time();
        self.dispatch_at(notification, now).await
    }

    /// 分发提醒：先入站内信，再按规则推送外部渠道
    /// 免打扰时段内仅 High/Critical 推送外部渠道
    pub async fn dispatch_at(&mut self, notification: Notification, local_time: NaiveTime) -> DispatchReport {
        let mut report = DispatchReport {
            notification_id: notification.id.clone(),
            ..Default::default()
        };

        self.inbox.push_front(notification.clone());
        let cap = self.settings.inbox_capacity;
        self.inbox.truncate(cap);

        if !self.settings.enabled {
            return report;
        }

        let channels = self.settings.channels_for(notification.kind);
        if channels.is_empty() {
            return report;
        }

        if self.is_quiet_at(local_time) && notification.priority < NotificationPriority::High {
            log::debug!("免打扰时段，仅站内提醒: {}", notification.title);
            report.suppressed = channels;
            return report;
        }

        let targets: Vec<&dyn ChannelSender> = channels
            .iter()
            .flat_map(|c| {
                self.senders
                    .iter()
                    .filter(move |s| s.channel() == *c && s.is_enabled())
                    .map(|s| s.as_ref())
            })
            .collect();

        let max_retries = self.settings.max_retries;
        let n = &notification;
        let outcomes = join_all(targets.into_iter().map(|sender| async move {
            let label = sender.channel().as_str();
            let result = retry_with_backoff(label, max_retries, || sender.send(n)).await;
            (sender.channel(), result)
        }))
        .await;

        for (channel, result) in outcomes {
            match result {
                Ok(()) => report.delivered.push(channel),
                Err(e) => {
                    log::error!("{} 推送失败: {}", channel.as_str(), e);
                    report.failed.push((channel, e.to_string()));
                }
            }
        }

        report
    }

    /// 站内信，最新在前
    pub fn inbox(&self) -> Vec<Notification> {
        self.inbox.iter().cloned().collect()
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.inbox.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in self.inbox.iter_mut() {
            n.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.inbox.clear();
    }

    pub fn registered_channels(&self) -> Vec<Channel> {
        self.senders.iter().map(|s| s.channel()).collect()
    }

    /// 结束服务，返回剩余站内信供调用方持久化
    pub fn dispose(self) -> Vec<Notification> {
        log::info!("提醒服务关闭，站内信 {} 条", self.inbox.len());
        self.inbox.into_iter().collect()
    }
}
