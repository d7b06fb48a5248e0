use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::notification::{Channel, NotificationKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// 重新评分间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// 仅在交易时段扫描
    #[serde(default = "default_true")]
    pub only_trading_hours: bool,
    /// 涨停概率达到该值才推送信号
    #[serde(default = "default_alert_threshold")]
    pub alert_probability_threshold: u32,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// 用户关注的标签（兴趣推荐）
    #[serde(default)]
    pub interest_tags: Vec<String>,
    /// 可重复价格提醒的冷却时间（分钟）
    #[serde(default = "default_cooldown")]
    pub price_alert_cooldown_mins: i64,
    #[serde(default)]
    pub notification: NotificationSettings,
}

fn default_refresh_interval() -> u64 { 300 }
fn default_true() -> bool { true }
fn default_alert_threshold() -> u32 { 80 }
fn default_top_n() -> usize { 5 }
fn default_cooldown() -> i64 { 30 }

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
            only_trading_hours: true,
            alert_probability_threshold: 80,
            top_n: 5,
            interest_tags: vec![],
            price_alert_cooldown_mins: 30,
            notification: NotificationSettings::default(),
        }
    }
}

/// 免打扰时段 [start, end)，允许跨零点（如 22:00 - 07:00）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start == self.end {
            return false;
        }
        if self.start < self.end {
            t >= self.start && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

/// 某类提醒要推送到哪些外部渠道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRule {
    pub kind: NotificationKind,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub channel: Channel,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
    #[serde(default = "default_channel_rules")]
    pub channel_rules: Vec<ChannelRule>,
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_inbox_capacity() -> usize { 200 }
fn default_max_retries() -> u32 { 2 }

fn default_channel_rules() -> Vec<ChannelRule> {
    vec![
        ChannelRule {
            kind: NotificationKind::LimitUpSignal,
            channels: vec![Channel::WeCom, Channel::DingTalk],
        },
        ChannelRule {
            kind: NotificationKind::PriceAlert,
            channels: vec![Channel::WeCom, Channel::DingTalk],
        },
    ]
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_hours: None,
            channel_rules: default_channel_rules(),
            webhooks: vec![],
            inbox_capacity: 200,
            max_retries: 2,
        }
    }
}

impl NotificationSettings {
    pub fn channels_for(&self, kind: NotificationKind) -> Vec<Channel> {
        self.channel_rules
            .iter()
            .filter(|r| r.kind == kind)
            .flat_map(|r| r.channels.iter().copied())
            .fold(Vec::new(), |mut acc, c| {
                if !acc.contains(&c) {
                    acc.push(c);
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_quiet_hours_wraps_midnight() {
        let q = QuietHours { start: t(22, 0), end: t(7, 0) };
        assert!(q.contains(t(23, 30)));
        assert!(q.contains(t(0, 0)));
        assert!(q.contains(t(6, 59)));
        assert!(!q.contains(t(7, 0)));
        assert!(!q.contains(t(12, 0)));
    }

    #[test]
    fn test_quiet_hours_same_day() {
        let q = QuietHours { start: t(12, 0), end: t(13, 0) };
        assert!(q.contains(t(12, 30)));
        assert!(!q.contains(t(13, 0)));
        assert!(!q.contains(t(11, 59)));
    }

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let s: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, AppSettings::default());
        assert_eq!(s.refresh_interval_secs, 300);
        assert_eq!(s.notification.channels_for(NotificationKind::System), vec![]);
        assert_eq!(
            s.notification.channels_for(NotificationKind::LimitUpSignal),
            vec![Channel::WeCom, Channel::DingTalk]
        );
    }
}
