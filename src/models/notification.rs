use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisResult, Horizon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// 涨停潜力信号
    LimitUpSignal,
    /// 价格提醒
    PriceAlert,
    /// 讨论区互动
    Discussion,
    /// 系统消息
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LimitUpSignal => "limit_up_signal",
            Self::PriceAlert => "price_alert",
            Self::Discussion => "discussion",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// 外部推送渠道（站内信不在此列，所有提醒都会进站内信）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// 企业微信群机器人
    WeCom,
    /// 钉钉群机器人
    DingTalk,
    /// 通用 JSON webhook
    Webhook,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeCom => "we_com",
            Self::DingTalk => "ding_talk",
            Self::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub stock_code: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            priority: NotificationPriority::Normal,
            title: title.into(),
            body: body.into(),
            stock_code: None,
            created_at: Utc::now(),
            read: false,
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_stock(mut self, code: impl Into<String>) -> Self {
        self.stock_code = Some(code.into());
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// 由高置信度分析结果生成涨停信号提醒
    pub fn from_analysis(result: &AnalysisResult) -> Self {
        let priority = if result.probability >= 90 {
            NotificationPriority::Critical
        } else {
            NotificationPriority::High
        };
        let horizon = match result.horizon {
            Horizon::Intraday => "盘中",
            Horizon::NextDay => "次日",
        };
        let title = format!("{}涨停信号：{}({})", horizon, result.stock_name, result.stock_code);
        let body = format!(
            "涨停概率 {}%，综合得分 {}，{}",
            result.probability, result.score, result.recommendation
        );
        Self::new(NotificationKind::LimitUpSignal, title, body)
            .with_priority(priority)
            .with_stock(result.stock_code.clone())
    }
}

/// 单次分发结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub notification_id: String,
    pub delivered: Vec<Channel>,
    pub failed: Vec<(Channel, String)>,
    /// 因免打扰时段被压下的外部渠道
    pub suppressed: Vec<Channel>,
}
