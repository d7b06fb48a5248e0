use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 价格提醒触发条件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AlertCondition {
    PriceAbove(f64),
    PriceBelow(f64),
    ChangePctAbove(f64),
    ChangePctBelow(f64),
    VolumeRatioAbove(f64),
}

impl AlertCondition {
    pub fn describe(&self) -> String {
        match self {
            Self::PriceAbove(v) => format!("股价突破 {:.2}", v),
            Self::PriceBelow(v) => format!("股价跌破 {:.2}", v),
            Self::ChangePctAbove(v) => format!("涨幅超过 {:.2}%", v),
            Self::ChangePctBelow(v) => format!("跌幅超过 {:.2}%", v.abs()),
            Self::VolumeRatioAbove(v) => format!("量比超过 {:.2}", v),
        }
    }
}

/// 用户设置的价格提醒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: String,
    pub stock_code: String,
    #[serde(default)]
    pub stock_name: String,
    pub condition: AlertCondition,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// false = 触发一次后自动停用
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub last_triggered_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool { true }

impl PriceAlert {
    pub fn new(stock_code: impl Into<String>, stock_name: impl Into<String>, condition: AlertCondition) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stock_code: stock_code.into(),
            stock_name: stock_name.into(),
            condition,
            enabled: true,
            repeat: false,
            last_triggered_at: None,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }
}
