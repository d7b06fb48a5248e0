//! 外部推送渠道

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{NotificationError, NotificationResult};
use crate::models::notification::{Channel, Notification, NotificationPriority};
use crate::models::settings::WebhookConfig;
use crate::utils::http::build_webhook_client;

/// 提醒发送器
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> NotificationResult<()>;

    fn is_enabled(&self) -> bool;

    fn channel(&self) -> Channel;
}

/// 企业微信/钉钉群机器人与通用 webhook
pub struct WebhookSender {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSender {
    pub fn new(config: WebhookConfig) -> NotificationResult<Self> {
        if config.url.trim().is_empty() {
            return Err(NotificationError::InvalidConfig(format!(
                "{} webhook 地址为空",
                config.channel.as_str()
            )));
        }
        let client = build_webhook_client(10)
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// 按渠道格式化消息体
    pub fn payload(channel: Channel, n: &Notification) -> Value {
        let text = format_text(n);
        match channel {
            Channel::WeCom | Channel::DingTalk => json!({
                "msgtype": "text",
                "text": { "content": text }
            }),
            Channel::Webhook => json!({
                "id": n.id,
                "kind": n.kind.as_str(),
                "priority": n.priority,
                "title": n.title,
                "body": n.body,
                "stockCode": n.stock_code,
                "createdAt": n.created_at.to_rfc3339(),
            }),
        }
    }
}

/// 群机器人应答：HTTP 200 时错误也放在 errcode 里
#[derive(Debug, Deserialize)]
struct RobotReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// 企业微信/钉钉需 errcode == 0 才算送达；通用 webhook 只看 HTTP 状态
fn check_robot_reply(channel: Channel, body: &str) -> NotificationResult<()> {
    if channel == Channel::Webhook {
        return Ok(());
    }
    let reply: RobotReply = serde_json::from_str(body)?;
    if reply.errcode != 0 {
        return Err(NotificationError::SendFailed(format!(
            "{} 错误 {}: {}",
            channel.as_str(),
            reply.errcode,
            reply.errmsg
        )));
    }
    Ok(())
}

fn format_text(n: &Notification) -> String {
    let mark = match n.priority {
        NotificationPriority::Low => "ℹ️",
        NotificationPriority::Normal => "📊",
        NotificationPriority::High => "⚠️",
        NotificationPriority::Critical => "🚨",
    };
    format!("{} {}\n{}", mark, n.title, n.body)
}

#[async_trait]
impl ChannelSender for WebhookSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        let body = Self::payload(self.config.channel, notification);
        let resp = self.client.post(&self.config.url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(NotificationError::SendFailed(format!(
                "{} 返回 {}: {}",
                self.config.channel.as_str(),
                status,
                snippet
            )));
        }
        check_robot_reply(self.config.channel, &text)?;
        log::debug!("{} 推送成功: {}", self.config.channel.as_str(), notification.title);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn channel(&self) -> Channel {
        self.config.channel
    }
}

/// 根据配置构建发送器，配置错误的条目记录日志后跳过
pub fn senders_from_config(configs: &[WebhookConfig]) -> Vec<Box<dyn ChannelSender>> {
    configs
        .iter()
        .filter_map(|c| match WebhookSender::new(c.clone()) {
            Ok(s) => Some(Box::new(s) as Box<dyn ChannelSender>),
            Err(e) => {
                log::warn!("忽略推送渠道配置: {}", e);
                None
            }
        })
        .collect()
}
