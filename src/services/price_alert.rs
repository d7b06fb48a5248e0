use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::alert::{AlertCondition, PriceAlert};
use crate::models::notification::{Notification, NotificationKind, NotificationPriority};
use crate::models::stock::StockSnapshot;

pub struct PriceAlertEngine;

impl PriceAlertEngine {
    pub fn is_triggered(condition: &AlertCondition, s: &StockSnapshot) -> bool {
        match *condition {
            AlertCondition::PriceAbove(v) => s.current_price >= v,
            AlertCondition::PriceBelow(v) => s.current_price <= v,
            AlertCondition::ChangePctAbove(v) => s.price_change_percent() >= v,
            AlertCondition::ChangePctBelow(v) => s.price_change_percent() <= v,
            AlertCondition::VolumeRatioAbove(v) => s.volume_ratio >= v,
        }
    }

    /// 检查所有启用的提醒，返回触发生成的提醒消息
    /// 一次性提醒触发后停用；可重复提醒在冷却期内不再触发
    pub fn evaluate(
        alerts: &mut [PriceAlert],
        snapshots: &[StockSnapshot],
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Vec<Notification> {
        let by_code: HashMap<&str, &StockSnapshot> =
            snapshots.iter().map(|s| (s.code.as_str(), s)).collect();

        let mut fired = Vec::new();
        for alert in alerts.iter_mut().filter(|a| a.enabled) {
            let Some(snapshot) = by_code.get(alert.stock_code.as_str()) else {
                continue;
            };
            if snapshot.previous_close <= 0.0 || !snapshot.current_price.is_finite() {
                continue;
            }
            if alert.repeat && alert.last_triggered_at.is_some_and(|last| now - last < cooldown) {
                continue;
            }
            if !Self::is_triggered(&alert.condition, snapshot) {
                continue;
            }

            alert.last_triggered_at = Some(now);
            if !alert.repeat {
                alert.enabled = false;
            }

            let name = if alert.stock_name.is_empty() { &snapshot.name } else { &alert.stock_name };
            let title = format!("{} {}", name, alert.condition.describe());
            let body = format!(
                "现价 {:.2}，涨跌幅 {:.2}%，量比 {:.2}",
                snapshot.current_price,
                snapshot.price_change_percent(),
                snapshot.volume_ratio
            );
            log::info!("价格提醒触发: {}", title);
            fired.push(
                Notification::new(NotificationKind::PriceAlert, title, body)
                    .with_priority(NotificationPriority::High)
                    .with_stock(alert.stock_code.clone())
                    .at(now),
            );
        }
        fired
    }
}
