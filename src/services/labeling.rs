use crate::models::analysis::{FactorScores, StockLabel};
use crate::models::stock::StockSnapshot;

pub struct LabelingEngine;

fn label(text: &str, color: &str, icon: &str) -> StockLabel {
    StockLabel {
        text: text.to_string(),
        color: color.to_string(),
        icon: Some(icon.to_string()),
    }
}

impl LabelingEngine {
    /// 基于因子得分为涨停候选股生成标签（强信号在前，风险提示在后）
    pub fn limit_up_labels(stock: &StockSnapshot, factors: &FactorScores) -> Vec<StockLabel> {
        let mut labels = Vec::new();
        let t = &stock.technical_indicators;

        // ===== 量价信号 =====
        if factors.rise_speed >= 60 {
            labels.push(label("快速拉升", "#FF4757", "rocket"));
        }

        if factors.volume >= 60 {
            labels.push(label("显著放量", "#FF6348", "volume"));
        }

        if factors.money_flow >= 60 {
            labels.push(label("主力抢筹", "#E74C3C", "inflow"));
        }

        // ===== 技术形态 =====
        if stock.current_price > t.ma5 && t.ma5 > t.ma20 {
            labels.push(label("均线多头", "#2ED573", "trend"));
        }

        if t.macd > 0.0 {
            labels.push(label("MACD红柱", "#E67E22", "macd"));
        }

        // ===== 板块与情绪 =====
        if factors.industry >= 70 {
            labels.push(label("热门板块", "#9B59B6", "fire"));
        }

        if factors.sentiment >= 70 {
            labels.push(label("情绪高涨", "#3498DB", "sentiment"));
        }

        // ===== 风险警示 =====
        if t.rsi > 70.0 {
            labels.push(label("RSI超买", "#FF6B6B", "warning"));
        }

        if stock.net_money_flow < 0.0 {
            labels.push(label("资金流出", "#95A5A6", "outflow"));
        }

        labels
    }
}
